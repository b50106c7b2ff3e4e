//! The single-threaded update loop behind the window.
//!
//! Collaborator calls run as tasks on the tokio runtime and report back
//! through the event channel; `apply` is the only place session state, the
//! chat transcript and the terminal change in response. Nothing is merged:
//! whichever response lands last wins.

use crate::error::Result;
use crate::event::{AppEvent, Request};
use crate::host::{FileEntry, Host, ProjectSpec};
use crate::inference::{editor_context_turn, ChatTurn, Inference};
use crate::language::Language;
use crate::response::resolve;
use crate::session::{FileTarget, LanguageCorrection, Role, SessionState, Transcript};
use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

const PSEUDOCODE_FILE: &str = "main.pseudo";
const DEFAULT_PROJECT_NAME: &str = "Testing Grounds";

/// Called after every event send so the window wakes up to drain it.
pub type Repaint = Arc<dyn Fn() + Send + Sync>;

/// Requests currently outstanding for the self-disabling affordances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Busy {
    pub transcribing: bool,
    pub running: bool,
    pub thinking: bool,
}

pub struct Workbench {
    session: SessionState,
    transcript: Transcript,
    terminal: String,
    project_name: String,
    workspace: Option<PathBuf>,
    explorer_root: Option<PathBuf>,
    listings: BTreeMap<PathBuf, Vec<FileEntry>>,
    expanded: BTreeSet<PathBuf>,
    busy: Busy,
    inference: Arc<dyn Inference>,
    host: Arc<dyn Host>,
    runtime: Handle,
    tx: mpsc::Sender<AppEvent>,
    repaint: Repaint,
}

impl Workbench {
    pub fn new(
        inference: Arc<dyn Inference>,
        host: Arc<dyn Host>,
        runtime: Handle,
        tx: mpsc::Sender<AppEvent>,
        repaint: Repaint,
    ) -> Self {
        Self {
            session: SessionState::default(),
            transcript: Transcript::default(),
            terminal: String::new(),
            project_name: DEFAULT_PROJECT_NAME.to_string(),
            workspace: None,
            explorer_root: None,
            listings: BTreeMap::new(),
            expanded: BTreeSet::new(),
            busy: Busy::default(),
            inference,
            host,
            runtime,
            tx,
            repaint,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn terminal(&self) -> &str {
        &self.terminal
    }

    pub fn clear_terminal(&mut self) {
        self.terminal.clear();
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// The project directory last switched to.
    pub fn workspace(&self) -> Option<&Path> {
        self.workspace.as_deref()
    }

    /// The host working directory as of the last root listing.
    pub fn explorer_root(&self) -> Option<&Path> {
        self.explorer_root.as_deref()
    }

    pub fn listing(&self, dir: &Path) -> Option<&[FileEntry]> {
        self.listings.get(dir).map(Vec::as_slice)
    }

    pub fn is_expanded(&self, dir: &Path) -> bool {
        self.expanded.contains(dir)
    }

    /// Expanding lists the directory; collapsing forgets it and everything
    /// below it.
    pub fn toggle_directory(&mut self, dir: PathBuf) {
        if self.expanded.remove(&dir) {
            self.expanded.retain(|open| !open.starts_with(&dir));
            self.listings.retain(|listed, _| !listed.starts_with(&dir));
        } else {
            self.expanded.insert(dir.clone());
            self.refresh_directory(dir);
        }
    }

    pub fn busy(&self) -> Busy {
        self.busy
    }

    pub fn edit_pseudocode(&mut self, text: String) {
        self.session.edit_pseudocode(text);
    }

    pub fn edit_generated_code(&mut self, text: String) {
        self.session.edit_generated_code(text);
    }

    pub fn edit_language(&mut self, language: Language) {
        self.session.set_language(language);
    }

    fn log(&mut self, line: impl AsRef<str>) {
        self.terminal.push_str(line.as_ref());
        self.terminal.push('\n');
    }

    fn spawn<F>(&self, request: Request, task: F)
    where
        F: Future<Output = Result<AppEvent>> + Send + 'static,
    {
        let tx = self.tx.clone();
        let repaint = Arc::clone(&self.repaint);
        self.runtime.spawn(async move {
            let event = match task.await {
                Ok(event) => event,
                Err(err) => {
                    warn!(?request, "collaborator call failed: {err}");
                    AppEvent::Failed {
                        request,
                        message: err.to_string(),
                    }
                }
            };
            if tx.send(event).is_ok() {
                repaint();
            }
        });
    }

    /// Creates the workspace directory and makes it the host's working
    /// directory.
    pub fn open_workspace(&self, root: PathBuf) {
        let host = Arc::clone(&self.host);
        self.spawn(Request::Workspace, async move {
            let path = host.ensure_workspace(&root).await?;
            Ok(AppEvent::WorkspaceReady(path))
        });
    }

    /// Returns `false` when a transcription is already outstanding.
    pub fn transcribe(&mut self) -> bool {
        if self.busy.transcribing {
            return false;
        }
        self.busy.transcribing = true;

        let inference = Arc::clone(&self.inference);
        let pseudocode = self.session.pseudocode().to_string();
        self.spawn(Request::Transcribe, async move {
            let transcription = inference.transcribe(&pseudocode).await?;
            Ok(AppEvent::TranscriptionReady(transcription))
        });
        true
    }

    /// Appends the user's message and asks the assistant. Returns `false` for
    /// blank input or while a reply is pending.
    pub fn send_chat(&mut self, input: &str) -> bool {
        if input.trim().is_empty() || self.busy.thinking {
            return false;
        }
        self.busy.thinking = true;
        self.transcript.push(Role::User, input.to_string());

        let generated = self.session.generated();
        let mut history = vec![editor_context_turn(
            self.session.pseudocode(),
            generated.language.as_str(),
            &generated.text,
            input,
        )];
        history.extend(
            self.transcript
                .messages()
                .iter()
                .map(|message| ChatTurn::new(message.role.as_str(), message.content.clone())),
        );

        let inference = Arc::clone(&self.inference);
        self.spawn(Request::Chat, async move {
            let reply = inference.chat(&history).await?;
            Ok(AppEvent::ChatReply(reply))
        });
        true
    }

    /// Corrects the language label if the code says otherwise, saves the
    /// pseudocode and executes. The correction, if any, is returned so the
    /// caller can refresh its display. `None` also when a run is already
    /// outstanding.
    pub fn run(&mut self) -> Option<LanguageCorrection> {
        if self.busy.running {
            return None;
        }
        self.busy.running = true;

        let dispatch = self.session.prepare_dispatch();
        if let Some(correction) = &dispatch.correction {
            self.log(format!(
                "> Language corrected from {} to {}",
                correction.from, correction.to
            ));
        }
        self.log(format!("\n> Saving and Running {}...", dispatch.language));

        let host = Arc::clone(&self.host);
        let pseudocode = self.session.pseudocode().to_string();
        let language = dispatch.language.to_string();
        let code = dispatch.code;
        self.spawn(Request::Execute, async move {
            host.write_file(Path::new(PSEUDOCODE_FILE), &pseudocode).await?;
            let output = host.execute(&language, &code).await?;
            Ok(AppEvent::ExecutionFinished(output))
        });

        dispatch.correction
    }

    pub fn run_command(&self, command: &str) {
        if command.trim().is_empty() {
            return;
        }
        let host = Arc::clone(&self.host);
        let command = command.to_string();
        self.spawn(Request::Command, async move {
            let output = host.run_command(&command).await?;
            Ok(AppEvent::CommandFinished(output))
        });
    }

    pub fn open_file(&self, entry: &FileEntry) {
        let host = Arc::clone(&self.host);
        let name = entry.name.clone();
        let path = entry.path.clone();
        self.spawn(Request::OpenFile, async move {
            let content = host.read_file(&path).await?;
            Ok(AppEvent::FileOpened { name, content })
        });
    }

    /// Re-lists the host's working directory, which becomes the explorer root.
    pub fn refresh_root(&self) {
        let host = Arc::clone(&self.host);
        self.spawn(Request::ListDirectory, async move {
            let dir = host.working_directory();
            let entries = host.list_directory(Some(&dir)).await?;
            Ok(AppEvent::RootListed { dir, entries })
        });
    }

    fn refresh_directory(&self, dir: PathBuf) {
        let host = Arc::clone(&self.host);
        self.spawn(Request::ListDirectory, async move {
            let entries = host.list_directory(Some(&dir)).await?;
            Ok(AppEvent::DirectoryListed { dir, entries })
        });
    }

    /// Creates `base/<name>` and switches to it. Returns `false` for a blank
    /// name.
    pub fn create_project(&self, base: PathBuf, project: ProjectSpec) -> bool {
        if project.name.trim().is_empty() {
            return false;
        }
        let host = Arc::clone(&self.host);
        self.spawn(Request::CreateProject, async move {
            let created = host.init_project(&base, &project).await?;
            let path = host.change_working_directory(&created).await?;
            Ok(AppEvent::ProjectCreated {
                name: project.name.trim().to_string(),
                path,
            })
        });
        true
    }

    pub fn open_project(&self, path: PathBuf) {
        let host = Arc::clone(&self.host);
        self.spawn(Request::OpenProject, async move {
            let path = host.change_working_directory(&path).await?;
            Ok(AppEvent::ProjectOpened(path))
        });
    }

    fn switch_project(&mut self, name: String, path: PathBuf) {
        self.project_name = name;
        self.workspace = Some(path);
        self.refresh_root();
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::WorkspaceReady(path) => {
                self.log(format!("> Initialized workspace at: {}", path.display()));
                self.workspace = Some(path);
                self.refresh_root();
            }
            AppEvent::ProjectCreated { name, path } => {
                self.log(format!("> Project created: {name}"));
                self.log(format!("> Switched to project: {name}"));
                self.switch_project(name, path);
            }
            AppEvent::ProjectOpened(path) => {
                self.log(format!("> Switched to project: {}", path.display()));
                let name = path
                    .file_name()
                    .map_or_else(|| "Project".to_string(), |name| name.to_string_lossy().to_string());
                self.switch_project(name, path);
            }
            AppEvent::TranscriptionReady(transcription) => {
                self.busy.transcribing = false;
                let language = self
                    .session
                    .apply_transcription(&transcription.language, transcription.code)
                    .clone();
                info!(%language, "transcription applied");
                self.log(format!("> Transcribed to {language}"));
            }
            AppEvent::ChatReply(reply) => {
                self.busy.thinking = false;
                let parsed = resolve(&reply);
                if self.session.apply_chat(&parsed) {
                    info!(language = %self.session.language(), "chat reply updated generated code");
                }
                self.transcript.push(Role::Assistant, parsed.display_text);
            }
            AppEvent::ExecutionFinished(output) => {
                self.busy.running = false;
                self.terminal.push_str(&output);
                self.log("\n> Done.");
                self.refresh_root();
            }
            AppEvent::CommandFinished(output) => {
                self.log(output);
                self.refresh_root();
            }
            AppEvent::FileOpened { name, content } => {
                let target = self.session.apply_file_load(&name, content);
                debug!(%name, ?target, "file loaded");
                if target == FileTarget::Generated {
                    self.log(format!("> Opened {name} as {}", self.session.language()));
                }
            }
            AppEvent::RootListed { dir, entries } => {
                if self.explorer_root.as_ref() != Some(&dir) {
                    self.listings.clear();
                    self.expanded.clear();
                    self.explorer_root = Some(dir.clone());
                }
                self.listings.insert(dir, entries);
            }
            AppEvent::DirectoryListed { dir, entries } => {
                if self.expanded.contains(&dir) {
                    self.listings.insert(dir, entries);
                }
            }
            AppEvent::Failed { request, message } => self.apply_failure(request, message),
        }
    }

    fn apply_failure(&mut self, request: Request, message: String) {
        match request {
            Request::Workspace => self.log(format!("> Error initializing workspace: {message}")),
            Request::Transcribe => {
                self.busy.transcribing = false;
                self.log(format!("> Transcription failed: {message}"));
            }
            Request::Chat => {
                self.busy.thinking = false;
                self.transcript.push(
                    Role::Assistant,
                    format!("Error communicating with AI: {message}"),
                );
            }
            Request::Execute => {
                self.busy.running = false;
                self.log(format!("> Error: {message}"));
            }
            Request::Command => self.log(format!("Error: {message}")),
            Request::OpenFile => self.log(format!("> Error reading file: {message}")),
            Request::ListDirectory => self.log(format!("> Error listing directory: {message}")),
            Request::CreateProject => self.log(format!("> Failed to create project: {message}")),
            Request::OpenProject => self.log(format!("> Error opening project: {message}")),
        }
    }
}
