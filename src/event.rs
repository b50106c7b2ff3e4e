use crate::host::FileEntry;
use crate::inference::Transcription;
use std::path::PathBuf;

/// A collaborator call the workbench started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Workspace,
    Transcribe,
    Chat,
    Execute,
    Command,
    OpenFile,
    ListDirectory,
    CreateProject,
    OpenProject,
}

/// Results coming back from background tasks, applied one at a time on the
/// UI thread.
#[derive(Debug, Clone)]
pub enum AppEvent {
    WorkspaceReady(PathBuf),
    ProjectCreated {
        name: String,
        path: PathBuf,
    },
    ProjectOpened(PathBuf),
    TranscriptionReady(Transcription),
    ChatReply(String),
    ExecutionFinished(String),
    CommandFinished(String),
    FileOpened {
        name: String,
        content: String,
    },
    /// The working directory's listing; it roots the explorer.
    RootListed {
        dir: PathBuf,
        entries: Vec<FileEntry>,
    },
    DirectoryListed {
        dir: PathBuf,
        entries: Vec<FileEntry>,
    },
    Failed {
        request: Request,
        message: String,
    },
}
