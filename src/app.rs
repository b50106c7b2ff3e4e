use crate::event::AppEvent;
use crate::host::{FileEntry, ProjectSpec};
use crate::language::Language;
use crate::session::Role;
use crate::theme::Theme;
use crate::workbench::Workbench;
use eframe::egui::{self, RichText, ScrollArea, TextEdit};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, TryRecvError};
use tracing::warn;

enum ExplorerAction {
    Toggle(PathBuf),
    Open(FileEntry),
}

pub struct WorkbenchApp {
    rx: Receiver<AppEvent>,
    workbench: Workbench,
    theme: Theme,
    projects_dir: PathBuf,
    new_project: Option<ProjectSpec>,
    open_project: Option<String>,
    chat_input: String,
    command_input: String,
    channel_closed: bool,
}

impl WorkbenchApp {
    pub fn new(
        rx: Receiver<AppEvent>,
        workbench: Workbench,
        theme: Theme,
        projects_dir: PathBuf,
    ) -> Self {
        Self {
            rx,
            workbench,
            theme,
            projects_dir,
            new_project: None,
            open_project: None,
            chat_input: String::new(),
            command_input: String::new(),
            channel_closed: false,
        }
    }

    fn drain_events(&mut self) {
        if self.channel_closed {
            return;
        }
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.workbench.apply(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("event channel disconnected");
                    self.channel_closed = true;
                    break;
                }
            }
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        let busy = self.workbench.busy();
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("Pseudobench");
                ui.separator();
                if ui.button("New Project").clicked() {
                    self.new_project.get_or_insert_with(ProjectSpec::default);
                }
                if ui.button("Open Project").clicked() {
                    self.open_project.get_or_insert_with(String::new);
                }
                ui.separator();

                let name = RichText::new(self.workbench.project_name()).color(self.theme.text_primary);
                let label = ui.label(name);
                match self.workbench.workspace() {
                    Some(path) => {
                        label.on_hover_text(path.display().to_string());
                    }
                    None => {
                        ui.label(RichText::new("Preparing workspace...").color(self.theme.warning));
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let run = egui::Button::new(RichText::new("Run").color(self.theme.text_primary))
                        .fill(self.theme.success);
                    if ui.add_enabled(!busy.running, run).clicked() {
                        self.workbench.run();
                    }
                    let transcribe_label = if busy.transcribing {
                        "Transcribing..."
                    } else {
                        "Transcribe"
                    };
                    if ui
                        .add_enabled(
                            !busy.transcribing,
                            self.theme.primary_button(transcribe_label),
                        )
                        .clicked()
                    {
                        self.workbench.transcribe();
                    }
                });
            });
        });
    }

    fn render_new_project(&mut self, ctx: &egui::Context) {
        let Some(form) = self.new_project.as_mut() else {
            return;
        };
        let mut open = true;
        let mut submit = false;
        let mut cancel = false;
        egui::Window::new("New Project")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(
                    RichText::new(format!("Created under {}", self.projects_dir.display()))
                        .color(self.theme.text_muted),
                );
                egui::Grid::new("new_project_form").num_columns(2).show(ui, |ui| {
                    ui.label("Name");
                    ui.text_edit_singleline(&mut form.name);
                    ui.end_row();
                    ui.label("Description");
                    ui.text_edit_multiline(&mut form.description);
                    ui.end_row();
                    ui.label("Intent");
                    ui.text_edit_multiline(&mut form.intent);
                    ui.end_row();
                    ui.label("Requirements");
                    ui.text_edit_multiline(&mut form.requirements);
                    ui.end_row();
                });
                ui.horizontal(|ui| {
                    submit = ui
                        .add_enabled(
                            !form.name.trim().is_empty(),
                            self.theme.primary_button("Create"),
                        )
                        .clicked();
                    cancel = ui.button("Cancel").clicked();
                });
            });

        if submit {
            if let Some(form) = self.new_project.take() {
                self.workbench.create_project(self.projects_dir.clone(), form);
            }
        } else if cancel || !open {
            self.new_project = None;
        }
    }

    fn render_open_project(&mut self, ctx: &egui::Context) {
        let Some(path) = self.open_project.as_mut() else {
            return;
        };
        let mut open = true;
        let mut submit = false;
        let mut cancel = false;
        egui::Window::new("Open Project")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                let response = ui.add(
                    TextEdit::singleline(&mut *path)
                        .desired_width(360.0)
                        .hint_text("Project folder path"),
                );
                submit = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                ui.horizontal(|ui| {
                    submit |= ui
                        .add_enabled(!path.trim().is_empty(), self.theme.primary_button("Open"))
                        .clicked();
                    cancel = ui.button("Cancel").clicked();
                });
            });

        if submit {
            if let Some(path) = self.open_project.take() {
                if !path.trim().is_empty() {
                    self.workbench.open_project(PathBuf::from(path.trim()));
                }
            }
        } else if cancel || !open {
            self.open_project = None;
        }
    }

    fn render_directory(&self, ui: &mut egui::Ui, dir: &Path, actions: &mut Vec<ExplorerAction>) {
        let Some(entries) = self.workbench.listing(dir) else {
            ui.label(RichText::new("Loading...").color(self.theme.text_muted));
            return;
        };
        if entries.is_empty() {
            ui.label(RichText::new("(empty)").color(self.theme.text_muted));
        }

        for entry in entries {
            if entry.is_dir {
                let open = self.workbench.is_expanded(&entry.path);
                let marker = if open { "v" } else { ">" };
                if ui
                    .selectable_label(false, format!("{marker} {}", entry.name))
                    .clicked()
                {
                    actions.push(ExplorerAction::Toggle(entry.path.clone()));
                }
                if open {
                    ui.indent(&entry.path, |ui| self.render_directory(ui, &entry.path, actions));
                }
            } else if ui.selectable_label(false, &entry.name).clicked() {
                actions.push(ExplorerAction::Open(entry.clone()));
            }
        }
    }

    fn render_explorer(&mut self, ctx: &egui::Context) {
        let mut actions = Vec::new();
        egui::SidePanel::left("explorer")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Explorer");
                    if ui.small_button("Refresh").clicked() {
                        self.workbench.refresh_root();
                    }
                });
                let Some(root) = self.workbench.explorer_root().map(Path::to_path_buf) else {
                    ui.separator();
                    return;
                };
                ui.label(RichText::new(root.display().to_string()).small().color(self.theme.text_muted));
                ui.separator();
                ScrollArea::vertical()
                    .id_salt("explorer_tree")
                    .show(ui, |ui| self.render_directory(ui, &root, &mut actions));
            });

        for action in actions {
            match action {
                ExplorerAction::Toggle(path) => self.workbench.toggle_directory(path),
                ExplorerAction::Open(entry) => self.workbench.open_file(&entry),
            }
        }
    }

    fn render_chat(&mut self, ctx: &egui::Context) {
        let thinking = self.workbench.busy().thinking;
        egui::SidePanel::right("chat")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                ui.heading("Assistant");
                ui.separator();

                let transcript_height = (ui.available_height() - 60.0).max(120.0);
                ScrollArea::vertical()
                    .id_salt("chat_transcript")
                    .max_height(transcript_height)
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for message in self.workbench.transcript().messages() {
                            let fill = match message.role {
                                Role::User => self.theme.user_bubble,
                                Role::Assistant => self.theme.surface_2,
                            };
                            ui.push_id(message.id, |ui| {
                                self.theme.bubble_frame(fill).show(ui, |ui| {
                                    ui.set_width(ui.available_width());
                                    ui.label(&message.content);
                                });
                            });
                        }
                        if thinking {
                            ui.label(RichText::new("Thinking...").color(self.theme.warning));
                        }
                    });

                ui.separator();
                let mut send_now = false;
                ui.horizontal(|ui| {
                    let response = ui.add_enabled(
                        !thinking,
                        TextEdit::singleline(&mut self.chat_input)
                            .desired_width(ui.available_width() - 60.0)
                            .hint_text("Ask about your code..."),
                    );
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        send_now = true;
                    }
                    send_now |= ui
                        .add_enabled(
                            !thinking && !self.chat_input.trim().is_empty(),
                            egui::Button::new("Send"),
                        )
                        .clicked();
                });

                if send_now && self.workbench.send_chat(&self.chat_input) {
                    self.chat_input.clear();
                }
            });
    }

    fn render_terminal(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("terminal")
            .resizable(true)
            .default_height(200.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Terminal");
                    if ui.small_button("Clear").clicked() {
                        self.workbench.clear_terminal();
                    }
                });

                self.theme.pane_frame().show(ui, |ui| {
                    ScrollArea::vertical()
                        .id_salt("terminal_output")
                        .max_height((ui.available_height() - 40.0).max(60.0))
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            ui.label(
                                RichText::new(self.workbench.terminal())
                                    .monospace()
                                    .color(self.theme.terminal_text),
                            );
                        });
                });

                let response = ui.add(
                    TextEdit::singleline(&mut self.command_input)
                        .font(egui::TextStyle::Monospace)
                        .desired_width(f32::INFINITY)
                        .hint_text("$ command"),
                );
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    self.workbench.run_command(&self.command_input);
                    self.command_input.clear();
                    response.request_focus();
                }
            });
    }

    fn render_editors(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |columns| {
                columns[0].strong("Pseudocode");
                let mut pseudocode = self.workbench.session().pseudocode().to_string();
                let edited = self
                    .theme
                    .pane_frame()
                    .show(&mut columns[0], |ui| {
                        ScrollArea::vertical().id_salt("pseudocode_pane").show(ui, |ui| {
                            ui.add_sized(
                                ui.available_size(),
                                TextEdit::multiline(&mut pseudocode).code_editor(),
                            )
                            .changed()
                        })
                    })
                    .inner
                    .inner;
                if edited {
                    self.workbench.edit_pseudocode(pseudocode);
                }

                let generated = self.workbench.session().generated();
                let mut language = generated.language.clone();
                let mut code = generated.text.clone();
                columns[1].horizontal(|ui| {
                    ui.strong(format!("{language} (Generated)"));
                    egui::ComboBox::from_id_salt("generated_language")
                        .selected_text(language.as_str().to_string())
                        .show_ui(ui, |ui| {
                            for known in Language::KNOWN {
                                let label = known.as_str().to_string();
                                ui.selectable_value(&mut language, known, label);
                            }
                        });
                });
                if &language != self.workbench.session().language() {
                    self.workbench.edit_language(language);
                }
                let edited = self
                    .theme
                    .pane_frame()
                    .show(&mut columns[1], |ui| {
                        ScrollArea::vertical().id_salt("generated_pane").show(ui, |ui| {
                            ui.add_sized(
                                ui.available_size(),
                                TextEdit::multiline(&mut code).code_editor(),
                            )
                            .changed()
                        })
                    })
                    .inner
                    .inner;
                if edited {
                    self.workbench.edit_generated_code(code);
                }
            });
        });
    }
}

impl eframe::App for WorkbenchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();
        self.render_top_bar(ctx);
        self.render_new_project(ctx);
        self.render_open_project(ctx);
        self.render_terminal(ctx);
        self.render_explorer(ctx);
        self.render_chat(ctx);
        self.render_editors(ctx);
    }
}
