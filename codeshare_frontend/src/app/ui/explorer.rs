use eframe::egui::{self, Color32, RichText};

use crate::models::{NodeKind, RepoNode};

use super::super::explorer::{FileContent, RepoExplorer, RootListing};
use super::super::CodeshareApp;

const VIEWER_IMAGE_SIZE: egui::Vec2 = egui::vec2(640.0, 480.0);

enum NodeAction {
    Toggle(RepoNode),
    Select(RepoNode),
}

impl CodeshareApp {
    /// Two-pane repository browser: lazy tree on the left, file viewer on
    /// the right. Tree clicks are collected first and applied afterwards so
    /// the explorer is only borrowed mutably once.
    pub(crate) fn render_explorer_widget(
        &mut self,
        ui: &mut egui::Ui,
        explorer: &mut RepoExplorer,
    ) {
        let mut actions = Vec::new();

        ui.horizontal_top(|ui| {
            ui.vertical(|ui| {
                ui.set_width(240.0);
                ui.heading("File Explorer");
                egui::ScrollArea::vertical()
                    .id_source("repo_tree")
                    .max_height(520.0)
                    .show(ui, |ui| match explorer.root() {
                        RootListing::Loading => {
                            ui.spinner();
                        }
                        RootListing::Failed(err) => {
                            ui.colored_label(Color32::LIGHT_RED, err);
                        }
                        RootListing::Loaded(nodes) => {
                            if nodes.is_empty() {
                                ui.label("(empty repository)");
                            } else {
                                render_nodes(ui, explorer, nodes, &mut actions);
                            }
                        }
                    });
            });
            ui.separator();
            ui.vertical(|ui| {
                self.render_selected_file(ui, explorer);
            });
        });

        for action in actions {
            let request = match action {
                NodeAction::Toggle(node) => explorer.toggle_folder(&node),
                NodeAction::Select(node) => explorer.select_file(&node),
            };
            if let Some(request) = request {
                self.spawn_explorer_request(request);
            }
        }
    }

    fn render_selected_file(&mut self, ui: &mut egui::Ui, explorer: &RepoExplorer) {
        let Some(selected) = explorer.selected() else {
            ui.label("Select a file to view");
            return;
        };
        ui.horizontal(|ui| {
            ui.heading(&selected.name);
            ui.label(RichText::new(selected.language).monospace().size(10.0));
        });
        match &selected.content {
            FileContent::Image { url } => {
                let url = url.clone();
                self.render_remote_image(ui, &url, VIEWER_IMAGE_SIZE);
            }
            FileContent::Loading => {
                ui.spinner();
            }
            FileContent::Text(text) => {
                egui::ScrollArea::vertical()
                    .id_source("repo_file_content")
                    .max_height(520.0)
                    .show(ui, |ui| {
                        ui.add(
                            egui::TextEdit::multiline(&mut text.as_str())
                                .desired_width(f32::INFINITY)
                                .code_editor(),
                        );
                    });
            }
            FileContent::Failed(err) => {
                ui.colored_label(Color32::LIGHT_RED, err);
            }
        }
    }
}

fn render_nodes(
    ui: &mut egui::Ui,
    explorer: &RepoExplorer,
    nodes: &[RepoNode],
    actions: &mut Vec<NodeAction>,
) {
    for node in nodes {
        let active = explorer.active_path() == Some(node.path.as_str());
        match node.kind {
            NodeKind::Dir => {
                let is_open = explorer.is_open(&node.path);
                let arrow = if is_open { "⏷" } else { "⏵" };
                let label = format!("{arrow} 🗀 {}", node.name);
                if ui.selectable_label(active, label).clicked() {
                    actions.push(NodeAction::Toggle(node.clone()));
                }
                if is_open {
                    ui.indent(&node.path, |ui| {
                        if let Some(children) = explorer.children_of(&node.path) {
                            render_nodes(ui, explorer, children, actions);
                        } else if explorer.is_folder_loading(&node.path) {
                            ui.spinner();
                        }
                    });
                }
            }
            NodeKind::File | NodeKind::Other => {
                if ui
                    .selectable_label(active, format!("🗋 {}", node.name))
                    .clicked()
                {
                    actions.push(NodeAction::Select(node.clone()));
                }
            }
        }
    }
}
