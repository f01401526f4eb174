use std::collections::BTreeMap;

use eframe::egui::{self, Color32};

use crate::technologies::{self, TECHNOLOGIES};

use super::super::explorer::RepoExplorer;
use super::super::state::LINK_PLATFORMS;
use super::super::CodeshareApp;
use super::tech_badge;

const PREVIEW_THUMBNAIL: egui::Vec2 = egui::vec2(160.0, 90.0);

fn field_error(ui: &mut egui::Ui, errors: &BTreeMap<&'static str, String>, field: &str) {
    if let Some(message) = errors.get(field) {
        ui.colored_label(Color32::LIGHT_RED, message);
    }
}

impl CodeshareApp {
    pub(crate) fn render_compose(&mut self, ui: &mut egui::Ui) {
        let errors = self.compose.field_errors.clone();

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Post Code");
                ui.label("Share your code with the community and help others build amazing projects!");
            });
            ui.add_space(12.0);

            ui.label("Contributor Name");
            ui.text_edit_singleline(&mut self.compose.username);
            field_error(ui, &errors, "username");
            ui.add_space(8.0);

            ui.label("Code Title");
            ui.text_edit_singleline(&mut self.compose.title);
            field_error(ui, &errors, "title");
            ui.add_space(8.0);

            ui.label("Code Description");
            ui.add(
                egui::TextEdit::multiline(&mut self.compose.description)
                    .desired_rows(3)
                    .desired_width(f32::INFINITY),
            );
            field_error(ui, &errors, "description");
            ui.add_space(8.0);

            ui.label("Technologies");
            ui.small("Select relevant technologies for your code.");
            let mut toggled: Option<&'static str> = None;
            ui.horizontal_wrapped(|ui| {
                for tech in TECHNOLOGIES {
                    let selected = self.compose.technologies.iter().any(|t| t == tech.name);
                    if tech_badge(ui, tech.name, selected).clicked() {
                        toggled = Some(tech.name);
                    }
                }
            });
            if let Some(name) = toggled {
                self.compose.toggle_technology(name);
            }
            field_error(ui, &errors, "technologies");
            ui.add_space(8.0);

            ui.label("Images/Screenshots");
            ui.horizontal(|ui| {
                if ui.button("Select images…").clicked() {
                    self.spawn_pick_screenshots();
                }
                if self.compose.uploading {
                    ui.spinner();
                    ui.label("Uploading...");
                }
            });
            if let Some(err) = self.compose.upload_error.clone() {
                ui.colored_label(Color32::LIGHT_RED, err);
            }
            let screenshots = self.compose.screenshots.clone();
            if !screenshots.is_empty() {
                ui.horizontal_wrapped(|ui| {
                    for url in &screenshots {
                        self.render_remote_image(ui, url, PREVIEW_THUMBNAIL);
                    }
                });
            }
            field_error(ui, &errors, "screenshots");
            ui.add_space(8.0);

            ui.label("GitHub Repository");
            let response = ui.text_edit_singleline(&mut self.compose.github);
            if response.lost_focus() {
                self.sync_compose_explorer();
            }
            field_error(ui, &errors, "github");
            ui.add_space(8.0);

            if self.compose.explorer.is_some() {
                if let Some(mut explorer) = self.compose.explorer.take() {
                    self.render_explorer_widget(ui, &mut explorer);
                    self.compose.explorer = Some(explorer);
                }
            } else {
                ui.label("Code Editor");
                ui.small("Paste your code below. The language will adjust based on the selected technologies.");
                let language = technologies::language_for(&self.compose.technologies);
                ui.label(egui::RichText::new(language).monospace().size(10.0));
                egui::ScrollArea::vertical()
                    .id_source("compose_code")
                    .max_height(320.0)
                    .show(ui, |ui| {
                        ui.add(
                            egui::TextEdit::multiline(&mut self.compose.code)
                                .desired_width(f32::INFINITY)
                                .code_editor(),
                        );
                    });
            }
            ui.add_space(8.0);

            ui.label("Social Links (Optional)");
            ui.small("Add your social media or other relevant links.");
            for platform in LINK_PLATFORMS.iter().copied() {
                ui.horizontal(|ui| {
                    ui.add_sized([120.0, 18.0], egui::Label::new(platform));
                    let entry = self.compose.links.entry(platform).or_default();
                    ui.text_edit_singleline(entry);
                });
            }
            field_error(ui, &errors, "externalLinks");
            ui.add_space(12.0);

            if let Some(err) = self.compose.submit_error.clone() {
                ui.colored_label(Color32::LIGHT_RED, err);
            }
            ui.horizontal(|ui| {
                let submit = ui.add_enabled(
                    !self.compose.submitting && !self.compose.uploading,
                    egui::Button::new("Submit Your Code"),
                );
                if submit.clicked() {
                    self.spawn_submit_post();
                }
                if self.compose.submitting {
                    ui.spinner();
                    ui.label("Your code is being uploaded. Please wait.");
                }
            });
        });
    }

    /// Keeps the explorer preview in step with the GitHub field: a new URL
    /// replaces the session (fresh generation), an emptied field removes it.
    fn sync_compose_explorer(&mut self) {
        let github = self.compose.github.trim().to_string();
        if github.is_empty() {
            self.compose.explorer = None;
            return;
        }
        let unchanged = self
            .compose
            .explorer
            .as_ref()
            .is_some_and(|explorer| explorer.repo_url() == github);
        if unchanged {
            return;
        }
        let generation = self.next_explorer_generation();
        let request = match self.compose.explorer.as_mut() {
            Some(explorer) => explorer.set_repo_url(github, generation),
            None => {
                let (explorer, request) = RepoExplorer::new(github, generation);
                self.compose.explorer = Some(explorer);
                request
            }
        };
        self.spawn_explorer_request(request);
    }
}
