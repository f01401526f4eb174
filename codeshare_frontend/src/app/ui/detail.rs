use eframe::egui::{self, Color32, RichText};

use crate::technologies;

use super::super::state::ViewState;
use super::super::CodeshareApp;
use super::tech_badge;

const CAROUSEL_SIZE: egui::Vec2 = egui::vec2(720.0, 420.0);

impl CodeshareApp {
    pub(crate) fn render_detail(&mut self, ui: &mut egui::Ui) {
        let (is_loading, not_found, error, post) = match &self.view {
            ViewState::Detail(state) => (
                state.is_loading,
                state.not_found,
                state.error.clone(),
                state.post.clone(),
            ),
            _ => return,
        };

        if ui.button("⬅ Back to feed").clicked() {
            self.open_feed();
            return;
        }
        ui.separator();

        if not_found {
            ui.vertical_centered(|ui| {
                ui.heading("Post Not Found");
                ui.label("Sorry, we couldn't find the post you're looking for.");
            });
            return;
        }
        if let Some(err) = error {
            ui.colored_label(Color32::LIGHT_RED, err);
            return;
        }
        if is_loading && post.is_none() {
            ui.vertical_centered(|ui| ui.spinner());
            return;
        }
        let Some(post) = post else {
            return;
        };

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(RichText::new(&post.title).size(24.0));
                ui.label(format!("By: {}", post.username));
            });
            ui.add_space(12.0);

            self.render_carousel(ui, &post.screenshots);
            ui.add_space(12.0);

            ui.vertical_centered(|ui| ui.heading("The Code"));
            if post.github.is_some() {
                let explorer = match &mut self.view {
                    ViewState::Detail(state) => state.explorer.take(),
                    _ => None,
                };
                if let Some(mut explorer) = explorer {
                    self.render_explorer_widget(ui, &mut explorer);
                    if let ViewState::Detail(state) = &mut self.view {
                        state.explorer = Some(explorer);
                    }
                }
            }
            if let Some(code) = &post.code {
                let language = technologies::language_for(&post.technologies);
                ui.label(RichText::new(language).monospace().size(10.0));
                egui::ScrollArea::vertical()
                    .id_source("detail_code")
                    .max_height(400.0)
                    .show(ui, |ui| {
                        ui.add(
                            egui::TextEdit::multiline(&mut code.as_str())
                                .desired_width(f32::INFINITY)
                                .code_editor(),
                        );
                    });
            }
            ui.add_space(12.0);

            ui.vertical_centered(|ui| {
                ui.heading("Code Description");
                ui.label(&post.description);
            });
            ui.add_space(12.0);

            ui.vertical_centered(|ui| ui.heading("Technologies Used"));
            ui.horizontal_wrapped(|ui| {
                for name in &post.technologies {
                    let _ = tech_badge(ui, name, true);
                }
            });

            if !post.external_links.is_empty() {
                ui.add_space(12.0);
                ui.vertical_centered(|ui| ui.heading("Contact Me"));
                ui.horizontal_wrapped(|ui| {
                    for link in &post.external_links {
                        if ui.button(&link.platform).clicked() {
                            if let Err(err) = open::that(&link.url) {
                                log::error!("failed to open {}: {err}", link.url);
                            }
                        }
                    }
                });
            }
        });
    }

    fn render_carousel(&mut self, ui: &mut egui::Ui, screenshots: &[String]) {
        if screenshots.is_empty() {
            return;
        }
        let index = match &self.view {
            ViewState::Detail(state) => state.screenshot_index.min(screenshots.len() - 1),
            _ => 0,
        };

        let mut delta: isize = 0;
        ui.vertical_centered(|ui| {
            let url = screenshots[index].clone();
            self.render_remote_image(ui, &url, CAROUSEL_SIZE);
            if screenshots.len() > 1 {
                ui.horizontal(|ui| {
                    if ui.button("◀").clicked() {
                        delta = -1;
                    }
                    ui.label(format!("{} / {}", index + 1, screenshots.len()));
                    if ui.button("▶").clicked() {
                        delta = 1;
                    }
                });
            }
        });

        if delta != 0 {
            if let ViewState::Detail(state) = &mut self.view {
                let len = screenshots.len() as isize;
                let next = (index as isize + delta).rem_euclid(len);
                state.screenshot_index = next as usize;
            }
        }
    }
}
