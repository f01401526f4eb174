use eframe::egui::{self, Color32, RichText};

use super::super::{format_timestamp, CodeshareApp};
use super::tech_badge;

const CARD_THUMBNAIL: egui::Vec2 = egui::vec2(320.0, 180.0);

impl CodeshareApp {
    pub(crate) fn render_feed(&mut self, ui: &mut egui::Ui) {
        if self.feed.is_loading && self.feed.posts.is_empty() {
            ui.add(egui::Spinner::new());
        }
        if let Some(err) = self.feed.error.clone() {
            ui.colored_label(Color32::LIGHT_RED, err);
            if ui.button("Retry").clicked() {
                self.spawn_load_next_page();
            }
            ui.separator();
        }

        let posts = self.feed.posts.clone();
        let mut post_to_open: Option<i64> = None;

        egui::ScrollArea::vertical().show(ui, |ui| {
            if posts.is_empty() && self.feed.loaded_once && !self.feed.is_loading {
                ui.label("No posts available.");
            }

            for post in &posts {
                egui::Frame::group(ui.style())
                    .fill(ui.visuals().extreme_bg_color)
                    .inner_margin(egui::vec2(12.0, 8.0))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            if ui
                                .button(RichText::new(&post.title).strong().size(16.0))
                                .clicked()
                            {
                                post_to_open = Some(post.id);
                            }
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    ui.label(format_timestamp(&post.created_at));
                                },
                            );
                        });
                        ui.label(format!("By {}", post.username));
                        ui.horizontal_wrapped(|ui| {
                            for name in &post.technologies {
                                let _ = tech_badge(ui, name, true);
                            }
                        });
                        if let Some(screenshot) = post.screenshots.first() {
                            let url = screenshot.clone();
                            self.render_remote_image(ui, &url, CARD_THUMBNAIL);
                        }
                        ui.label(truncate(&post.description, 140));
                    });
                ui.add_space(6.0);
            }

            // Scrolling the sentinel into view pulls the next page. Failed
            // loads wait for the explicit retry instead of looping.
            if self.feed.has_more() {
                let sentinel = ui.allocate_response(
                    egui::vec2(ui.available_width(), 1.0),
                    egui::Sense::hover(),
                );
                if ui.is_rect_visible(sentinel.rect) && self.feed.error.is_none() {
                    self.spawn_load_next_page();
                }
                if self.feed.is_loading && !self.feed.posts.is_empty() {
                    ui.vertical_centered(|ui| ui.spinner());
                }
            }
        });

        if let Some(post_id) = post_to_open {
            self.open_post(post_id);
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let prefix: String = text.chars().take(max_chars).collect();
        format!("{prefix}…")
    }
}
