mod compose;
mod detail;
mod feed;
mod explorer;

use eframe::egui::{self, Color32, RichText};

use crate::technologies;

/// Pill-style badge for a technology tag, colored from the registry.
/// Unknown tags render with the neutral widget background.
pub(crate) fn tech_badge(ui: &mut egui::Ui, name: &str, selected: bool) -> egui::Response {
    let descriptor = technologies::find(name);
    let fill = descriptor
        .map(|tech| tech.color)
        .unwrap_or_else(|| ui.visuals().widgets.inactive.bg_fill);
    let text = match descriptor {
        Some(tech) => format!("{} {}", tech.icon, tech.name),
        None => name.to_string(),
    };
    let label = if selected {
        RichText::new(text).color(Color32::WHITE).strong()
    } else {
        RichText::new(text)
    };
    let mut button = egui::Button::new(label).rounding(10.0);
    if selected {
        button = button.fill(fill);
    }
    ui.add(button)
}
