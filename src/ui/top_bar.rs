//! Top bar UI: app title, selected layer and day, and status.

use crate::gibs::{time_extent, CatalogState};
use crate::state::AppState;
use chrono::{DateTime, Utc};
use eframe::egui::{self, Color32, RichText};
use egui_phosphor::regular as icons;

pub fn render_top_bar(ctx: &egui::Context, state: &AppState, now: DateTime<Utc>) {
    egui::TopBottomPanel::top("top_bar")
        .exact_height(36.0)
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                ui.label(
                    RichText::new(format!("{} GIBS Workbench", icons::GLOBE))
                        .strong()
                        .size(16.0)
                        .color(Color32::WHITE),
                );

                ui.separator();

                if let Some(layer) = &state.view.selected_layer {
                    ui.label(RichText::new(layer).size(13.0).strong());
                    ui.label(
                        RichText::new(time_extent::format_day_label(state.view.day_offset, now))
                            .size(13.0)
                            .monospace()
                            .color(Color32::LIGHT_GRAY),
                    );
                    ui.separator();
                }

                if matches!(state.catalog, CatalogState::Loading) {
                    ui.spinner();
                }

                // Status text
                ui.label(
                    RichText::new(&state.status_message)
                        .size(13.0)
                        .color(Color32::GRAY),
                );
            });
        });
}
