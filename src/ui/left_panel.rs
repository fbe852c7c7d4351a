//! Left panel UI: layer selection, day slider, legend and time extents.

use crate::gibs::{time_extent, CatalogState};
use crate::state::{AppState, UiAction};
use chrono::{DateTime, Utc};
use eframe::egui::{self, Color32, RichText, ScrollArea};
use egui_phosphor::regular as icons;

pub fn render_left_panel(ctx: &egui::Context, state: &mut AppState, now: DateTime<Utc>) {
    egui::SidePanel::left("left_panel")
        .resizable(true)
        .default_width(280.0)
        .min_width(220.0)
        .max_width(420.0)
        .show(ctx, |ui| {
            ui.heading(format!("{} Layers", icons::STACK));
            ui.separator();

            render_layer_selector(ui, state);
            ui.add_space(10.0);

            if state.view.selected_layer.is_some() {
                render_day_slider(ui, state, now);
                ui.add_space(10.0);
                render_legend(ui, state);
                ui.add_space(5.0);
                render_time_extents(ui, state);
            }
        });
}

fn render_layer_selector(ui: &mut egui::Ui, state: &mut AppState) {
    let registry = match &state.catalog {
        CatalogState::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading layer catalog...");
            });
            return;
        }
        CatalogState::Unavailable(msg) => {
            ui.label(
                RichText::new(format!("{} Catalog unavailable", icons::WARNING))
                    .color(Color32::from_rgb(220, 120, 100)),
            );
            ui.label(RichText::new(msg).small().color(Color32::GRAY));
            return;
        }
        CatalogState::Ready(registry) => registry,
    };

    if registry.is_empty() {
        ui.label(RichText::new("Catalog is empty").color(Color32::GRAY));
        return;
    }

    ui.horizontal(|ui| {
        ui.label(icons::MAGNIFYING_GLASS);
        ui.add(
            egui::TextEdit::singleline(&mut state.view.search_text)
                .hint_text("Search layers")
                .desired_width(f32::INFINITY),
        );
    });

    let matches = registry.filter(&state.view.search_text);
    ui.label(
        RichText::new(format!("{} of {} layers", matches.len(), registry.len()))
            .small()
            .color(Color32::GRAY),
    );

    let mut clicked = None;
    ScrollArea::vertical()
        .id_salt("layer_list")
        .max_height(260.0)
        .show(ui, |ui| {
            for name in matches {
                let selected = state.view.selected_layer.as_deref() == Some(name);
                if ui.selectable_label(selected, name).clicked() && !selected {
                    clicked = Some(name.to_string());
                }
            }
        });

    if let Some(name) = clicked {
        state.push_action(UiAction::SelectLayer(name));
    }
}

fn render_day_slider(ui: &mut egui::Ui, state: &mut AppState, now: DateTime<Utc>) {
    ui.label(RichText::new(format!("{} Day", icons::CALENDAR)).strong());

    let range = state.view.day_range;
    let mut offset = state.view.day_offset;
    let response = ui.add(
        egui::Slider::new(&mut offset, range.min..=range.max)
            .show_value(false)
            .clamping(egui::SliderClamping::Always),
    );
    if response.changed() && offset != state.view.day_offset {
        state.push_action(UiAction::SetDayOffset(offset));
    }

    ui.label(
        RichText::new(time_extent::format_day_label(offset, now))
            .monospace()
            .size(13.0),
    );
    ui.label(
        RichText::new(format!("Offset {} ({}..={})", offset, range.min, range.max))
            .small()
            .color(Color32::GRAY),
    );
}

const LEGEND_MAX_WIDTH: f32 = 260.0;

fn render_legend(ui: &mut egui::Ui, state: &AppState) {
    let Some(href) = &state.view.legend_href else {
        return;
    };
    ui.add(legend_image(href));
    ui.hyperlink_to(format!("{} Legend", icons::IMAGE), href);
}

/// Horizontal colorbar fetched from the layer's legend URL.
fn legend_image(href: &str) -> egui::Image<'_> {
    egui::Image::from_uri(href)
        .max_width(LEGEND_MAX_WIDTH)
        .fit_to_original_size(1.0)
}

fn render_time_extents(ui: &mut egui::Ui, state: &mut AppState) {
    let count = state.view.time_extents.len();
    let label = if state.show_time_extents {
        "Hide time extents"
    } else {
        "Show time extents"
    };
    if ui
        .add_enabled(count > 0, egui::Button::new(format!("{} ({})", label, count)))
        .clicked()
    {
        state.show_time_extents = !state.show_time_extents;
    }

    if state.show_time_extents {
        ScrollArea::vertical()
            .id_salt("time_extents")
            .max_height(200.0)
            .show(ui, |ui| {
                for extent in &state.view.time_extents {
                    ui.label(RichText::new(extent).monospace().small());
                }
            });
    }
}
