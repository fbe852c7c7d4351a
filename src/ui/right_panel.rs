//! Right panel UI: region bounds, export form, and settings.

use crate::gibs::ExportStatus;
use crate::state::{calendar_date, AppState, UiAction};
use eframe::egui::{self, Color32, RichText, ScrollArea};
use egui_phosphor::regular as icons;

pub fn render_right_panel(ctx: &egui::Context, state: &mut AppState, export_available: bool) {
    egui::SidePanel::right("right_panel")
        .resizable(true)
        .default_width(260.0)
        .min_width(200.0)
        .max_width(380.0)
        .show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Region");
                ui.separator();

                render_bounds_section(ui, state);
                ui.add_space(5.0);

                render_export_section(ui, state, export_available);
                ui.add_space(5.0);

                render_settings_section(ui, state);
            });
        });
}

fn bound_input(ui: &mut egui::Ui, label: &str, text: &mut String) {
    ui.label(label);
    ui.add(
        egui::TextEdit::singleline(text)
            .desired_width(90.0)
            .font(egui::FontId::monospace(12.0)),
    );
    ui.end_row();
}

fn render_bounds_section(ui: &mut egui::Ui, state: &mut AppState) {
    egui::CollapsingHeader::new(RichText::new("Bounds").strong())
        .default_open(true)
        .show(ui, |ui| {
            let input = &mut state.view.bounds_input;
            egui::Grid::new("bounds_grid")
                .num_columns(2)
                .spacing([8.0, 4.0])
                .show(ui, |ui| {
                    bound_input(ui, "Lon min", &mut input.lon_min);
                    bound_input(ui, "Lat min", &mut input.lat_min);
                    bound_input(ui, "Lon max", &mut input.lon_max);
                    bound_input(ui, "Lat max", &mut input.lat_max);
                });

            ui.horizontal(|ui| {
                if ui.button(format!("{} View", icons::EYE)).clicked() {
                    state.push_action(UiAction::ViewRectangle);
                }
                if ui.button(format!("{} Clear", icons::TRASH)).clicked() {
                    state.push_action(UiAction::ClearRectangles);
                }
            });

            let has_layer = state.view.selected_layer.is_some();
            if ui
                .add_enabled(
                    has_layer,
                    egui::Button::new(format!("{} Use layer extent", icons::CROP)),
                )
                .clicked()
            {
                state.push_action(UiAction::UseLayerExtent);
            }

            if let Some(bounds) = state.view.rectangle {
                ui.label(
                    RichText::new(format!(
                        "Drawn: {:.2}, {:.2} to {:.2}, {:.2}",
                        bounds.lon_min(),
                        bounds.lat_min(),
                        bounds.lon_max(),
                        bounds.lat_max()
                    ))
                    .small()
                    .color(Color32::GRAY),
                );
            }
        });
}

/// Date field that turns red while its text is not a `YYYY-MM-DD` date.
fn date_input(ui: &mut egui::Ui, text: &mut String) {
    let invalid = !text.trim().is_empty() && calendar_date(text).is_none();
    let mut edit = egui::TextEdit::singleline(text)
        .hint_text("YYYY-MM-DD")
        .desired_width(110.0);
    if invalid {
        edit = edit.text_color(Color32::from_rgb(220, 100, 100));
    }
    ui.add(edit);
}

fn render_export_section(ui: &mut egui::Ui, state: &mut AppState, export_available: bool) {
    egui::CollapsingHeader::new(RichText::new("Export").strong())
        .default_open(true)
        .show(ui, |ui| {
            let window = &mut state.view.export_window;
            egui::Grid::new("export_grid")
                .num_columns(2)
                .spacing([8.0, 4.0])
                .show(ui, |ui| {
                    ui.label("Start date");
                    date_input(ui, &mut window.start_date);
                    ui.end_row();

                    ui.label("End date");
                    date_input(ui, &mut window.end_date);
                    ui.end_row();
                });

            if export_available {
                if ui
                    .button(format!("{} Download", icons::DOWNLOAD_SIMPLE))
                    .clicked()
                {
                    state.push_action(UiAction::Download);
                }
            } else if state.view.selected_layer.is_some() {
                ui.label(
                    RichText::new("Export is only available for image layers")
                        .small()
                        .color(Color32::GRAY),
                );
            }

            if let Some(msg) = &state.missing_fields {
                ui.add_space(4.0);
                ui.label(
                    RichText::new(format!("{} {}", icons::WARNING, msg))
                        .color(Color32::from_rgb(230, 180, 80)),
                );
            }

            if let Some(label) = state.export_status.label() {
                ui.add_space(4.0);
                ui.group(|ui| {
                    ui.horizontal(|ui| match state.export_status {
                        ExportStatus::Generating => {
                            ui.spinner();
                            ui.label(RichText::new(label).strong());
                        }
                        _ => {
                            ui.label(
                                RichText::new(format!("{} {}", icons::CHECK_CIRCLE, label))
                                    .strong()
                                    .color(Color32::from_rgb(100, 200, 100)),
                            );
                        }
                    });
                });
            }
        });
}

fn render_settings_section(ui: &mut egui::Ui, state: &mut AppState) {
    egui::CollapsingHeader::new(RichText::new(format!("{} Settings", icons::GEAR)).strong())
        .default_open(false)
        .show(ui, |ui| {
            let settings = &mut state.settings;

            ui.label(RichText::new("WMTS endpoint").small());
            ui.text_edit_singleline(&mut settings.wmts_base_url);
            ui.label(RichText::new("Layer catalog").small());
            ui.text_edit_singleline(&mut settings.catalog_url);
            ui.label(RichText::new("Export endpoint").small());
            ui.text_edit_singleline(&mut settings.export_url);
            ui.add(
                egui::Slider::new(&mut settings.finished_display_secs, 1..=60)
                    .text("Finished panel (s)"),
            );

            if ui.button(format!("{} Save", icons::FLOPPY_DISK)).clicked() {
                state.push_action(UiAction::SaveSettings);
            }
            ui.label(
                RichText::new("Catalog changes apply on reload")
                    .small()
                    .color(Color32::GRAY),
            );
        });
}
