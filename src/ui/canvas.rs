//! Central canvas UI: the map and its overlay readouts.

use crate::gibs::time_extent;
use crate::map::CanvasMap;
use crate::state::AppState;
use chrono::{DateTime, Utc};
use eframe::egui::{self, Color32, Rect, RichText, Vec2};

pub fn render_canvas(
    ctx: &egui::Context,
    state: &AppState,
    map: &mut CanvasMap,
    now: DateTime<Utc>,
) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let response = map.show(ui);
        draw_overlay_info(ui, &response.rect, state, map, now);
        draw_hover_info(ui, &response.rect, map);
    });
}

fn overlay_text(text: String) -> RichText {
    RichText::new(text)
        .monospace()
        .size(12.0)
        .color(Color32::from_rgb(200, 200, 220))
}

fn draw_overlay_info(
    ui: &mut egui::Ui,
    rect: &Rect,
    state: &AppState,
    map: &CanvasMap,
    now: DateTime<Utc>,
) {
    let overlay_pos = rect.left_top() + Vec2::new(10.0, 10.0);
    let overlay_rect = Rect::from_min_size(overlay_pos, Vec2::new(320.0, 70.0));

    ui.scope_builder(egui::UiBuilder::new().max_rect(overlay_rect), |ui| {
        ui.vertical(|ui| {
            let layer = state.view.selected_layer.as_deref().unwrap_or("No layer");
            ui.label(overlay_text(format!("Layer: {}", layer)));
            if state.view.selected_layer.is_some() {
                ui.label(overlay_text(format!(
                    "Date:  {}",
                    time_extent::date_for_offset(state.view.day_offset, now)
                )));
            }
            ui.label(overlay_text(format!("Zoom:  {:.1}x", map.zoom)));
        });
    });
}

fn draw_hover_info(ui: &mut egui::Ui, rect: &Rect, map: &CanvasMap) {
    let Some(coord) = map.hover() else {
        return;
    };

    let info = map.features_at(coord);
    let overlay_pos = rect.left_bottom() + Vec2::new(10.0, -80.0);
    let overlay_rect = Rect::from_min_size(overlay_pos, Vec2::new(rect.width() - 20.0, 70.0));

    ui.scope_builder(egui::UiBuilder::new().max_rect(overlay_rect), |ui| {
        ui.vertical(|ui| {
            ui.label(overlay_text(format!("Lon {:.4}  Lat {:.4}", coord.x, coord.y)));
            if info.is_empty() {
                return;
            }
            if let Some((tile, url)) = &info.tile {
                ui.label(overlay_text(format!(
                    "Tile {}/{}/{}",
                    tile.z, tile.x, tile.y
                )));
                ui.label(
                    RichText::new(url)
                        .monospace()
                        .size(10.0)
                        .color(Color32::GRAY),
                );
            }
            if !info.rectangles.is_empty() {
                ui.label(overlay_text("Inside export region".to_string()));
            }
        });
    });
}
