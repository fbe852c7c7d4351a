//! egui map surface.
//!
//! Draws a plate carrée world with a graticule, the tile grid of the active
//! data layer for the current view resolution, and the export region
//! rectangles. Dragging pans, scrolling zooms about the cursor, and
//! double-clicking resets the view.

use super::{LayerHandle, MapCommands, TileCoord, TileSource};
use crate::geo::{Bounds, MapProjection};
use eframe::egui::{self, Color32, Painter, Pos2, Rect, Sense, Stroke, Vec2};
use geo_types::Coord;

/// Tile outlines beyond this count are not drawn.
const MAX_DRAWN_TILES: usize = 512;

const GRATICULE_STEP_DEG: f64 = 30.0;

const MIN_ZOOM: f32 = 0.5;
const MAX_ZOOM: f32 = 512.0;

/// Features under a map position.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureInfo {
    /// Region rectangles containing the position
    pub rectangles: Vec<Bounds>,
    /// Tile of the active layer at the current view resolution, with its URL
    pub tile: Option<(TileCoord, String)>,
}

impl FeatureInfo {
    pub fn is_empty(&self) -> bool {
        self.rectangles.is_empty() && self.tile.is_none()
    }
}

/// Map rendering surface backed by the egui painter.
pub struct CanvasMap {
    layers: Vec<(LayerHandle, TileSource)>,
    rectangles: Vec<Bounds>,
    next_handle: u64,

    pub zoom: f32,
    pub pan_offset: Vec2,

    /// Projection used for the last frame
    projection: MapProjection,

    /// Geographic position under the pointer
    hover: Option<Coord<f64>>,
}

impl Default for CanvasMap {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasMap {
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            rectangles: Vec::new(),
            next_handle: 0,
            zoom: 1.0,
            pan_offset: Vec2::ZERO,
            projection: MapProjection::new(0.0, 0.0),
            hover: None,
        }
    }

    pub fn hover(&self) -> Option<Coord<f64>> {
        self.hover
    }

    pub fn reset_view(&mut self) {
        self.zoom = 1.0;
        self.pan_offset = Vec2::ZERO;
    }

    /// Matrix level of the active layer's grid that matches the view.
    fn current_level(&self, source: &TileSource) -> usize {
        source
            .grid()
            .level_for_resolution(self.projection.degrees_per_pixel())
    }

    /// Rectangles and the active tile at a geographic position.
    pub fn features_at(&self, coord: Coord<f64>) -> FeatureInfo {
        let rectangles = self
            .rectangles
            .iter()
            .filter(|bounds| bounds.contains(coord))
            .copied()
            .collect();

        let tile = self.layers.last().and_then(|(_, source)| {
            let level = self.current_level(source);
            source
                .grid()
                .tile_at(coord, level)
                .map(|tile| (tile, source.tile_url(tile)))
        });

        FeatureInfo { rectangles, tile }
    }

    /// Allocates the remaining space of `ui` and draws the map into it.
    pub fn show(&mut self, ui: &mut egui::Ui) -> egui::Response {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let rect = response.rect;

        self.handle_interaction(&response, &rect);
        self.projection.update(self.zoom, self.pan_offset, rect);
        self.hover = response
            .hover_pos()
            .map(|pos| self.projection.screen_to_geo(pos));

        painter.rect_filled(rect, 0.0, Color32::from_rgb(20, 20, 35));
        self.draw_world(&painter);
        for (_, source) in &self.layers {
            self.draw_tiles(&painter, source);
        }
        for bounds in &self.rectangles {
            self.draw_rectangle_shape(&painter, bounds);
        }

        response
    }

    fn handle_interaction(&mut self, response: &egui::Response, rect: &Rect) {
        if response.dragged() {
            self.pan_offset += response.drag_delta();
        }

        if response.hovered() {
            let scroll_delta = response.ctx.input(|i| i.raw_scroll_delta);
            if scroll_delta.y != 0.0 {
                let zoom_factor = 1.0 + scroll_delta.y * 0.001;
                let old_zoom = self.zoom;
                let new_zoom = (old_zoom * zoom_factor).clamp(MIN_ZOOM, MAX_ZOOM);

                // Keep the point under the cursor stationary
                if let Some(cursor_pos) = response.hover_pos() {
                    let cursor_rel = cursor_pos - rect.center();
                    let ratio = new_zoom / old_zoom;
                    self.pan_offset = cursor_rel * (1.0 - ratio) + self.pan_offset * ratio;
                }

                self.zoom = new_zoom;
            }
        }

        if response.double_clicked() {
            self.reset_view();
        }
    }

    fn screen_rect_of(&self, bounds: &Bounds) -> Rect {
        Rect::from_two_pos(
            self.projection.geo_to_screen(Coord {
                x: bounds.lon_min(),
                y: bounds.lat_max(),
            }),
            self.projection.geo_to_screen(Coord {
                x: bounds.lon_max(),
                y: bounds.lat_min(),
            }),
        )
    }

    fn draw_world(&self, painter: &Painter) {
        let world = Bounds::new(-180.0, -90.0, 180.0, 90.0);
        let world_rect = self.screen_rect_of(&world);
        painter.rect_filled(world_rect, 0.0, Color32::from_rgb(28, 36, 52));

        let grid_color = Color32::from_rgba_unmultiplied(90, 110, 140, 90);
        let mut lon = -180.0;
        while lon <= 180.0 {
            let top = self.projection.geo_to_screen(Coord { x: lon, y: 90.0 });
            let bottom = self.projection.geo_to_screen(Coord { x: lon, y: -90.0 });
            painter.line_segment([top, bottom], Stroke::new(1.0, grid_color));
            lon += GRATICULE_STEP_DEG;
        }
        let mut lat = -90.0;
        while lat <= 90.0 {
            let left = self.projection.geo_to_screen(Coord { x: -180.0, y: lat });
            let right = self.projection.geo_to_screen(Coord { x: 180.0, y: lat });
            painter.line_segment([left, right], Stroke::new(1.0, grid_color));
            lat += GRATICULE_STEP_DEG;
        }

        // Equator and prime meridian stand out
        let axis_color = Color32::from_rgba_unmultiplied(130, 150, 180, 140);
        painter.line_segment(
            [
                self.projection.geo_to_screen(Coord { x: -180.0, y: 0.0 }),
                self.projection.geo_to_screen(Coord { x: 180.0, y: 0.0 }),
            ],
            Stroke::new(1.5, axis_color),
        );
        painter.line_segment(
            [
                self.projection.geo_to_screen(Coord { x: 0.0, y: 90.0 }),
                self.projection.geo_to_screen(Coord { x: 0.0, y: -90.0 }),
            ],
            Stroke::new(1.5, axis_color),
        );
    }

    fn draw_tiles(&self, painter: &Painter, source: &TileSource) {
        let (lon_min, lat_min, lon_max, lat_max) = self.projection.visible_bounds();
        let visible = Bounds::new(lon_min, lat_min, lon_max, lat_max);
        let level = self.current_level(source);
        let tiles = source.grid().tiles_in(&visible, level);

        if tiles.len() > MAX_DRAWN_TILES {
            log::debug!("Skipping {} tile outlines at level {}", tiles.len(), level);
            return;
        }

        let (fill, outline) = if source.is_vector() {
            (
                Color32::from_rgba_unmultiplied(230, 140, 40, 18),
                Color32::from_rgb(230, 140, 40),
            )
        } else {
            (
                Color32::from_rgba_unmultiplied(40, 190, 170, 18),
                Color32::from_rgb(40, 190, 170),
            )
        };

        for tile in tiles {
            let tile_rect = self.screen_rect_of(&source.grid().tile_bounds(tile));
            painter.rect_filled(tile_rect, 0.0, fill);
            painter.rect_stroke(
                tile_rect,
                0.0,
                Stroke::new(1.0, outline),
                egui::StrokeKind::Inside,
            );

            if tile_rect.width() > 60.0 && tile_rect.height() > 24.0 {
                painter.text(
                    tile_rect.center(),
                    egui::Align2::CENTER_CENTER,
                    format!("{}/{}/{}", tile.z, tile.x, tile.y),
                    egui::FontId::monospace(11.0),
                    outline,
                );
            }
        }
    }

    fn draw_rectangle_shape(&self, painter: &Painter, bounds: &Bounds) {
        let points: Vec<Pos2> = bounds
            .ring()
            .iter()
            .map(|coord| self.projection.geo_to_screen(*coord))
            .collect();

        painter.rect_filled(
            self.screen_rect_of(bounds),
            0.0,
            Color32::from_rgba_unmultiplied(0, 0, 255, 26),
        );
        painter.add(egui::Shape::line(
            points,
            Stroke::new(2.0, Color32::from_rgb(0, 0, 255)),
        ));
    }
}

impl MapCommands for CanvasMap {
    fn add_layer(&mut self, source: TileSource) -> LayerHandle {
        self.next_handle += 1;
        let handle = LayerHandle(self.next_handle);
        log::debug!("Adding layer {} as {:?}", source.layer_id(), handle);
        self.layers.push((handle, source));
        handle
    }

    fn remove_layer(&mut self, handle: LayerHandle) {
        self.layers.retain(|(h, _)| *h != handle);
    }

    fn draw_rectangle(&mut self, bounds: Bounds) {
        self.rectangles.push(bounds);
    }

    fn clear_rectangles(&mut self) {
        self.rectangles.clear();
    }
}

#[cfg(test)]
impl CanvasMap {
    /// Data layers in draw order.
    fn layers(&self) -> impl Iterator<Item = &TileSource> {
        self.layers.iter().map(|(_, source)| source)
    }

    fn rectangles(&self) -> &[Bounds] {
        &self.rectangles
    }
}
