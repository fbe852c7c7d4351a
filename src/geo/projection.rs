//! Map projection and coordinate transformation.
//!
//! Handles converting between geographic coordinates (lon/lat) and
//! screen coordinates for rendering on the canvas. GIBS EPSG:4326 tiles
//! are laid out on a plate carrée grid, so the transform is a plain
//! linear scale with no latitude correction.

use eframe::egui::{Pos2, Rect, Vec2};
use geo_types::Coord;

/// Map projection for converting geographic to screen coordinates.
#[derive(Debug, Clone)]
pub struct MapProjection {
    /// Center longitude of the view
    pub center_lon: f64,
    /// Center latitude of the view
    pub center_lat: f64,
    /// Degrees visible from the center to the edge of the shorter screen axis at zoom 1
    pub range_deg: f64,
    /// Current zoom level
    pub zoom: f32,
    /// Pan offset in screen pixels
    pub pan_offset: Vec2,
    /// Screen rectangle for the canvas
    pub screen_rect: Rect,
}

impl Default for MapProjection {
    fn default() -> Self {
        Self {
            center_lon: 0.0,
            center_lat: 0.0,
            // Whole globe fits vertically at zoom 1
            range_deg: 90.0,
            zoom: 1.0,
            pan_offset: Vec2::ZERO,
            screen_rect: Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0)),
        }
    }
}

impl MapProjection {
    pub fn new(center_lon: f64, center_lat: f64) -> Self {
        Self {
            center_lon,
            center_lat,
            ..Default::default()
        }
    }

    /// Updates the projection with current view state.
    pub fn update(&mut self, zoom: f32, pan_offset: Vec2, screen_rect: Rect) {
        self.zoom = zoom;
        self.pan_offset = pan_offset;
        self.screen_rect = screen_rect;
    }

    fn effective_range(&self) -> f64 {
        self.range_deg / self.zoom as f64
    }

    fn half_size(&self) -> f32 {
        self.screen_rect.size().min_elem() / 2.0
    }

    /// Converts geographic coordinates (lon, lat) to screen position.
    pub fn geo_to_screen(&self, coord: Coord<f64>) -> Pos2 {
        let effective_range = self.effective_range();

        let norm_x = (coord.x - self.center_lon) / effective_range;
        let norm_y = -(coord.y - self.center_lat) / effective_range; // Screen Y grows downward

        let center = self.screen_rect.center() + self.pan_offset;
        let half_size = self.half_size();

        Pos2::new(
            center.x + (norm_x as f32) * half_size,
            center.y + (norm_y as f32) * half_size,
        )
    }

    /// Converts screen position to geographic coordinates (lon, lat).
    pub fn screen_to_geo(&self, pos: Pos2) -> Coord<f64> {
        let effective_range = self.effective_range();

        let center = self.screen_rect.center() + self.pan_offset;
        let half_size = self.half_size();

        let norm_x = (pos.x - center.x) / half_size;
        let norm_y = (pos.y - center.y) / half_size;

        Coord {
            x: self.center_lon + (norm_x as f64) * effective_range,
            y: self.center_lat - (norm_y as f64) * effective_range,
        }
    }

    /// Ground resolution of the current view in degrees per screen pixel.
    pub fn degrees_per_pixel(&self) -> f64 {
        self.effective_range() / self.half_size() as f64
    }

    /// Returns the visible geographic bounds as (min_lon, min_lat, max_lon, max_lat).
    pub fn visible_bounds(&self) -> (f64, f64, f64, f64) {
        let top_left = self.screen_to_geo(self.screen_rect.left_top());
        let bottom_right = self.screen_to_geo(self.screen_rect.right_bottom());

        (
            top_left.x.min(bottom_right.x),
            top_left.y.min(bottom_right.y),
            top_left.x.max(bottom_right.x),
            top_left.y.max(bottom_right.y),
        )
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection() -> MapProjection {
        let mut projection = MapProjection::default();
        projection.update(
            1.0,
            Vec2::ZERO,
            Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0)),
        );
        projection
    }

    #[test]
    fn test_center_maps_to_rect_center() {
        let pos = projection().geo_to_screen(Coord { x: 0.0, y: 0.0 });
        assert_eq!(pos, Pos2::new(400.0, 300.0));
    }

    #[test]
    fn test_north_pole_at_top_edge() {
        let pos = projection().geo_to_screen(Coord { x: 0.0, y: 90.0 });
        assert!((pos.y - 0.0).abs() < 1e-3);
    }

    #[test]
    fn test_screen_to_geo_inverts_geo_to_screen() {
        let mut projection = projection();
        projection.zoom = 3.0;
        projection.pan_offset = Vec2::new(25.0, -40.0);

        let coord = Coord { x: -73.5, y: 40.25 };
        let back = projection.screen_to_geo(projection.geo_to_screen(coord));
        assert!((back.x - coord.x).abs() < 1e-3);
        assert!((back.y - coord.y).abs() < 1e-3);
    }

    #[test]
    fn test_degrees_per_pixel_scales_with_zoom() {
        let mut projection = projection();
        assert!((projection.degrees_per_pixel() - 0.3).abs() < 1e-9);
        projection.zoom = 2.0;
        assert!((projection.degrees_per_pixel() - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_visible_bounds() {
        let (min_lon, min_lat, max_lon, max_lat) = projection().visible_bounds();
        // 800x600 at zoom 1 spans 240 degrees of longitude and 180 of latitude
        assert!((min_lon + 120.0).abs() < 1e-3);
        assert!((max_lon - 120.0).abs() < 1e-3);
        assert!((min_lat + 90.0).abs() < 1e-3);
        assert!((max_lat - 90.0).abs() < 1e-3);
    }
}
