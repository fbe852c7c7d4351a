//! WMTS tiling scheme for the GIBS EPSG:4326 endpoint.
//!
//! The rendering side needs this to turn a `{z}/{x}/{y}` URL template into
//! concrete tile requests: which matrix level suits the current view, which
//! tile covers a coordinate, and what area each tile spans.

use crate::geo::Bounds;
use geo_types::Coord;

/// Degrees per pixel at each matrix level, coarsest first.
const GIBS_RESOLUTIONS: [f64; 9] = [
    0.5625,
    0.28125,
    0.140625,
    0.0703125,
    0.03515625,
    0.017578125,
    0.0087890625,
    0.00439453125,
    0.002197265625,
];

const GIBS_TILE_SIZE: u32 = 512;

/// Address of one tile in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Index into the grid's resolution list
    pub level: usize,
    /// WMTS TileMatrix identifier (`{z}`)
    pub z: u32,
    /// WMTS TileCol (`{x}`)
    pub x: u32,
    /// WMTS TileRow (`{y}`)
    pub y: u32,
}

/// A top-left-origin WMTS tile grid.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    pub origin: Coord<f64>,
    pub extent: Bounds,
    pub resolutions: Vec<f64>,
    pub matrix_ids: Vec<u32>,
    pub tile_size: u32,
}

impl TileGrid {
    /// Grid shared by GIBS raster and vector layers in EPSG:4326.
    pub fn gibs_epsg4326() -> Self {
        Self {
            origin: Coord { x: -180.0, y: 90.0 },
            extent: Bounds::new(-180.0, -90.0, 180.0, 90.0),
            resolutions: GIBS_RESOLUTIONS.to_vec(),
            matrix_ids: (0..GIBS_RESOLUTIONS.len() as u32).collect(),
            tile_size: GIBS_TILE_SIZE,
        }
    }

    pub fn level_count(&self) -> usize {
        self.resolutions.len()
    }

    /// Degrees covered by one tile edge at `level`.
    pub fn tile_span(&self, level: usize) -> f64 {
        self.resolutions[level] * self.tile_size as f64
    }

    /// Number of (columns, rows) needed to cover the extent at `level`.
    pub fn matrix_size(&self, level: usize) -> (u32, u32) {
        let span = self.tile_span(level);
        let width = self.extent.lon_max() - self.origin.x;
        let height = self.origin.y - self.extent.lat_min();
        ((width / span).ceil() as u32, (height / span).ceil() as u32)
    }

    /// Coarsest level that is at least as detailed as `degrees_per_pixel`.
    ///
    /// Views coarser than level 0 use level 0; views finer than the last
    /// level use the last level.
    pub fn level_for_resolution(&self, degrees_per_pixel: f64) -> usize {
        self.resolutions
            .iter()
            .position(|&res| res <= degrees_per_pixel)
            .unwrap_or(self.level_count() - 1)
    }

    /// Tile covering `coord` at `level`, or `None` outside the grid extent.
    pub fn tile_at(&self, coord: Coord<f64>, level: usize) -> Option<TileCoord> {
        if level >= self.level_count() || !self.extent.contains(coord) {
            return None;
        }

        let span = self.tile_span(level);
        let (cols, rows) = self.matrix_size(level);
        let col = ((coord.x - self.origin.x) / span).floor() as u32;
        let row = ((self.origin.y - coord.y) / span).floor() as u32;

        Some(TileCoord {
            level,
            z: self.matrix_ids[level],
            x: col.min(cols - 1),
            y: row.min(rows - 1),
        })
    }

    /// Geographic area of a tile, clipped to the grid extent.
    pub fn tile_bounds(&self, tile: TileCoord) -> Bounds {
        let span = self.tile_span(tile.level);
        let lon_min = self.origin.x + tile.x as f64 * span;
        let lat_max = self.origin.y - tile.y as f64 * span;
        Bounds::new(
            lon_min,
            (lat_max - span).max(self.extent.lat_min()),
            (lon_min + span).min(self.extent.lon_max()),
            lat_max,
        )
    }

    /// Tiles at `level` intersecting the given area.
    pub fn tiles_in(&self, area: &Bounds, level: usize) -> Vec<TileCoord> {
        if area.lon_max() < self.extent.lon_min()
            || area.lon_min() > self.extent.lon_max()
            || area.lat_max() < self.extent.lat_min()
            || area.lat_min() > self.extent.lat_max()
        {
            return Vec::new();
        }
        let clipped = Bounds::new(
            area.lon_min().max(self.extent.lon_min()),
            area.lat_min().max(self.extent.lat_min()),
            area.lon_max().min(self.extent.lon_max()),
            area.lat_max().min(self.extent.lat_max()),
        );

        let (Some(top_left), Some(bottom_right)) = (
            self.tile_at(
                Coord {
                    x: clipped.lon_min(),
                    y: clipped.lat_max(),
                },
                level,
            ),
            self.tile_at(
                Coord {
                    x: clipped.lon_max(),
                    y: clipped.lat_min(),
                },
                level,
            ),
        ) else {
            return Vec::new();
        };

        let mut tiles = Vec::new();
        for y in top_left.y..=bottom_right.y {
            for x in top_left.x..=bottom_right.x {
                tiles.push(TileCoord {
                    level,
                    z: top_left.z,
                    x,
                    y,
                });
            }
        }
        tiles
    }
}

/// Fills the `{z}`, `{x}`, `{y}` placeholders of a tile URL template.
pub fn resolve_template(template: &str, tile: TileCoord) -> String {
    template
        .replace("{z}", &tile.z.to_string())
        .replace("{x}", &tile.x.to_string())
        .replace("{y}", &tile.y.to_string())
}
