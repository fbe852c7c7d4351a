//! Map layer management.
//!
//! The controller never touches rendering directly. It issues a small set
//! of commands through [`MapCommands`]:
//! - add/remove the tiled data layer for the selected GIBS layer and day
//! - draw/clear the export region rectangle
//!
//! [`CanvasMap`] is the egui implementation used by the application.

mod canvas_map;
mod controller;
mod tile_grid;

pub use canvas_map::CanvasMap;
pub use controller::{export_available, MapController};
pub use tile_grid::{resolve_template, TileCoord, TileGrid};

#[cfg(test)]
pub(crate) use controller::tests as controller_tests;

use crate::geo::Bounds;
use crate::gibs::LayerDescriptor;

/// Opaque handle to a layer added to the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerHandle(pub u64);

/// A tiled data source ready to be rendered.
///
/// Raster and vector layers share the tile grid and URL template; they only
/// differ in how the rendering side decodes and styles the tiles.
#[derive(Debug, Clone, PartialEq)]
pub enum TileSource {
    Raster {
        layer_id: String,
        url_template: String,
        mime: String,
        matrix_set: String,
        grid: TileGrid,
    },
    VectorTile {
        layer_id: String,
        url_template: String,
        matrix_set: String,
        grid: TileGrid,
    },
}

impl TileSource {
    /// Picks the raster or vector variant from the layer's format.
    pub fn for_layer(layer: &LayerDescriptor, url_template: String) -> Self {
        let grid = TileGrid::gibs_epsg4326();
        if layer.format.is_vector() {
            TileSource::VectorTile {
                layer_id: layer.layer_id.clone(),
                url_template,
                matrix_set: layer.tile_matrix_set.clone(),
                grid,
            }
        } else {
            TileSource::Raster {
                layer_id: layer.layer_id.clone(),
                url_template,
                mime: layer.format.mime().to_string(),
                matrix_set: layer.tile_matrix_set.clone(),
                grid,
            }
        }
    }

    pub fn layer_id(&self) -> &str {
        match self {
            TileSource::Raster { layer_id, .. } | TileSource::VectorTile { layer_id, .. } => {
                layer_id
            }
        }
    }

    pub fn url_template(&self) -> &str {
        match self {
            TileSource::Raster { url_template, .. }
            | TileSource::VectorTile { url_template, .. } => url_template,
        }
    }

    pub fn grid(&self) -> &TileGrid {
        match self {
            TileSource::Raster { grid, .. } | TileSource::VectorTile { grid, .. } => grid,
        }
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, TileSource::VectorTile { .. })
    }

    /// Concrete request URL for one tile.
    pub fn tile_url(&self, tile: TileCoord) -> String {
        resolve_template(self.url_template(), tile)
    }
}

/// Commands the controller issues to the map rendering side.
///
/// Implementations must treat removal of an unknown handle and clearing an
/// empty rectangle set as no-ops.
pub trait MapCommands {
    /// Adds a tiled data layer on top of the base layers.
    fn add_layer(&mut self, source: TileSource) -> LayerHandle;

    fn remove_layer(&mut self, handle: LayerHandle);

    /// Draws a region outline overlay.
    fn draw_rectangle(&mut self, bounds: Bounds);

    /// Removes every region overlay.
    fn clear_rectangles(&mut self);
}
