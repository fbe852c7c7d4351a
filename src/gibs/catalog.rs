//! Layer catalog: descriptors for every selectable GIBS layer.
//!
//! The catalog is a JSON object keyed by layer name, produced offline from
//! the WMTS GetCapabilities document. Keys use the capabilities' PascalCase
//! element names (`Layer`, `TileMatrixSet`, `Format`, `TimeExtent`, ...).

use crate::geo::Bounds;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mime type GIBS uses for Mapbox vector tiles.
pub const VECTOR_TILE_MIME: &str = "application/vnd.mapbox-vector-tile";

/// Errors raised while loading or querying the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// The catalog could not be fetched or parsed.
    Unavailable(String),
    /// No layer with the given name exists in the catalog.
    NotFound(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Unavailable(msg) => write!(f, "Layer catalog unavailable: {}", msg),
            CatalogError::NotFound(name) => write!(f, "Layer not found: {}", name),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Tile encoding of a layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TileFormat {
    /// Mapbox vector tiles, styled client-side.
    Vector,
    /// Raster tiles with the given mime type (`image/png`, `image/jpeg`).
    Image(String),
}

impl TileFormat {
    /// Mime type passed as the WMTS `FORMAT` parameter.
    pub fn mime(&self) -> &str {
        match self {
            TileFormat::Vector => VECTOR_TILE_MIME,
            TileFormat::Image(mime) => mime,
        }
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, TileFormat::Vector)
    }

    pub fn label(&self) -> &'static str {
        match self {
            TileFormat::Vector => "Vector",
            TileFormat::Image(_) => "Image",
        }
    }
}

impl From<String> for TileFormat {
    fn from(mime: String) -> Self {
        if mime == VECTOR_TILE_MIME {
            TileFormat::Vector
        } else {
            TileFormat::Image(mime)
        }
    }
}

impl From<TileFormat> for String {
    fn from(format: TileFormat) -> Self {
        format.mime().to_string()
    }
}

/// WGS84 bounding box as listed in the capabilities document.
///
/// Corners are space-separated `"lon lat"` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerBoundingBox {
    #[serde(default)]
    pub crs: Option<String>,
    #[serde(rename = "LowerCorner")]
    pub lower_corner: String,
    #[serde(rename = "UpperCorner")]
    pub upper_corner: String,
}

impl LayerBoundingBox {
    pub fn to_bounds(&self) -> Option<Bounds> {
        let (lon_min, lat_min) = parse_corner(&self.lower_corner)?;
        let (lon_max, lat_max) = parse_corner(&self.upper_corner)?;
        Some(Bounds::new(lon_min, lat_min, lon_max, lat_max))
    }
}

fn parse_corner(corner: &str) -> Option<(f64, f64)> {
    let mut parts = corner.split_whitespace();
    let lon = parts.next()?.parse().ok()?;
    let lat = parts.next()?.parse().ok()?;
    Some((lon, lat))
}

/// Metadata describing one selectable imagery layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDescriptor {
    /// WMTS layer identifier
    #[serde(rename = "Layer")]
    pub layer_id: String,

    /// Tiling scheme name (e.g. "250m", "2km")
    #[serde(rename = "TileMatrixSet")]
    pub tile_matrix_set: String,

    #[serde(rename = "Format")]
    pub format: TileFormat,

    /// Availability intervals, `start/end[/period]`
    #[serde(rename = "TimeExtent", default)]
    pub time_extent: Vec<String>,

    #[serde(
        rename = "HorizontalLegendHref",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub horizontal_legend_href: Option<String>,

    #[serde(
        rename = "MetadataHref",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub metadata_href: Option<String>,

    #[serde(
        rename = "BoundingBox",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub bounding_box: Option<LayerBoundingBox>,

    #[serde(rename = "Style", default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

/// All layers available for this session, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct LayerRegistry {
    layers: BTreeMap<String, LayerDescriptor>,
}

impl LayerRegistry {
    /// Parses a catalog document.
    ///
    /// A document that is not a JSON object fails as a whole. Individual
    /// entries missing required fields are skipped with a warning so one
    /// incomplete layer does not hide the rest of the catalog.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: BTreeMap<String, serde_json::Value> =
            serde_json::from_str(json).map_err(|e| CatalogError::Unavailable(e.to_string()))?;

        let mut layers = BTreeMap::new();
        for (name, value) in raw {
            match serde_json::from_value::<LayerDescriptor>(value) {
                Ok(descriptor) => {
                    layers.insert(name, descriptor);
                }
                Err(e) => log::warn!("Skipping catalog entry {}: {}", name, e),
            }
        }

        log::info!("Parsed layer catalog with {} layer(s)", layers.len());
        Ok(Self { layers })
    }

    pub fn get(&self, name: &str) -> Result<&LayerDescriptor, CatalogError> {
        self.layers
            .get(name)
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))
    }

    /// Layer names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layers.keys().map(String::as_str)
    }

    /// Names containing `query`, case-insensitively. An empty query matches all.
    pub fn filter(&self, query: &str) -> Vec<&str> {
        let needle = query.trim().to_lowercase();
        self.names()
            .filter(|name| needle.is_empty() || name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

#[cfg(test)]
impl LayerRegistry {
    /// Builds a registry from already-parsed descriptors.
    pub fn from_layers<I>(layers: I) -> Self
    where
        I: IntoIterator<Item = (String, LayerDescriptor)>,
    {
        Self {
            layers: layers.into_iter().collect(),
        }
    }
}

/// Loading state of the catalog for the current session.
#[derive(Debug, Default)]
pub enum CatalogState {
    #[default]
    Loading,
    Ready(LayerRegistry),
    Unavailable(String),
}

impl CatalogState {
    /// The registry once loading has finished successfully.
    pub fn registry(&self) -> Option<&LayerRegistry> {
        match self {
            CatalogState::Ready(registry) => Some(registry),
            _ => None,
        }
    }
}
