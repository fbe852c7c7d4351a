//! NASA GIBS integration.
//!
//! This module provides functionality for:
//! - Loading the layer catalog and looking up layer descriptors
//! - Deriving the selectable day range from a layer's time extent
//! - Building WMTS tile URL templates for a layer and day
//! - Validating and posting data export requests

mod catalog;
mod catalog_channel;
mod export;
mod export_channel;
mod http;
pub mod request_url;
pub mod time_extent;

pub use catalog::{CatalogError, CatalogState, LayerDescriptor, LayerRegistry};
pub use catalog_channel::CatalogChannel;
pub use export::{apply_outcome, submit, ExportBackend, ExportError, ExportStatus};
pub use export_channel::ExportChannel;
pub use time_extent::DayRange;

#[cfg(test)]
pub use catalog::{LayerBoundingBox, TileFormat};
#[cfg(test)]
pub use export::ExportRequest;
