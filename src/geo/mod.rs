//! Geographic primitives shared by the map, catalog, and export code.
//!
//! Everything here works in plain WGS84 longitude/latitude degrees, the
//! coordinate system of the GIBS EPSG:4326 endpoint.

mod bounds;
mod projection;

pub use bounds::Bounds;
pub use projection::MapProjection;
