//! Longitude/latitude bounding boxes.

use geo_types::{coord, Coord, Rect};

/// An axis-aligned lon/lat box.
///
/// Corners are normalized on construction, so `lon_min <= lon_max` and
/// `lat_min <= lat_max` always hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds(Rect<f64>);

impl Bounds {
    pub fn new(lon_min: f64, lat_min: f64, lon_max: f64, lat_max: f64) -> Self {
        Self(Rect::new(
            coord! { x: lon_min, y: lat_min },
            coord! { x: lon_max, y: lat_max },
        ))
    }

    pub fn lon_min(&self) -> f64 {
        self.0.min().x
    }

    pub fn lat_min(&self) -> f64 {
        self.0.min().y
    }

    pub fn lon_max(&self) -> f64 {
        self.0.max().x
    }

    pub fn lat_max(&self) -> f64 {
        self.0.max().y
    }

    /// Whether the coordinate lies inside or on the edge of the box.
    pub fn contains(&self, coord: Coord<f64>) -> bool {
        coord.x >= self.lon_min()
            && coord.x <= self.lon_max()
            && coord.y >= self.lat_min()
            && coord.y <= self.lat_max()
    }

    /// Closed exterior ring, starting and ending at the south-west corner.
    pub fn ring(&self) -> [Coord<f64>; 5] {
        let (w, s, e, n) = (self.lon_min(), self.lat_min(), self.lon_max(), self.lat_max());
        [
            coord! { x: w, y: s },
            coord! { x: w, y: n },
            coord! { x: e, y: n },
            coord! { x: e, y: s },
            coord! { x: w, y: s },
        ]
    }
}
