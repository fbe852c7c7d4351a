//! WMTS GetTile URL templates for a layer on a given day.

use super::catalog::LayerDescriptor;
use super::time_extent::date_for_offset;
use chrono::{DateTime, Utc};

/// GIBS "best available" EPSG:4326 WMTS endpoint.
pub const DEFAULT_WMTS_BASE_URL: &str = "https://gibs.earthdata.nasa.gov/wmts/epsg4326/best/wmts.cgi?";

/// Builds the tile URL template for `layer` on the day `day_offset` days from `now`.
///
/// The `{z}`, `{x}` and `{y}` placeholders are left in place for the tiling
/// library to fill per tile.
pub fn build(
    base_url: &str,
    day_offset: i64,
    layer: &LayerDescriptor,
    now: DateTime<Utc>,
) -> String {
    let date = date_for_offset(day_offset, now).format("%Y-%m-%d");
    format!(
        "{base_url}TIME={date}T00:00:00Z&\
         layer={}&\
         tilematrixset={}&\
         Service=WMTS&\
         Request=GetTile&\
         Version=1.0.0&\
         FORMAT={}&\
         TileMatrix={{z}}&\
         TileCol={{x}}&\
         TileRow={{y}}",
        layer.layer_id,
        layer.tile_matrix_set,
        layer.format.mime(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gibs::catalog::TileFormat;
    use chrono::TimeZone;

    fn modis() -> LayerDescriptor {
        LayerDescriptor {
            layer_id: "MODIS_Terra_CorrectedReflectance_TrueColor".to_string(),
            tile_matrix_set: "250m".to_string(),
            format: TileFormat::Image("image/jpeg".to_string()),
            time_extent: vec!["2000-02-24/2020-01-20/P1D".to_string()],
            horizontal_legend_href: None,
            metadata_href: None,
            bounding_box: None,
            style: None,
        }
    }

    #[test]
    fn test_full_template() {
        let now = Utc.with_ymd_and_hms(2020, 1, 20, 15, 30, 0).unwrap();
        let url = build(DEFAULT_WMTS_BASE_URL, 0, &modis(), now);
        assert_eq!(
            url,
            "https://gibs.earthdata.nasa.gov/wmts/epsg4326/best/wmts.cgi?\
             TIME=2020-01-20T00:00:00Z&\
             layer=MODIS_Terra_CorrectedReflectance_TrueColor&\
             tilematrixset=250m&\
             Service=WMTS&Request=GetTile&Version=1.0.0&\
             FORMAT=image/jpeg&\
             TileMatrix={z}&TileCol={x}&TileRow={y}"
        );
    }

    #[test]
    fn test_offset_shifts_date() {
        let now = Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap();
        let url = build("http://example/?", -1, &modis(), now);
        // 2020 is a leap year
        assert!(url.starts_with("http://example/?TIME=2020-02-29T00:00:00Z&"));

        let url = build("http://example/?", 31, &modis(), now);
        assert!(url.contains("TIME=2020-04-01T00:00:00Z"));
    }

    #[test]
    fn test_vector_format_mime() {
        let mut layer = modis();
        layer.format = TileFormat::Vector;
        let now = Utc.with_ymd_and_hms(2020, 1, 20, 0, 0, 0).unwrap();
        let url = build(DEFAULT_WMTS_BASE_URL, 0, &layer, now);
        assert!(url.contains("FORMAT=application/vnd.mapbox-vector-tile&"));
    }
}
