//! Session view state: selected layer, day slider, region and export form.

use crate::geo::Bounds;
use crate::gibs::DayRange;
use chrono::NaiveDate;

pub const LON_MIN_LABEL: &str = "Longitude Minimum";
pub const LAT_MIN_LABEL: &str = "Latitude Minimum";
pub const LON_MAX_LABEL: &str = "Longitude Maximum";
pub const LAT_MAX_LABEL: &str = "Latitude Maximum";

/// One or more region bound inputs are not numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundsError {
    pub invalid_fields: Vec<&'static str>,
}

impl std::fmt::Display for BoundsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Please enter valid numerical values for: {}",
            self.invalid_fields.join(", ")
        )
    }
}

impl std::error::Error for BoundsError {}

/// Raw text of the four region bound inputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundsInput {
    pub lon_min: String,
    pub lat_min: String,
    pub lon_max: String,
    pub lat_max: String,
}

impl BoundsInput {
    /// Each input paired with its label, in display order.
    pub fn fields(&self) -> [(&'static str, &str); 4] {
        [
            (LON_MIN_LABEL, &self.lon_min),
            (LAT_MIN_LABEL, &self.lat_min),
            (LON_MAX_LABEL, &self.lon_max),
            (LAT_MAX_LABEL, &self.lat_max),
        ]
    }

    /// Parses each input; `None` where the text is empty or not a finite number.
    pub fn values(&self) -> [Option<f64>; 4] {
        self.fields().map(|(_, text)| parse_number(text))
    }

    /// Labels of the inputs that do not hold a number.
    pub fn invalid_fields(&self) -> Vec<&'static str> {
        self.fields()
            .iter()
            .zip(self.values())
            .filter(|(_, value)| value.is_none())
            .map(|((label, _), _)| *label)
            .collect()
    }

    pub fn parse(&self) -> Result<Bounds, BoundsError> {
        match self.values() {
            [Some(lon_min), Some(lat_min), Some(lon_max), Some(lat_max)] => {
                Ok(Bounds::new(lon_min, lat_min, lon_max, lat_max))
            }
            _ => Err(BoundsError {
                invalid_fields: self.invalid_fields(),
            }),
        }
    }

    /// Overwrites the inputs with the given bounds.
    pub fn set_from(&mut self, bounds: &Bounds) {
        self.lon_min = bounds.lon_min().to_string();
        self.lat_min = bounds.lat_min().to_string();
        self.lon_max = bounds.lon_max().to_string();
        self.lat_max = bounds.lat_max().to_string();
    }
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Start/end dates of the export window as entered (`YYYY-MM-DD`).
///
/// Each date must be a real calendar day; ordering is left to the export
/// backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportWindow {
    pub start_date: String,
    pub end_date: String,
}

impl ExportWindow {
    pub fn start(&self) -> Option<&str> {
        calendar_date(&self.start_date)
    }

    pub fn end(&self) -> Option<&str> {
        calendar_date(&self.end_date)
    }
}

/// The trimmed text when it parses as `YYYY-MM-DD`.
pub fn calendar_date(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .map(|_| trimmed)
}

/// Mutable per-session view state.
#[derive(Debug, Default)]
pub struct ViewState {
    /// Catalog name of the selected layer
    pub selected_layer: Option<String>,

    /// Displayed day relative to today (0 = today)
    pub day_offset: i64,

    /// Slider bounds for the selected layer
    pub day_range: DayRange,

    /// Text of the region bound inputs
    pub bounds_input: BoundsInput,

    /// Region currently drawn on the map
    pub rectangle: Option<Bounds>,

    pub export_window: ExportWindow,

    /// Horizontal legend image of the selected layer
    pub legend_href: Option<String>,

    /// Time extents of the selected layer, for display
    pub time_extents: Vec<String>,

    /// Layer selector search text
    pub search_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(values: [&str; 4]) -> BoundsInput {
        BoundsInput {
            lon_min: values[0].to_string(),
            lat_min: values[1].to_string(),
            lon_max: values[2].to_string(),
            lat_max: values[3].to_string(),
        }
    }

    #[test]
    fn test_parse_valid_bounds() {
        let bounds = input(["-10", " -5.5 ", "10", "5.5"]).parse().unwrap();
        assert_eq!(bounds, Bounds::new(-10.0, -5.5, 10.0, 5.5));
    }

    #[test]
    fn test_parse_reports_every_invalid_field() {
        let err = input(["", "abc", "10", "NaN"]).parse().unwrap_err();
        assert_eq!(
            err.invalid_fields,
            vec![LON_MIN_LABEL, LAT_MIN_LABEL, LAT_MAX_LABEL]
        );
    }

    #[test]
    fn test_set_from_round_trips() {
        let mut bounds_input = BoundsInput::default();
        bounds_input.set_from(&Bounds::new(-180.0, -90.0, 180.0, 90.0));
        assert_eq!(bounds_input.lon_min, "-180");
        assert_eq!(
            bounds_input.parse().unwrap(),
            Bounds::new(-180.0, -90.0, 180.0, 90.0)
        );
    }

    #[test]
    fn test_export_window_presence() {
        let window = ExportWindow {
            start_date: "2020-01-01".to_string(),
            end_date: "   ".to_string(),
        };
        assert_eq!(window.start(), Some("2020-01-01"));
        assert_eq!(window.end(), None);
    }

    #[test]
    fn test_export_window_rejects_non_dates() {
        let window = ExportWindow {
            start_date: "soon".to_string(),
            end_date: "2020-02-30".to_string(),
        };
        assert_eq!(window.start(), None);
        assert_eq!(window.end(), None);

        assert_eq!(calendar_date(" 2020-02-29 "), Some("2020-02-29"));
        assert_eq!(calendar_date("01/10/2020"), None);
    }
}
