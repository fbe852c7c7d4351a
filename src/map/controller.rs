//! Keeps the map in step with the view state.
//!
//! Each UI interaction maps to one controller call, which mutates the
//! [`ViewState`] and issues the matching [`MapCommands`]. At most one data
//! layer and at most one region rectangle are on the map at any time.

use super::{LayerHandle, MapCommands, TileSource};
use crate::geo::Bounds;
use crate::gibs::{request_url, time_extent, CatalogError, LayerDescriptor, LayerRegistry};
use crate::state::{BoundsError, ViewState};
use chrono::{DateTime, Utc};

/// Orchestrates layer selection, day changes and the region rectangle.
pub struct MapController {
    /// WMTS endpoint prefix for tile URLs
    base_url: String,

    /// Data layer currently on the map
    active_layer: Option<LayerHandle>,
}

impl MapController {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            active_layer: None,
        }
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
    }

    /// Switches to the named layer, showing its most recent available day.
    ///
    /// Resets the slider range from the layer's time extent, swaps the data
    /// layer on the map, and refreshes the legend and time-extent list.
    /// Unknown names leave the state and the map untouched.
    pub fn select_layer(
        &mut self,
        view: &mut ViewState,
        registry: &LayerRegistry,
        name: &str,
        map: &mut impl MapCommands,
        now: DateTime<Utc>,
    ) -> Result<(), CatalogError> {
        let layer = registry.get(name)?;
        let range = time_extent::day_range(&layer.time_extent, now);

        view.selected_layer = Some(name.to_string());
        view.day_range = range;
        view.day_offset = range.max;
        view.legend_href = layer.horizontal_legend_href.clone();
        view.time_extents = layer.time_extent.clone();

        log::info!(
            "Selected layer {} ({}), days {}..={}",
            name,
            layer.format.label(),
            range.min,
            range.max
        );

        self.show_layer(layer, view.day_offset, map, now);
        Ok(())
    }

    /// Moves the day slider, clamped to the current range, and re-renders
    /// the selected layer for the new day.
    pub fn set_day_offset(
        &mut self,
        view: &mut ViewState,
        registry: &LayerRegistry,
        day_offset: i64,
        map: &mut impl MapCommands,
        now: DateTime<Utc>,
    ) -> Result<(), CatalogError> {
        let Some(name) = view.selected_layer.as_deref() else {
            view.day_offset = view.day_range.clamp(day_offset);
            log::debug!("Day offset set to {} with no layer selected", view.day_offset);
            return Ok(());
        };
        let layer = registry.get(name)?;
        view.day_offset = view.day_range.clamp(day_offset);

        log::debug!("Day offset for {} set to {}", name, view.day_offset);
        self.show_layer(layer, view.day_offset, map, now);
        Ok(())
    }

    fn show_layer(
        &mut self,
        layer: &LayerDescriptor,
        day_offset: i64,
        map: &mut impl MapCommands,
        now: DateTime<Utc>,
    ) {
        if let Some(handle) = self.active_layer.take() {
            map.remove_layer(handle);
        }

        let url = request_url::build(&self.base_url, day_offset, layer, now);
        log::debug!("Tile URL template: {}", url);

        let source = TileSource::for_layer(layer, url);
        self.active_layer = Some(map.add_layer(source));
    }

    /// Draws the region from the bound inputs, replacing any previous one.
    ///
    /// Non-numeric inputs leave the map untouched.
    pub fn view_rectangle(
        &mut self,
        view: &mut ViewState,
        map: &mut impl MapCommands,
    ) -> Result<Bounds, BoundsError> {
        let bounds = view.bounds_input.parse()?;

        map.clear_rectangles();
        map.draw_rectangle(bounds);
        view.rectangle = Some(bounds);

        log::debug!("Drew region {:?}", bounds);
        Ok(bounds)
    }

    pub fn clear_rectangles(&mut self, view: &mut ViewState, map: &mut impl MapCommands) {
        map.clear_rectangles();
        view.rectangle = None;
    }
}

/// Export requests are only offered for raster layers.
pub fn export_available(view: &ViewState, registry: &LayerRegistry) -> bool {
    view.selected_layer
        .as_deref()
        .and_then(|name| registry.get(name).ok())
        .is_some_and(|layer| !layer.format.is_vector())
}

#[cfg(test)]
impl MapController {
    pub fn active_layer(&self) -> Option<LayerHandle> {
        self.active_layer
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::gibs::TileFormat;
    use chrono::TimeZone;

    /// A command issued to the fake map.
    #[derive(Debug, Clone, PartialEq)]
    pub enum MapCall {
        Add(LayerHandle, String),
        Remove(LayerHandle),
        Draw(Bounds),
        Clear,
    }

    /// Records commands and tracks what would be on screen.
    #[derive(Default)]
    pub struct RecordingMap {
        pub calls: Vec<MapCall>,
        pub layers: Vec<(LayerHandle, TileSource)>,
        pub rectangles: Vec<Bounds>,
        next_handle: u64,
    }

    impl MapCommands for RecordingMap {
        fn add_layer(&mut self, source: TileSource) -> LayerHandle {
            self.next_handle += 1;
            let handle = LayerHandle(self.next_handle);
            self.calls
                .push(MapCall::Add(handle, source.url_template().to_string()));
            self.layers.push((handle, source));
            handle
        }

        fn remove_layer(&mut self, handle: LayerHandle) {
            self.calls.push(MapCall::Remove(handle));
            self.layers.retain(|(h, _)| *h != handle);
        }

        fn draw_rectangle(&mut self, bounds: Bounds) {
            self.calls.push(MapCall::Draw(bounds));
            self.rectangles.push(bounds);
        }

        fn clear_rectangles(&mut self) {
            self.calls.push(MapCall::Clear);
            self.rectangles.clear();
        }
    }

    pub fn layer(id: &str, format: TileFormat, extent: &[&str]) -> LayerDescriptor {
        LayerDescriptor {
            layer_id: id.to_string(),
            tile_matrix_set: "250m".to_string(),
            format,
            time_extent: extent.iter().map(|s| s.to_string()).collect(),
            horizontal_legend_href: None,
            metadata_href: None,
            bounding_box: None,
            style: None,
        }
    }

    pub fn registry() -> LayerRegistry {
        let mut terra = layer(
            "MODIS_Terra_Aerosol",
            TileFormat::Image("image/png".to_string()),
            &["2020-01-01/2020-01-10/P1D"],
        );
        terra.horizontal_legend_href = Some("https://example/legend_H.svg".to_string());
        terra.metadata_href = Some("https://example/metadata.xml".to_string());

        let fires = layer("VIIRS_Fires", TileFormat::Vector, &[]);

        LayerRegistry::from_layers([
            ("Terra Aerosol".to_string(), terra),
            ("VIIRS Fires".to_string(), fires),
        ])
    }

    fn jan_20() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 20, 0, 0, 0).unwrap()
    }

    fn controller() -> MapController {
        MapController::new("https://gibs.example/wmts.cgi?")
    }

    #[test]
    fn test_select_layer_sets_range_and_renders_latest_day() {
        let mut view = ViewState::default();
        let mut map = RecordingMap::default();
        let mut controller = controller();

        controller
            .select_layer(&mut view, &registry(), "Terra Aerosol", &mut map, jan_20())
            .unwrap();

        assert_eq!(view.selected_layer.as_deref(), Some("Terra Aerosol"));
        assert_eq!(view.day_range.min, -19);
        assert_eq!(view.day_range.max, -10);
        assert_eq!(view.day_offset, -10);
        assert_eq!(
            view.legend_href.as_deref(),
            Some("https://example/legend_H.svg")
        );
        assert_eq!(view.time_extents, vec!["2020-01-01/2020-01-10/P1D"]);

        assert_eq!(map.layers.len(), 1);
        let (_, source) = &map.layers[0];
        assert!(!source.is_vector());
        assert!(source.url_template().contains("TIME=2020-01-10T00:00:00Z"));
        assert!(source.url_template().contains("layer=MODIS_Terra_Aerosol"));
    }

    #[test]
    fn test_switching_layers_keeps_one_active_layer() {
        let mut view = ViewState::default();
        let mut map = RecordingMap::default();
        let mut controller = controller();
        let registry = registry();

        controller
            .select_layer(&mut view, &registry, "Terra Aerosol", &mut map, jan_20())
            .unwrap();
        let first = controller.active_layer().unwrap();
        controller
            .select_layer(&mut view, &registry, "VIIRS Fires", &mut map, jan_20())
            .unwrap();

        assert_eq!(map.layers.len(), 1);
        assert_eq!(map.layers[0].1.layer_id(), "VIIRS_Fires");
        assert!(map.layers[0].1.is_vector());
        assert_eq!(controller.active_layer(), Some(map.layers[0].0));

        // The old layer was removed before the new one was added
        assert_eq!(map.calls[1], MapCall::Remove(first));
        assert!(matches!(map.calls[2], MapCall::Add(..)));

        // Vector layer without extent: fallback window, no legend
        assert_eq!(view.day_range.min, -10);
        assert_eq!(view.day_offset, 0);
        assert!(view.legend_href.is_none());
        assert!(view.time_extents.is_empty());
    }

    #[test]
    fn test_unknown_layer_leaves_state_untouched() {
        let mut view = ViewState::default();
        let mut map = RecordingMap::default();
        let mut controller = controller();

        let result = controller.select_layer(&mut view, &registry(), "Nope", &mut map, jan_20());

        assert_eq!(result, Err(CatalogError::NotFound("Nope".to_string())));
        assert!(view.selected_layer.is_none());
        assert!(map.calls.is_empty());
    }

    #[test]
    fn test_day_offset_rerenders_without_changing_range() {
        let mut view = ViewState::default();
        let mut map = RecordingMap::default();
        let mut controller = controller();
        let registry = registry();

        controller
            .select_layer(&mut view, &registry, "Terra Aerosol", &mut map, jan_20())
            .unwrap();
        controller
            .set_day_offset(&mut view, &registry, -15, &mut map, jan_20())
            .unwrap();

        assert_eq!(view.day_offset, -15);
        assert_eq!(view.day_range.min, -19);
        assert_eq!(view.day_range.max, -10);
        assert_eq!(map.layers.len(), 1);
        assert!(map.layers[0]
            .1
            .url_template()
            .contains("TIME=2020-01-05T00:00:00Z"));
    }

    #[test]
    fn test_day_offset_is_clamped() {
        let mut view = ViewState::default();
        let mut map = RecordingMap::default();
        let mut controller = controller();
        let registry = registry();

        controller
            .select_layer(&mut view, &registry, "Terra Aerosol", &mut map, jan_20())
            .unwrap();
        controller
            .set_day_offset(&mut view, &registry, 5, &mut map, jan_20())
            .unwrap();
        assert_eq!(view.day_offset, -10);

        controller
            .set_day_offset(&mut view, &registry, -100, &mut map, jan_20())
            .unwrap();
        assert_eq!(view.day_offset, -19);
    }

    #[test]
    fn test_day_offset_for_vanished_layer_keeps_offset() {
        let mut view = ViewState::default();
        let mut map = RecordingMap::default();
        let mut controller = controller();

        controller
            .select_layer(&mut view, &registry(), "Terra Aerosol", &mut map, jan_20())
            .unwrap();
        map.calls.clear();

        let empty = LayerRegistry::default();
        let result = controller.set_day_offset(&mut view, &empty, -15, &mut map, jan_20());

        assert_eq!(
            result,
            Err(CatalogError::NotFound("Terra Aerosol".to_string()))
        );
        assert_eq!(view.day_offset, -10);
        assert!(map.calls.is_empty());
    }

    #[test]
    fn test_day_offset_without_layer_issues_no_commands() {
        let mut view = ViewState::default();
        let mut map = RecordingMap::default();
        let mut controller = controller();

        controller
            .set_day_offset(&mut view, &registry(), -3, &mut map, jan_20())
            .unwrap();

        assert_eq!(view.day_offset, -3);
        assert!(map.calls.is_empty());
    }

    #[test]
    fn test_second_rectangle_replaces_first() {
        let mut view = ViewState::default();
        let mut map = RecordingMap::default();
        let mut controller = controller();

        view.bounds_input.lon_min = "-10".to_string();
        view.bounds_input.lat_min = "-10".to_string();
        view.bounds_input.lon_max = "10".to_string();
        view.bounds_input.lat_max = "10".to_string();
        controller.view_rectangle(&mut view, &mut map).unwrap();

        view.bounds_input.lon_max = "20".to_string();
        let second = controller.view_rectangle(&mut view, &mut map).unwrap();

        assert_eq!(map.rectangles, vec![second]);
        assert_eq!(view.rectangle, Some(Bounds::new(-10.0, -10.0, 20.0, 10.0)));
    }

    #[test]
    fn test_invalid_rectangle_issues_no_commands() {
        let mut view = ViewState::default();
        let mut map = RecordingMap::default();
        let mut controller = controller();

        view.bounds_input.lon_min = "west".to_string();
        let err = controller.view_rectangle(&mut view, &mut map).unwrap_err();

        assert_eq!(err.invalid_fields.len(), 4);
        assert!(map.calls.is_empty());
        assert!(view.rectangle.is_none());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut view = ViewState::default();
        let mut map = RecordingMap::default();
        let mut controller = controller();

        controller.clear_rectangles(&mut view, &mut map);
        controller.clear_rectangles(&mut view, &mut map);

        assert_eq!(map.calls, vec![MapCall::Clear, MapCall::Clear]);
        assert!(map.rectangles.is_empty());
    }

    #[test]
    fn test_export_only_for_raster_layers() {
        let registry = registry();
        let mut view = ViewState::default();
        assert!(!export_available(&view, &registry));

        view.selected_layer = Some("Terra Aerosol".to_string());
        assert!(export_available(&view, &registry));

        view.selected_layer = Some("VIIRS Fires".to_string());
        assert!(!export_available(&view, &registry));

        let jpeg = LayerRegistry::from_layers([(
            "True Color".to_string(),
            layer("MODIS_Terra_TrueColor", TileFormat::Image("image/jpeg".to_string()), &[]),
        )]);
        view.selected_layer = Some("True Color".to_string());
        assert!(export_available(&view, &jpeg));
    }
}
