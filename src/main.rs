#![warn(clippy::all)]

//! GIBS Workbench - A web-based viewer for NASA GIBS imagery layers.
//!
//! Pick a layer from the catalog, scrub through the days it is available,
//! outline a region on the map, and request a NetCDF export of that region
//! from the export backend.

mod geo;
mod gibs;
mod map;
mod state;
mod ui;

use chrono::{DateTime, Utc};
use eframe::egui;
use gibs::{
    time_extent, CatalogChannel, CatalogError, CatalogState, ExportBackend, ExportChannel,
    ExportError, LayerRegistry,
};
use map::{CanvasMap, MapCommands, MapController};
use state::{url_state, AppState, Settings, UiAction, UrlParams};
use web_time::Instant;

// Native entry point
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::init();

    let native_options = eframe::NativeOptions::default();

    eframe::run_native(
        "GIBS Workbench",
        native_options,
        Box::new(|cc| Ok(Box::new(WorkbenchApp::new(cc)))),
    )
}

// WASM entry point - main is not called on wasm32
#[cfg(target_arch = "wasm32")]
fn main() {}

/// Entry point for the WASM application.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn start() {
    use eframe::wasm_bindgen::JsCast as _;

    // Redirect `log` messages to `console.log`:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document to attach to");
            return;
        };

        let canvas = match document
            .get_element_by_id("app_canvas")
            .map(|e| e.dyn_into::<web_sys::HtmlCanvasElement>())
        {
            Some(Ok(canvas)) => canvas,
            _ => {
                log::error!("app_canvas is missing or not a HtmlCanvasElement");
                return;
            }
        };

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(WorkbenchApp::new(cc)))),
            )
            .await;

        // Remove the loading text once the app has loaded:
        if let Some(loading_text) = document.get_element_by_id("loading_text") {
            match start_result {
                Ok(_) => {
                    loading_text.remove();
                }
                Err(e) => {
                    loading_text.set_inner_html(
                        "<p>The app has crashed. See the developer console for details.</p>",
                    );
                    log::error!("Failed to start eframe: {e:?}");
                }
            }
        }
    });
}

/// Main application state and logic.
pub struct WorkbenchApp {
    /// Application state containing all sub-states
    state: AppState,

    /// Map surface the controller draws into
    map: CanvasMap,

    controller: MapController,

    /// Channel for the startup catalog load
    catalog_channel: CatalogChannel,

    /// Channel for export request outcomes
    export_channel: ExportChannel,

    /// Query string last written to the address bar
    last_url_query: Option<String>,
}

impl WorkbenchApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let settings = Settings::load();
        let url_params = url_state::parse_from_url();
        log::info!("Starting with URL parameters {:?}", url_params);

        let catalog_channel = CatalogChannel::new();
        catalog_channel.load(cc.egui_ctx.clone(), settings.catalog_url.clone());

        Self {
            controller: MapController::new(settings.wmts_base_url.clone()),
            state: AppState::new(settings, url_params),
            map: CanvasMap::new(),
            catalog_channel,
            export_channel: ExportChannel::new(cc.egui_ctx.clone()),
            last_url_query: None,
        }
    }

    fn sync_url(&mut self) {
        let Some(layer) = &self.state.view.selected_layer else {
            return;
        };
        let query = url_state::build_query(layer, self.state.view.day_offset);
        if self.last_url_query.as_deref() != Some(query.as_str()) {
            url_state::push_to_url(&query);
            self.last_url_query = Some(query);
        }
    }
}

impl eframe::App for WorkbenchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = time_extent::now_utc();

        // Check for the completed catalog load
        if let Some(result) = self.catalog_channel.try_recv() {
            handle_catalog_result(
                &mut self.state,
                &mut self.controller,
                &mut self.map,
                result,
                now,
            );
        }

        // Apply export outcomes in arrival order
        while let Some(outcome) = self.export_channel.try_recv() {
            gibs::apply_outcome(&mut self.state.export_status, outcome, Instant::now());
        }

        let display = self.state.settings.finished_display();
        self.state.export_status.tick(Instant::now(), display);
        if let gibs::ExportStatus::Finished { since } = self.state.export_status {
            // Wake up in time to hide the finished panel
            let remaining = display.saturating_sub(Instant::now().saturating_duration_since(since));
            ctx.request_repaint_after(remaining);
        }

        let export_available = self
            .state
            .catalog
            .registry()
            .is_some_and(|registry| map::export_available(&self.state.view, registry));

        ui::render_top_bar(ctx, &self.state, now);
        ui::render_left_panel(ctx, &mut self.state, now);
        ui::render_right_panel(ctx, &mut self.state, export_available);
        ui::render_canvas(ctx, &self.state, &mut self.map, now);

        for action in self.state.take_actions() {
            handle_action(
                &mut self.state,
                &mut self.controller,
                &mut self.map,
                &self.export_channel,
                action,
                now,
            );
        }

        self.sync_url();
    }
}

/// Stores the loaded catalog and restores the view from the URL.
fn handle_catalog_result(
    state: &mut AppState,
    controller: &mut MapController,
    map: &mut impl MapCommands,
    result: Result<LayerRegistry, CatalogError>,
    now: DateTime<Utc>,
) {
    match result {
        Ok(registry) => {
            state.status_message = format!("{} layers available", registry.len());
            if let Some(params) = state.pending_url_params.take() {
                restore_from_url(state, controller, map, &registry, params, now);
            }
            state.catalog = CatalogState::Ready(registry);
        }
        Err(e) => {
            log::error!("Catalog load failed: {}", e);
            state.status_message = e.to_string();
            state.catalog = CatalogState::Unavailable(e.to_string());
        }
    }
}

fn restore_from_url(
    state: &mut AppState,
    controller: &mut MapController,
    map: &mut impl MapCommands,
    registry: &LayerRegistry,
    params: UrlParams,
    now: DateTime<Utc>,
) {
    let Some(layer) = params.layer else {
        return;
    };

    if let Err(e) = controller.select_layer(&mut state.view, registry, &layer, map, now) {
        log::warn!("Ignoring layer from URL: {}", e);
        return;
    }

    if let Some(day_offset) = params.day_offset {
        if let Err(e) = controller.set_day_offset(&mut state.view, registry, day_offset, map, now)
        {
            log::warn!("Ignoring day offset from URL: {}", e);
        }
    }
}

/// Runs one queued UI interaction against the controller.
fn handle_action(
    state: &mut AppState,
    controller: &mut MapController,
    map: &mut impl MapCommands,
    backend: &impl ExportBackend,
    action: UiAction,
    now: DateTime<Utc>,
) {
    log::debug!("Handling {:?}", action);

    match action {
        UiAction::SelectLayer(name) => {
            let Some(registry) = state.catalog.registry() else {
                return;
            };
            match controller.select_layer(&mut state.view, registry, &name, map, now) {
                Ok(()) => state.status_message = format!("Showing {}", name),
                Err(e) => {
                    log::warn!("{}", e);
                    state.status_message = e.to_string();
                }
            }
        }
        UiAction::SetDayOffset(day_offset) => {
            let Some(registry) = state.catalog.registry() else {
                return;
            };
            if let Err(e) =
                controller.set_day_offset(&mut state.view, registry, day_offset, map, now)
            {
                log::warn!("{}", e);
                state.status_message = e.to_string();
            }
        }
        UiAction::ViewRectangle => match controller.view_rectangle(&mut state.view, map) {
            Ok(_) => state.status_message = "Region drawn".to_string(),
            Err(e) => {
                log::warn!("{}", e);
                state.status_message = e.to_string();
            }
        },
        UiAction::ClearRectangles => controller.clear_rectangles(&mut state.view, map),
        UiAction::Download => {
            let layer = state
                .catalog
                .registry()
                .zip(state.view.selected_layer.as_deref())
                .and_then(|(registry, name)| registry.get(name).ok());

            match gibs::submit(
                &mut state.export_status,
                &state.view,
                layer,
                backend,
                &state.settings.export_url,
            ) {
                Ok(()) => state.missing_fields = None,
                Err(e @ ExportError::MissingFields(_)) => state.missing_fields = Some(e.to_string()),
                Err(e) => state.status_message = e.to_string(),
            }
        }
        UiAction::UseLayerExtent => {
            let bounds = state
                .catalog
                .registry()
                .zip(state.view.selected_layer.as_deref())
                .and_then(|(registry, name)| registry.get(name).ok())
                .and_then(|layer| layer.bounding_box.as_ref())
                .and_then(|bbox| bbox.to_bounds());

            match bounds {
                Some(bounds) => state.view.bounds_input.set_from(&bounds),
                None => state.status_message = "Layer has no bounding box".to_string(),
            }
        }
        UiAction::SaveSettings => {
            state.settings.save();
            controller.set_base_url(state.settings.wmts_base_url.clone());

            // Re-render the current layer against the new endpoint
            if let Some(registry) = state.catalog.registry() {
                let day_offset = state.view.day_offset;
                if let Err(e) =
                    controller.set_day_offset(&mut state.view, registry, day_offset, map, now)
                {
                    log::warn!("{}", e);
                }
            }
            state.status_message = "Settings saved".to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gibs::{ExportRequest, ExportStatus, LayerBoundingBox};
    use crate::map::controller_tests::{registry, RecordingMap};
    use chrono::TimeZone;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingBackend {
        posts: RefCell<Vec<ExportRequest>>,
    }

    impl ExportBackend for RecordingBackend {
        fn post(&self, _url: &str, request: ExportRequest) {
            self.posts.borrow_mut().push(request);
        }
    }

    fn jan_20() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 20, 0, 0, 0).unwrap()
    }

    fn ready_state() -> AppState {
        let mut state = AppState::new(Settings::default(), UrlParams::default());
        state.catalog = CatalogState::Ready(registry());
        state
    }

    fn run(state: &mut AppState, map: &mut RecordingMap, action: UiAction) -> RecordingBackend {
        let backend = RecordingBackend::default();
        let mut controller = MapController::new(state.settings.wmts_base_url.clone());
        handle_action(state, &mut controller, map, &backend, action, jan_20());
        backend
    }

    #[test]
    fn test_catalog_load_restores_url_state() {
        let mut state = AppState::new(
            Settings::default(),
            UrlParams {
                layer: Some("Terra Aerosol".to_string()),
                day_offset: Some(-15),
            },
        );
        let mut controller = MapController::new("https://gibs.example/wmts.cgi?");
        let mut map = RecordingMap::default();

        handle_catalog_result(&mut state, &mut controller, &mut map, Ok(registry()), jan_20());

        assert!(state.catalog.registry().is_some());
        assert!(state.pending_url_params.is_none());
        assert_eq!(state.view.selected_layer.as_deref(), Some("Terra Aerosol"));
        assert_eq!(state.view.day_offset, -15);
        assert_eq!(map.layers.len(), 1);
    }

    #[test]
    fn test_catalog_failure_marks_unavailable() {
        let mut state = AppState::new(Settings::default(), UrlParams::default());
        let mut controller = MapController::new("https://gibs.example/wmts.cgi?");
        let mut map = RecordingMap::default();

        handle_catalog_result(
            &mut state,
            &mut controller,
            &mut map,
            Err(CatalogError::Unavailable("HTTP 404".to_string())),
            jan_20(),
        );

        assert!(matches!(state.catalog, CatalogState::Unavailable(_)));
        assert!(map.calls.is_empty());
    }

    #[test]
    fn test_unknown_url_layer_is_ignored() {
        let mut state = AppState::new(
            Settings::default(),
            UrlParams {
                layer: Some("Gone".to_string()),
                day_offset: Some(-1),
            },
        );
        let mut controller = MapController::new("https://gibs.example/wmts.cgi?");
        let mut map = RecordingMap::default();

        handle_catalog_result(&mut state, &mut controller, &mut map, Ok(registry()), jan_20());

        assert!(state.view.selected_layer.is_none());
        assert!(map.calls.is_empty());
    }

    #[test]
    fn test_download_with_missing_fields_shows_panel() {
        let mut state = ready_state();
        let mut map = RecordingMap::default();
        state.view.selected_layer = Some("Terra Aerosol".to_string());

        let backend = run(&mut state, &mut map, UiAction::Download);

        assert!(backend.posts.borrow().is_empty());
        let msg = state.missing_fields.unwrap();
        assert!(msg.starts_with("Missing Elements: Start Date, End Date"));
        assert_eq!(state.export_status, ExportStatus::Hidden);
    }

    #[test]
    fn test_download_posts_and_clears_panel() {
        let mut state = ready_state();
        let mut map = RecordingMap::default();
        state.view.selected_layer = Some("Terra Aerosol".to_string());
        state.view.export_window.start_date = "2020-01-01".to_string();
        state.view.export_window.end_date = "2020-01-05".to_string();
        state.view.bounds_input.lon_min = "-10".to_string();
        state.view.bounds_input.lat_min = "-10".to_string();
        state.view.bounds_input.lon_max = "10".to_string();
        state.view.bounds_input.lat_max = "10".to_string();
        state.missing_fields = Some("stale".to_string());

        let backend = run(&mut state, &mut map, UiAction::Download);

        let posts = backend.posts.borrow();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].layer, "MODIS_Terra_Aerosol");
        assert_eq!(
            posts[0].metadata_href.as_deref(),
            Some("https://example/metadata.xml")
        );
        assert!(state.missing_fields.is_none());
        assert_eq!(state.export_status, ExportStatus::Generating);
    }

    #[test]
    fn test_use_layer_extent_fills_inputs() {
        let mut terra = registry().get("Terra Aerosol").unwrap().clone();
        terra.bounding_box = Some(LayerBoundingBox {
            crs: None,
            lower_corner: "-180 -90".to_string(),
            upper_corner: "180 90".to_string(),
        });
        let mut state = AppState::new(Settings::default(), UrlParams::default());
        state.catalog =
            CatalogState::Ready(LayerRegistry::from_layers([("Terra".to_string(), terra)]));
        state.view.selected_layer = Some("Terra".to_string());
        let mut map = RecordingMap::default();

        run(&mut state, &mut map, UiAction::UseLayerExtent);

        assert_eq!(state.view.bounds_input.lon_min, "-180");
        assert_eq!(state.view.bounds_input.lat_max, "90");
    }

    #[test]
    fn test_actions_before_catalog_are_ignored() {
        let mut state = AppState::new(Settings::default(), UrlParams::default());
        let mut map = RecordingMap::default();

        run(&mut state, &mut map, UiAction::SelectLayer("Terra Aerosol".to_string()));

        assert!(state.view.selected_layer.is_none());
        assert!(map.calls.is_empty());
    }
}
