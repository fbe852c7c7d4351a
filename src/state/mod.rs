//! Application state management.
//!
//! UI panels never mutate the map directly. They edit plain fields (text
//! inputs, search box) in place and queue a [`UiAction`] for everything
//! that needs the controller; the app drains the queue after rendering.

mod settings;
pub mod url_state;
mod view;

pub use settings::Settings;
pub use url_state::UrlParams;
pub use view::{calendar_date, BoundsError, ViewState};

use crate::gibs::{CatalogState, ExportStatus};

/// An interaction queued by the UI for the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    SelectLayer(String),
    SetDayOffset(i64),
    /// Draw the region from the bound inputs
    ViewRectangle,
    ClearRectangles,
    /// Submit the export form
    Download,
    /// Fill the bound inputs from the selected layer's bounding box
    UseLayerExtent,
    SaveSettings,
}

/// Root application state containing all sub-states.
#[derive(Default)]
pub struct AppState {
    pub catalog: CatalogState,

    pub view: ViewState,

    /// Export progress panel
    pub export_status: ExportStatus,

    /// Message for the missing-elements panel, shown until the next submit
    pub missing_fields: Option<String>,

    /// Application status message displayed in top bar
    pub status_message: String,

    pub settings: Settings,

    /// Query parameters waiting for the catalog before they can be applied
    pub pending_url_params: Option<UrlParams>,

    /// Whether the time-extent list is expanded
    pub show_time_extents: bool,

    /// Interactions queued during this frame
    pub actions: Vec<UiAction>,
}

impl AppState {
    pub fn new(settings: Settings, url_params: UrlParams) -> Self {
        Self {
            settings,
            pending_url_params: Some(url_params),
            status_message: "Loading layer catalog...".to_string(),
            ..Default::default()
        }
    }

    pub fn push_action(&mut self, action: UiAction) {
        self.actions.push(action);
    }

    /// Takes the queued actions, leaving the queue empty.
    pub fn take_actions(&mut self) -> Vec<UiAction> {
        std::mem::take(&mut self.actions)
    }
}
