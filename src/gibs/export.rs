//! Data export requests.
//!
//! The export form collects a date window and a region; once every field is
//! present the request is posted to the export backend, which writes a NetCDF
//! file for the selected layer. Progress is shown through [`ExportStatus`].

use super::catalog::LayerDescriptor;
use crate::state::ViewState;
use serde::Serialize;
use std::time::Duration;
use web_time::Instant;

pub const LAYER_LABEL: &str = "Layer";
pub const START_DATE_LABEL: &str = "Start Date";
pub const END_DATE_LABEL: &str = "End Date";

/// Body of the export POST.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub layer: String,
    pub metadata_href: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub lonmin: f64,
    pub latmin: f64,
    pub lonmax: f64,
    pub latmax: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportError {
    /// Labels of the form fields that are empty or not numeric, in form order
    MissingFields(Vec<&'static str>),
    RequestFailed(String),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::MissingFields(fields) => {
                write!(f, "Missing Elements: {}", fields.join(", "))
            }
            ExportError::RequestFailed(msg) => write!(f, "Export request failed: {}", msg),
        }
    }
}

impl std::error::Error for ExportError {}

/// Result reported back by the export backend.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    Completed,
    Failed(String),
}

/// State of the export progress panels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ExportStatus {
    #[default]
    Hidden,
    Generating,
    Finished { since: Instant },
}

impl ExportStatus {
    /// Hides the finished panel once it has been shown for `display`.
    pub fn tick(&mut self, now: Instant, display: Duration) {
        if let ExportStatus::Finished { since } = *self {
            if now.saturating_duration_since(since) >= display {
                *self = ExportStatus::Hidden;
            }
        }
    }

    pub fn label(&self) -> Option<&'static str> {
        match self {
            ExportStatus::Hidden => None,
            ExportStatus::Generating => Some("GENERATING NETCDF FILE..."),
            ExportStatus::Finished { .. } => Some("FINISHED GENERATING"),
        }
    }
}

/// Sends export requests somewhere.
///
/// Implementations deliver the outcome asynchronously; the caller feeds it
/// to [`apply_outcome`] when it arrives.
pub trait ExportBackend {
    fn post(&self, url: &str, request: ExportRequest);
}

/// Builds the export request, or lists every field that still needs input.
pub fn validate(
    view: &ViewState,
    layer: Option<&LayerDescriptor>,
) -> Result<ExportRequest, ExportError> {
    let mut missing = Vec::new();

    if layer.is_none() {
        missing.push(LAYER_LABEL);
    }
    let start_date = view.export_window.start();
    if start_date.is_none() {
        missing.push(START_DATE_LABEL);
    }
    let end_date = view.export_window.end();
    if end_date.is_none() {
        missing.push(END_DATE_LABEL);
    }
    missing.extend(view.bounds_input.invalid_fields());

    let (
        Some(layer),
        Some(start_date),
        Some(end_date),
        [Some(lonmin), Some(latmin), Some(lonmax), Some(latmax)],
    ) = (layer, start_date, end_date, view.bounds_input.values())
    else {
        return Err(ExportError::MissingFields(missing));
    };

    Ok(ExportRequest {
        layer: layer.layer_id.clone(),
        metadata_href: layer.metadata_href.clone(),
        start_date: start_date.to_string(),
        end_date: end_date.to_string(),
        lonmin,
        latmin,
        lonmax,
        latmax,
    })
}

/// Validates the form and posts one export request.
///
/// On success the status moves to `Generating`; on failure nothing is sent
/// and the status is left as it was.
pub fn submit(
    status: &mut ExportStatus,
    view: &ViewState,
    layer: Option<&LayerDescriptor>,
    backend: &impl ExportBackend,
    url: &str,
) -> Result<(), ExportError> {
    let request = match validate(view, layer) {
        Ok(request) => request,
        Err(e) => {
            log::warn!("{}", e);
            return Err(e);
        }
    };

    log::info!(
        "Requesting export of {} from {} to {}",
        request.layer,
        request.start_date,
        request.end_date
    );
    *status = ExportStatus::Generating;
    backend.post(url, request);
    Ok(())
}

/// Applies a backend result to the status panel. The latest result wins.
pub fn apply_outcome(status: &mut ExportStatus, outcome: ExportOutcome, now: Instant) {
    match outcome {
        ExportOutcome::Completed => {
            log::info!("Export finished");
            *status = ExportStatus::Finished { since: now };
        }
        ExportOutcome::Failed(msg) => {
            log::error!("{}", ExportError::RequestFailed(msg));
            *status = ExportStatus::Hidden;
        }
    }
}
