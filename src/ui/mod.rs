//! UI modules for the GIBS Workbench application.
//!
//! The UI is split into distinct panels:
//! - Top bar: Title, selected layer and day, and status
//! - Left panel: Layer search and selection, day slider, legend
//! - Central canvas: Map with the active layer and export region
//! - Right panel: Region bounds, export form, and settings

mod canvas;
mod left_panel;
mod right_panel;
mod top_bar;

pub use canvas::render_canvas;
pub use left_panel::render_left_panel;
pub use right_panel::render_right_panel;
pub use top_bar::render_top_bar;
