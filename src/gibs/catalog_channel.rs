//! Async catalog loading.
//!
//! The catalog is fetched once at startup. The fetch is async but egui's
//! update() is synchronous, so the result is handed back through a channel
//! that the update loop polls each frame.

use super::catalog::{CatalogError, LayerRegistry};
use super::http;
use eframe::egui;
use std::sync::mpsc::{channel, Receiver, Sender};

pub type CatalogResult = Result<LayerRegistry, CatalogError>;

pub struct CatalogChannel {
    sender: Sender<CatalogResult>,
    receiver: Receiver<CatalogResult>,
}

impl Default for CatalogChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogChannel {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }

    /// Spawns the catalog fetch in the browser.
    #[cfg(target_arch = "wasm32")]
    pub fn load(&self, ctx: egui::Context, url: String) {
        let sender = self.sender.clone();

        wasm_bindgen_futures::spawn_local(async move {
            log::info!("Loading layer catalog from {}", url);
            let result = parse(http::fetch_text(&url).await);
            let _ = sender.send(result);
            ctx.request_repaint();
        });
    }

    /// Spawns the catalog fetch on a background thread.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(&self, ctx: egui::Context, url: String) {
        let sender = self.sender.clone();

        std::thread::spawn(move || {
            log::info!("Loading layer catalog from {}", url);
            let result = parse(http::fetch_text(&url));
            let _ = sender.send(result);
            ctx.request_repaint();
        });
    }

    /// Non-blocking check for a finished load.
    pub fn try_recv(&self) -> Option<CatalogResult> {
        self.receiver.try_recv().ok()
    }
}

fn parse(text: Result<String, String>) -> CatalogResult {
    let result = text
        .map_err(CatalogError::Unavailable)
        .and_then(|json| LayerRegistry::from_json(&json));

    match &result {
        Ok(registry) => log::info!("Loaded {} layer(s) from catalog", registry.len()),
        Err(e) => log::error!("{}", e),
    }
    result
}
