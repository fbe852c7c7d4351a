//! Channel-backed export backend.
//!
//! Each submission runs as its own task; outcomes arrive in completion order
//! and are drained by the update loop.

use super::export::{ExportBackend, ExportOutcome, ExportRequest};
use super::http;
use eframe::egui;
use std::sync::mpsc::{channel, Receiver, Sender};

pub struct ExportChannel {
    sender: Sender<ExportOutcome>,
    receiver: Receiver<ExportOutcome>,
    ctx: egui::Context,
}

impl ExportChannel {
    pub fn new(ctx: egui::Context) -> Self {
        let (sender, receiver) = channel();
        Self {
            sender,
            receiver,
            ctx,
        }
    }

    /// Non-blocking check for a finished export.
    pub fn try_recv(&self) -> Option<ExportOutcome> {
        self.receiver.try_recv().ok()
    }
}

impl ExportBackend for ExportChannel {
    #[cfg(target_arch = "wasm32")]
    fn post(&self, url: &str, request: ExportRequest) {
        let sender = self.sender.clone();
        let ctx = self.ctx.clone();
        let url = url.to_string();

        wasm_bindgen_futures::spawn_local(async move {
            let outcome = match serde_json::to_string(&request) {
                Ok(body) => outcome_from(http::post_json(&url, &body).await),
                Err(e) => ExportOutcome::Failed(e.to_string()),
            };
            let _ = sender.send(outcome);
            ctx.request_repaint();
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn post(&self, url: &str, request: ExportRequest) {
        let sender = self.sender.clone();
        let ctx = self.ctx.clone();
        let url = url.to_string();

        std::thread::spawn(move || {
            let outcome = match serde_json::to_string(&request) {
                Ok(body) => outcome_from(http::post_json(&url, &body)),
                Err(e) => ExportOutcome::Failed(e.to_string()),
            };
            let _ = sender.send(outcome);
            ctx.request_repaint();
        });
    }
}

fn outcome_from(status: Result<u16, String>) -> ExportOutcome {
    match status {
        Ok(code) if http::is_success(code) => ExportOutcome::Completed,
        Ok(code) => ExportOutcome::Failed(format!("HTTP {}", code)),
        Err(e) => ExportOutcome::Failed(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_status() {
        assert_eq!(outcome_from(Ok(200)), ExportOutcome::Completed);
        assert_eq!(
            outcome_from(Ok(500)),
            ExportOutcome::Failed("HTTP 500".to_string())
        );
        assert_eq!(
            outcome_from(Err("connection refused".to_string())),
            ExportOutcome::Failed("connection refused".to_string())
        );
    }
}
