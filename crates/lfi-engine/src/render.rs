//! "Configuration changed" signal.
//!
//! Mutators only mark a render as requested on the [`crate::Session`]; the coordinator derives
//! the document and calls [`RenderSurface::render`] once when the outermost mutation settles.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tokio::sync::watch;

use crate::document::VisualizeConfig;

/// One document addressed to the embedded renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderMessage {
    /// Origin the renderer frame must have for the message to be delivered.
    pub target_origin: String,
    pub document: VisualizeConfig,
}

pub trait RenderSurface: Send {
    fn render(&mut self, message: RenderMessage);
}

/// Keeps every dispatched message. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    messages: Arc<Mutex<Vec<RenderMessage>>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RenderMessage>> {
        match self.messages.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn count(&self) -> usize {
        self.lock().len()
    }

    pub fn last(&self) -> Option<RenderMessage> {
        self.lock().last().cloned()
    }

    pub fn messages(&self) -> Vec<RenderMessage> {
        self.lock().clone()
    }
}

impl RenderSurface for RecordingSurface {
    fn render(&mut self, message: RenderMessage) {
        self.lock().push(message);
    }
}

/// Publishes the latest message on a watch channel; slow subscribers only see the newest one.
/// Clones publish on the same channel.
#[derive(Debug, Clone)]
pub struct WatchSurface {
    tx: Arc<watch::Sender<Option<Arc<RenderMessage>>>>,
}

impl WatchSurface {
    pub fn channel() -> (Self, watch::Receiver<Option<Arc<RenderMessage>>>) {
        let (tx, rx) = watch::channel(None);
        (Self { tx: Arc::new(tx) }, rx)
    }
}

impl RenderSurface for WatchSurface {
    fn render(&mut self, message: RenderMessage) {
        // Works without receivers; the value is kept for the next subscriber.
        self.tx.send_replace(Some(Arc::new(message)));
    }
}
