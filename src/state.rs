// src/state.rs
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::services::message_log::MessageLog;

pub type SharedState = Arc<WidgetState>;

/// A single-line text input.
#[derive(Clone, Debug, Default)]
pub struct TextField {
    value: Arc<RwLock<String>>,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn value(&self) -> String {
        self.value.read().await.clone()
    }

    pub async fn set(&self, value: impl Into<String>) {
        *self.value.write().await = value.into();
    }

    pub async fn clear(&self) {
        self.value.write().await.clear();
    }
}

/// The chat surface: the log plus the two inputs feeding it.
#[derive(Debug, Default)]
pub struct WidgetState {
    pub log: MessageLog,
    pub message_input: TextField,
    pub location_input: TextField,
}

impl WidgetState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedState {
        Arc::new(Self::new())
    }
}
