// src/events.rs
use crate::services::chat_client::{ChatClient, PendingReply};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Enter,
    Char(char),
    Other,
}

/// Input coming from whatever front-end drives the widget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    MessageChanged(String),
    LocationChanged(String),
    /// Key pressed while the message field has focus.
    KeyDown(Key),
    SendClicked,
}

/// Apply one event. Both send triggers go through [`ChatClient::submit`].
pub async fn handle_event(client: &ChatClient, event: UiEvent) -> Option<PendingReply> {
    let state = client.state();
    match event {
        UiEvent::MessageChanged(value) => {
            state.message_input.set(value).await;
            None
        }
        UiEvent::LocationChanged(value) => {
            state.location_input.set(value).await;
            None
        }
        UiEvent::SendClicked | UiEvent::KeyDown(Key::Enter) => client.submit().await,
        UiEvent::KeyDown(_) => None,
    }
}
