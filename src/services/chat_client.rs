// src/services/chat_client.rs
use std::{any::Any, fmt, panic::AssertUnwindSafe, sync::Arc};

use futures::FutureExt;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error, info_span};
use uuid::Uuid;

use crate::{
    config::ClientConfig,
    error::ChatError,
    message::ChatRequest,
    services::{
        message_log::{EntryId, MessageLog, PLACEHOLDER, Role},
        transport::ChatTransport,
    },
    state::SharedState,
};

/// Where a single send currently is. Each send walks this sequence once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendPhase {
    Idle,
    UserMessageAppended,
    PlaceholderAppended,
    AwaitingResponse,
    Resolved,
    Failed,
}

impl SendPhase {
    fn advance(&mut self, next: SendPhase) {
        debug!(from = ?*self, to = ?next, "send phase");
        *self = next;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    Resolved,
    Failed,
}

/// Handle to an exchange started by [`ChatClient::submit`]. Dropping it does
/// not cancel anything; the placeholder is still updated when the exchange
/// settles.
#[derive(Debug)]
pub struct PendingReply {
    placeholder: EntryId,
    handle: JoinHandle<SendOutcome>,
}

impl PendingReply {
    /// The bot entry this exchange will overwrite.
    pub fn placeholder(&self) -> EntryId {
        self.placeholder
    }

    pub async fn wait(self) -> SendOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(error = %err, "chat exchange task aborted");
                SendOutcome::Failed
            }
        }
    }
}

#[derive(Clone)]
pub struct ChatClient {
    config: ClientConfig,
    transport: Arc<dyn ChatTransport>,
    state: SharedState,
}

impl fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClient")
            .field("config", &self.config)
            .field("state", &self.state)
            .finish()
    }
}

impl ChatClient {
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn ChatTransport>,
        state: SharedState,
    ) -> Self {
        Self { config, transport, state }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    /// Send whatever is in the message field.
    ///
    /// Returns `None` without touching anything when the trimmed message is
    /// empty. Otherwise the user entry and the placeholder are both in the
    /// log before the exchange is spawned, and the returned handle resolves
    /// once the placeholder has been overwritten.
    pub async fn submit(&self) -> Option<PendingReply> {
        let raw = self.state.message_input.value().await;
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }
        let location = self.state.location_input.value().await;
        let request = ChatRequest::new(text, self.config.customer_id.clone(), &location);

        let send_id = Uuid::new_v4();
        let span = info_span!("chat_send", %send_id, location = %request.location);
        let log = &self.state.log;

        let placeholder = async {
            let mut phase = SendPhase::Idle;

            log.append(Role::User, text).await;
            phase.advance(SendPhase::UserMessageAppended);
            self.state.message_input.clear().await;

            let placeholder = log.append(Role::Bot, PLACEHOLDER).await;
            phase.advance(SendPhase::PlaceholderAppended);
            placeholder
        }
        .instrument(span.clone())
        .await;

        let handle = tokio::spawn(
            exchange(self.transport.clone(), log.clone(), placeholder, request).instrument(span),
        );

        Some(PendingReply { placeholder, handle })
    }
}

// Settle one exchange by overwriting the placeholder captured at dispatch.
async fn exchange(
    transport: Arc<dyn ChatTransport>,
    log: MessageLog,
    placeholder: EntryId,
    request: ChatRequest,
) -> SendOutcome {
    let mut phase = SendPhase::PlaceholderAppended;
    phase.advance(SendPhase::AwaitingResponse);

    // A panicking transport still has to settle the placeholder.
    let result = AssertUnwindSafe(transport.send(request))
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| Err(ChatError::Closed(panic_message(panic.as_ref()))));

    match result {
        Ok(response) => {
            log.set_text(placeholder, response.reply).await;
            phase.advance(SendPhase::Resolved);
            SendOutcome::Resolved
        }
        Err(err) => {
            error!(error = %err, "chat exchange failed");
            log.set_text(placeholder, err.user_message()).await;
            phase.advance(SendPhase::Failed);
            SendOutcome::Failed
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    let detail = panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic");
    format!("transport panicked: {detail}")
}
