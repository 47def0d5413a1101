pub mod config;
pub mod error;
pub mod events;
pub mod message;
pub mod services;
pub mod state;

pub use config::ClientConfig;
pub use error::{APOLOGY, ChatError, ConfigError};
pub use events::{Key, UiEvent, handle_event};
pub use services::chat_client::{ChatClient, PendingReply, SendOutcome};
pub use services::message_log::{EntryId, LogEntry, LogEvent, MessageLog, PLACEHOLDER, Role};
pub use services::transport::{ChatTransport, HttpTransport};
pub use state::{SharedState, WidgetState};
