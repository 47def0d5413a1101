pub mod chat_client;
pub mod message_log;
pub mod transport;
