use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::{Receiver, error::RecvError},
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use chat_widget::{
    ChatClient, ClientConfig, HttpTransport, Key, LogEvent, UiEvent, WidgetState,
    config::{CUSTOMER_ID_ENV, DEFAULT_CUSTOMER_ID, DEFAULT_ENDPOINT_URL, ENDPOINT_ENV},
    handle_event,
};

/// Terminal front-end for the support chat.
///
/// Type a message and press Enter to send it. `/location <place>` sets the
/// location sent with later messages, `/quit` leaves immediately.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Chat endpoint that receives every message.
    #[arg(long, env = ENDPOINT_ENV, default_value = DEFAULT_ENDPOINT_URL)]
    endpoint: String,

    /// Customer identifier attached to every request.
    #[arg(long, env = CUSTOMER_ID_ENV, default_value = DEFAULT_CUSTOMER_ID)]
    customer_id: String,

    /// Initial value of the location field.
    #[arg(long, env = "CHAT_LOCATION", default_value = "")]
    location: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    // Logs go to stderr so stdout carries only the conversation.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    let config =
        ClientConfig::new(&args.endpoint, args.customer_id).context("invalid configuration")?;
    info!(endpoint = %config.endpoint_url, customer_id = %config.customer_id, "chat client ready");

    let state = WidgetState::shared();
    let renderer = tokio::spawn(render(state.log.subscribe()));

    let transport = Arc::new(HttpTransport::new(config.endpoint_url.clone()));
    let client = ChatClient::new(config, transport, state.clone());
    handle_event(&client, UiEvent::LocationChanged(args.location)).await;

    let mut pending = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).split(b'\n');
    while let Some(raw) = lines.next_segment().await.context("reading stdin")? {
        let Some(line) = decode_line(raw) else {
            warn!("skipping input line that is not valid UTF-8");
            continue;
        };
        let events = match parse_line(&line) {
            Command::Quit => {
                renderer.abort();
                return Ok(());
            }
            Command::Location(value) => vec![UiEvent::LocationChanged(value)],
            Command::Message(value) => {
                vec![UiEvent::MessageChanged(value), UiEvent::KeyDown(Key::Enter)]
            }
        };
        for event in events {
            if let Some(reply) = handle_event(&client, event).await {
                pending.push(reply);
            }
        }
    }

    // End of input: let outstanding replies land before exiting.
    for reply in pending {
        reply.wait().await;
    }
    drop(client);
    drop(state);
    renderer.await.context("renderer task")?;
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Quit,
    Location(String),
    Message(String),
}

// One stdin line without its line ending, or `None` if it is not UTF-8.
fn decode_line(mut raw: Vec<u8>) -> Option<String> {
    if raw.last() == Some(&b'\r') {
        raw.pop();
    }
    String::from_utf8(raw).ok()
}

fn parse_line(line: &str) -> Command {
    let trimmed = line.trim_start();
    if trimmed.trim_end() == "/quit" {
        Command::Quit
    } else if let Some(rest) = trimmed
        .strip_prefix("/location")
        .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
    {
        Command::Location(rest.trim().to_string())
    } else {
        Command::Message(line.to_string())
    }
}

async fn render(mut events: Receiver<LogEvent>) {
    loop {
        match events.recv().await {
            Ok(LogEvent::Appended(entry)) | Ok(LogEvent::Updated(entry)) => {
                println!("[{}] {}", entry.role, entry.text);
            }
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "renderer fell behind"),
            Err(RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(parse_line("/quit"), Command::Quit);
        assert_eq!(
            parse_line("  /location  Pune "),
            Command::Location("Pune".to_string())
        );
        assert_eq!(parse_line("/location"), Command::Location(String::new()));
        assert_eq!(parse_line("/locations?"), Command::Message("/locations?".to_string()));
        assert_eq!(parse_line("I'm cold"), Command::Message("I'm cold".to_string()));
    }

    #[test]
    fn undecodable_lines_are_skipped_not_fatal() {
        assert_eq!(decode_line(b"hello\r".to_vec()).as_deref(), Some("hello"));
        assert_eq!(decode_line(b"caf\xc3\xa9".to_vec()).as_deref(), Some("caf\u{e9}"));
        assert_eq!(decode_line(vec![0xff, 0xfe, b'h', b'i']), None);
    }

    #[test]
    fn cli_defaults_match_config_defaults() {
        let argv = ["chat-widget", "--endpoint", "http://localhost:9000/chat"];
        let args = Args::try_parse_from(argv).unwrap();
        assert_eq!(args.endpoint, "http://localhost:9000/chat");
        assert!(ClientConfig::new(&args.endpoint, args.customer_id).is_ok());
    }
}
