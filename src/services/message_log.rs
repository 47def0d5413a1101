// src/services/message_log.rs
use std::{
    fmt,
    fmt::Debug,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use tokio::sync::{RwLock, broadcast};

/// Text shown in a bot entry while its exchange is outstanding.
pub const PLACEHOLDER: &str = "Thinking...";

const EVENT_CAPACITY: usize = 64;

static NEXT_LOG_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Bot => "bot",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle to one entry of a [`MessageLog`]. Entries are never removed, so a
/// handle stays valid for as long as the log exists. A handle only resolves
/// against the log that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntryId {
    log: u64,
    index: usize,
}

impl EntryId {
    pub fn index(self) -> usize {
        self.index
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub id: EntryId,
    pub role: Role,
    pub text: String,
}

/// Change notifications for whoever renders the log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogEvent {
    Appended(LogEntry),
    Updated(LogEntry),
}

/// Append-only chat log. Entries can have their text replaced in place but
/// are never removed or reordered.
#[derive(Clone)]
pub struct MessageLog {
    id: u64,
    inner: Arc<RwLock<Vec<LogEntry>>>,
    events: broadcast::Sender<LogEvent>,
}

impl Debug for MessageLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageLog")
            .field("subscribers", &self.events.receiver_count())
            .finish()
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageLog {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            id: NEXT_LOG_ID.fetch_add(1, Ordering::Relaxed),
            inner: Arc::new(RwLock::new(Vec::new())),
            events,
        }
    }

    // Index of `id` in this log, if it was issued here.
    fn slot(&self, id: EntryId) -> Option<usize> {
        (id.log == self.id).then_some(id.index)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LogEvent> {
        self.events.subscribe()
    }

    // Append an entry and return its handle.
    pub async fn append(&self, role: Role, text: impl Into<String>) -> EntryId {
        let mut guard = self.inner.write().await;
        let id = EntryId { log: self.id, index: guard.len() };
        let entry = LogEntry { id, role, text: text.into() };
        guard.push(entry.clone());
        drop(guard);

        // No subscriber is fine; the log itself is the store.
        let _ = self.events.send(LogEvent::Appended(entry));
        id
    }

    /// Replace the text of an existing entry. Returns `false` if `id` was
    /// issued by another log.
    pub async fn set_text(&self, id: EntryId, text: impl Into<String>) -> bool {
        let Some(slot) = self.slot(id) else {
            return false;
        };
        let mut guard = self.inner.write().await;
        let Some(entry) = guard.get_mut(slot) else {
            return false;
        };
        entry.text = text.into();
        let updated = entry.clone();
        drop(guard);

        let _ = self.events.send(LogEvent::Updated(updated));
        true
    }

    pub async fn get(&self, id: EntryId) -> Option<LogEntry> {
        let slot = self.slot(id)?;
        let guard = self.inner.read().await;
        guard.get(slot).cloned()
    }

    pub async fn last(&self) -> Option<LogEntry> {
        let guard = self.inner.read().await;
        guard.last().cloned()
    }

    /// Copy of every entry, oldest first.
    pub async fn entries(&self) -> Vec<LogEntry> {
        self.inner.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn append_and_update_in_place() {
        let log = MessageLog::new();
        let user = log.append(Role::User, "hello").await;
        let bot = log.append(Role::Bot, PLACEHOLDER).await;
        assert_eq!(log.len().await, 2);
        assert_eq!(log.last().await.unwrap().id, bot);

        assert!(log.set_text(bot, "Hi there").await);
        let entries = log.entries().await;
        assert_eq!(entries[0].id, user);
        assert_eq!(entries[0].text, "hello");
        assert_eq!(entries[1].role, Role::Bot);
        assert_eq!(entries[1].text, "Hi there");
        assert_eq!(log.len().await, 2);
    }

    #[tokio::test]
    async fn foreign_id_is_rejected() {
        let other = MessageLog::new();
        other.append(Role::User, "a").await;
        let foreign = other.append(Role::Bot, PLACEHOLDER).await;

        let log = MessageLog::new();
        log.append(Role::User, "mine").await;
        let own = log.append(Role::User, "also mine").await;
        assert_eq!(own.index(), foreign.index());

        assert!(!log.set_text(foreign, "overwritten").await);
        assert!(log.get(foreign).await.is_none());
        let texts: Vec<_> = log.entries().await.into_iter().map(|e| e.text).collect();
        assert_eq!(texts, vec!["mine", "also mine"]);

        // Still resolves against the log that issued it.
        assert!(other.set_text(foreign, "reply").await);
        assert_eq!(other.get(foreign).await.unwrap().text, "reply");
    }

    #[tokio::test]
    async fn subscribers_see_appends_and_updates() {
        let log = MessageLog::new();
        let mut rx = log.subscribe();

        let id = log.append(Role::Bot, PLACEHOLDER).await;
        log.set_text(id, "done").await;

        match rx.recv().await.unwrap() {
            LogEvent::Appended(e) => assert_eq!(e.text, PLACEHOLDER),
            other => panic!("unexpected event {other:?}"),
        }
        match rx.recv().await.unwrap() {
            LogEvent::Updated(e) => {
                assert_eq!(e.id, id);
                assert_eq!(e.text, "done");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
