use std::{
    fmt,
    sync::{Arc, Mutex},
};

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Auth,
    Catalog,
    Credits,
    Payment,
    Upload,
    Feed,
    Subscriptions,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Source::Auth => "auth",
            Source::Catalog => "catalog",
            Source::Credits => "credits",
            Source::Payment => "payment",
            Source::Upload => "upload",
            Source::Feed => "uploads",
            Source::Subscriptions => "subscriptions",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub source: Source,
    pub level: Level,
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Append-only record of every message surfaced to the user. Writers never
/// overwrite each other; a single-slot display reads `latest_from()`.
#[derive(Clone, Default)]
pub struct EventLog {
    entries: Arc<Mutex<Vec<Notice>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&self, source: Source, message: impl Into<String>) {
        self.push(source, Level::Info, message.into());
    }

    pub fn error(&self, source: Source, message: impl Into<String>) {
        self.push(source, Level::Error, message.into());
    }

    fn push(&self, source: Source, level: Level, message: String) {
        let notice = Notice {
            source,
            level,
            message,
            at: Utc::now(),
        };
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).push(notice);
    }

    pub fn entries(&self) -> Vec<Notice> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Most recent notice from any of `sources`. Backs the single status line
    /// each view shows.
    pub fn latest_from(&self, sources: &[Source]) -> Option<Notice> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .rev()
            .find(|notice| sources.contains(&notice.source))
            .cloned()
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.message)
    }
}
