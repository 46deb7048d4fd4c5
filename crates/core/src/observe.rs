//! Reporting of soft extraction anomalies.
//!
//! Extractors never fail on bad page data. Instead they skip the offending
//! block or field and tell an [`Observer`]. Production code uses
//! [`TracingObserver`]; tests use [`Observations`] to assert on what was
//! reported without installing a global subscriber.

/// Severity of an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Warn,
}

/// Receives anomalies encountered while processing one source.
pub trait Observer {
    fn observe(&mut self, level: Level, message: &str);

    fn debug(&mut self, message: &str) {
        self.observe(Level::Debug, message);
    }

    fn warn(&mut self, message: &str) {
        self.observe(Level::Warn, message);
    }
}

/// Forwards observations to `tracing`, tagged with the source id.
#[derive(Debug, Clone)]
pub struct TracingObserver {
    source_id: String,
}

impl TracingObserver {
    pub fn new(source_id: impl Into<String>) -> Self {
        Self { source_id: source_id.into() }
    }
}

impl Observer for TracingObserver {
    fn observe(&mut self, level: Level, message: &str) {
        match level {
            Level::Debug => tracing::debug!(source = %self.source_id, "{message}"),
            Level::Warn => tracing::warn!(source = %self.source_id, "{message}"),
        }
    }
}

/// Collects observations in memory.
#[derive(Debug, Clone, Default)]
pub struct Observations {
    pub entries: Vec<(Level, String)>,
}

impl Observations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages recorded at [`Level::Warn`].
    pub fn warnings(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(level, _)| *level == Level::Warn)
            .map(|(_, message)| message.as_str())
            .collect()
    }
}

impl Observer for Observations {
    fn observe(&mut self, level: Level, message: &str) {
        self.entries.push((level, message.to_string()));
    }
}
