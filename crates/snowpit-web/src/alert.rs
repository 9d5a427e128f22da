#![forbid(unsafe_code)]

//! User-facing alerts for rejected edits.
//!
//! Every rejection is queued until the host drains it. An alert identical to
//! one still pending is counted and folded into it, so a burst of the same
//! rejection shows once; after a drain the next rejection is shown again.

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashSet, VecDeque};
use std::hash::{Hash, Hasher};

use snowpit_layout::ValidationError;

/// Alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AlertLevel {
    Warning,
    /// The editor hit a broken invariant; the edit was abandoned.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
}

impl Alert {
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Warning,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Error,
            message: message.into(),
        }
    }
}

impl From<&ValidationError> for Alert {
    fn from(err: &ValidationError) -> Self {
        Self::warning(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlertStats {
    pub pushed: u64,
    /// Alerts folded into an identical pending alert.
    pub deduplicated: u64,
}

/// Deduplicating alert queue, drained by the host.
#[derive(Debug, Clone, Default)]
pub struct AlertQueue {
    pending: VecDeque<Alert>,
    pending_hashes: HashSet<u64>,
    stats: AlertStats,
}

impl AlertQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `alert`. Returns false if an identical alert is still pending.
    pub fn push(&mut self, alert: Alert) -> bool {
        if !self.pending_hashes.insert(content_hash(&alert)) {
            self.stats.deduplicated += 1;
            return false;
        }
        tracing::debug!(message = %alert.message, "alert raised");
        self.pending.push_back(alert);
        self.stats.pushed += 1;
        true
    }

    /// Take all pending alerts, oldest first.
    pub fn drain(&mut self) -> Vec<Alert> {
        self.pending_hashes.clear();
        self.pending.drain(..).collect()
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub const fn stats(&self) -> AlertStats {
        self.stats
    }
}

fn content_hash(alert: &Alert) -> u64 {
    let mut hasher = DefaultHasher::new();
    alert.message.hash(&mut hasher);
    hasher.finish()
}
