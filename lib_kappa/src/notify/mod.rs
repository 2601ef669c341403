//! # Notification Sinks
//!
//! A sink receives one [`Notification`] per failed gateway call so a human can
//! see it. Delivery is fire-and-forget: `notify` returns nothing and must not
//! block for long. Sinks are shared across concurrent calls, hence
//! `Send + Sync`.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

use colored::*;
use std::fmt;

/// How loudly a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Informational.
    Normal,
    /// Something failed. The gateway always uses this.
    Destructive,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Normal => write!(f, "normal"),
            Severity::Destructive => write!(f, "destructive"),
        }
    }
}

/// A single user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Short headline, e.g. "Request Failed".
    pub title: String,
    /// Longer explanation; for gateway failures, the error message.
    pub description: String,
    /// Presentation hint.
    pub severity: Severity,
}

impl Notification {
    /// Builds a destructive notification.
    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }
}

/// Receiver of user-facing notifications.
pub trait NotificationSink: Send + Sync {
    /// Delivers `notification`. Must not panic or block for long.
    fn notify(&self, notification: Notification);
}

impl<F> NotificationSink for F
where
    F: Fn(Notification) + Send + Sync,
{
    fn notify(&self, notification: Notification) {
        self(notification)
    }
}

/// Drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&self, _notification: Notification) {}
}

/// Routes notifications into `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Destructive => tracing::error!(
                title = %notification.title,
                "{}",
                notification.description
            ),
            Severity::Normal => tracing::info!(
                title = %notification.title,
                "{}",
                notification.description
            ),
        }
    }
}

/// Prints notifications to stderr, colored by severity.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl ConsoleSink {
    fn render(notification: &Notification) -> String {
        let title = match notification.severity {
            Severity::Destructive => notification.title.bright_white().on_red(),
            Severity::Normal => notification.title.bright_green(),
        };
        format!("{} {}", title, notification.description)
    }
}

impl NotificationSink for ConsoleSink {
    fn notify(&self, notification: Notification) {
        eprintln!("{}", Self::render(&notification));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn closures_are_sinks() {
        let seen = Mutex::new(Vec::new());
        let sink = |n: Notification| seen.lock().unwrap().push(n);
        sink.notify(Notification::destructive("Request Failed", "boom"));

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].title, "Request Failed");
        assert_eq!(seen[0].severity, Severity::Destructive);
    }

    #[test]
    fn console_render_contains_both_parts() {
        colored::control::set_override(false);
        let text = ConsoleSink::render(&Notification::destructive("Request Failed", "not found"));
        assert_eq!(text, "Request Failed not found");
    }

    #[test]
    fn severity_display() {
        assert_eq!(Severity::Destructive.to_string(), "destructive");
        assert_eq!(Severity::Normal.to_string(), "normal");
    }
}
