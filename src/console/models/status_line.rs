//! # Status Line Model
//!
//! Encapsulates everything the status bar shows: the current notice, the
//! loading indicator and the open prompt, if any.

use std::fmt;

/// Severity of a notice, mapped to a colour by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient, user-visible message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info<S: Into<String>>(text: S) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn success<S: Into<String>>(text: S) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn warning<S: Into<String>>(text: S) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error<S: Into<String>>(text: S) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Status line model containing all status bar display state
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    notice: Option<Notice>,

    /// Scan-list fetches currently in flight
    pending_fetches: usize,

    /// Prompt text while waiting for an answer (confirmation, export format)
    prompt: Option<String>,

    /// Server the console talks to, shown on the right
    server: String,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    // === Notice Methods ===

    pub fn set_notice(&mut self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => tracing::warn!("notice: {}", notice.text),
            _ => tracing::debug!("notice: {}", notice.text),
        }
        self.notice = Some(notice);
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    // === Loading Indicator ===

    pub fn fetch_started(&mut self) {
        self.pending_fetches += 1;
    }

    pub fn fetch_finished(&mut self) {
        self.pending_fetches = self.pending_fetches.saturating_sub(1);
    }

    pub fn is_loading(&self) -> bool {
        self.pending_fetches > 0
    }

    pub fn pending_fetches(&self) -> usize {
        self.pending_fetches
    }

    // === Prompt ===

    pub fn set_prompt<S: Into<String>>(&mut self, prompt: S) {
        self.prompt = Some(prompt.into());
    }

    pub fn clear_prompt(&mut self) {
        self.prompt = None;
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    // === Server ===

    pub fn set_server<S: Into<String>>(&mut self, server: S) {
        self.server = server.into();
    }

    pub fn server(&self) -> &str {
        &self.server
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_indicator_should_follow_overlapping_fetches() {
        let mut status = StatusLine::new();
        assert!(!status.is_loading());

        status.fetch_started();
        status.fetch_started();
        status.fetch_finished();
        assert!(status.is_loading());

        status.fetch_finished();
        assert!(!status.is_loading());

        // Never underflows
        status.fetch_finished();
        assert_eq!(status.pending_fetches(), 0);
    }

    #[test]
    fn notice_should_replace_previous_one() {
        let mut status = StatusLine::new();
        status.set_notice(Notice::info("first"));
        status.set_notice(Notice::error("second"));

        let notice = status.notice().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.to_string(), "second");

        status.clear_notice();
        assert!(status.notice().is_none());
    }

    #[test]
    fn prompt_should_be_settable_and_clearable() {
        let mut status = StatusLine::new();
        status.set_prompt("Delete 2 scan(s)? (y/n)");
        assert_eq!(status.prompt(), Some("Delete 2 scan(s)? (y/n)"));

        status.clear_prompt();
        assert!(status.prompt().is_none());
    }
}
