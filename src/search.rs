//! Debounced free-text search input.
//!
//! The input owns a local uncommitted buffer distinct from the store's
//! committed query. Every keystroke mutates the buffer immediately and
//! re-arms a quiescence timer; the buffer value is handed out for
//! committing only once no keystroke has arrived for a full window, so a
//! burst of edits collapses into one commit of the final value.

use std::time::{Duration, Instant};

pub struct SearchInput {
    buffer: String,
    window: Duration,
    pending_since: Option<Instant>,
}

impl SearchInput {
    pub fn new(window: Duration) -> Self {
        Self {
            buffer: String::new(),
            window,
            pending_since: None,
        }
    }

    /// The live buffer, rendered in the input field on every frame.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// True while an edit is waiting out the quiescence window.
    pub fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    pub fn push(&mut self, c: char, now: Instant) {
        self.buffer.push(c);
        self.pending_since = Some(now);
    }

    pub fn backspace(&mut self, now: Instant) {
        if self.buffer.pop().is_some() {
            self.pending_since = Some(now);
        }
    }

    /// Replace the buffer, e.g. when re-entering search with the committed
    /// query. Does not arm the timer.
    pub fn reset_to(&mut self, value: &str) {
        self.buffer.clear();
        self.buffer.push_str(value);
        self.pending_since = None;
    }

    /// Poll the timer. Returns the buffer for committing once the window
    /// has elapsed since the last edit; every intermediate edit superseded
    /// the previous deadline.
    pub fn tick(&mut self, now: Instant) -> Option<String> {
        let since = self.pending_since?;
        if now.duration_since(since) >= self.window {
            self.pending_since = None;
            Some(self.buffer.clone())
        } else {
            None
        }
    }

    /// Commit immediately (Enter), bypassing the remaining window.
    pub fn flush(&mut self) -> Option<String> {
        self.pending_since.take().map(|_| self.buffer.clone())
    }

    /// Drop any pending commit. Called on teardown of the input so no
    /// commit fires after the field is gone.
    pub fn cancel(&mut self) {
        self.pending_since = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(100);

    fn t0() -> Instant {
        Instant::now()
    }

    #[test]
    fn buffer_updates_immediately_on_every_keystroke() {
        let now = t0();
        let mut input = SearchInput::new(WINDOW);
        input.push('d', now);
        input.push('o', now);
        input.push('e', now);
        assert_eq!(input.buffer(), "doe");
        assert!(input.is_pending());
    }

    #[test]
    fn burst_of_keystrokes_commits_once_with_last_value() {
        let now = t0();
        let mut input = SearchInput::new(WINDOW);

        input.push('d', now);
        assert_eq!(input.tick(now + Duration::from_millis(50)), None);
        input.push('o', now + Duration::from_millis(60));
        assert_eq!(input.tick(now + Duration::from_millis(120)), None);
        input.push('e', now + Duration::from_millis(130));

        // Quiescence reached only relative to the final keystroke.
        assert_eq!(input.tick(now + Duration::from_millis(200)), None);
        assert_eq!(
            input.tick(now + Duration::from_millis(230)),
            Some("doe".to_string())
        );
        // Committed once; no further commit without a new edit.
        assert_eq!(input.tick(now + Duration::from_millis(500)), None);
    }

    #[test]
    fn backspace_rearms_the_timer() {
        let now = t0();
        let mut input = SearchInput::new(WINDOW);
        input.push('a', now);
        assert_eq!(input.tick(now + WINDOW), Some("a".to_string()));

        input.backspace(now + Duration::from_millis(150));
        assert_eq!(input.buffer(), "");
        assert_eq!(input.tick(now + Duration::from_millis(200)), None);
        assert_eq!(
            input.tick(now + Duration::from_millis(250)),
            Some(String::new())
        );
    }

    #[test]
    fn backspace_on_empty_buffer_does_not_arm() {
        let now = t0();
        let mut input = SearchInput::new(WINDOW);
        input.backspace(now);
        assert!(!input.is_pending());
        assert_eq!(input.tick(now + WINDOW), None);
    }

    #[test]
    fn flush_commits_immediately() {
        let now = t0();
        let mut input = SearchInput::new(WINDOW);
        input.push('j', now);
        assert_eq!(input.flush(), Some("j".to_string()));
        assert!(!input.is_pending());
        assert_eq!(input.flush(), None);
    }

    #[test]
    fn cancel_drops_pending_commit() {
        let now = t0();
        let mut input = SearchInput::new(WINDOW);
        input.push('j', now);
        input.cancel();
        assert_eq!(input.tick(now + WINDOW * 2), None);
    }

    #[test]
    fn reset_to_does_not_arm_timer() {
        let mut input = SearchInput::new(WINDOW);
        input.reset_to("doe");
        assert_eq!(input.buffer(), "doe");
        assert!(!input.is_pending());
    }
}
