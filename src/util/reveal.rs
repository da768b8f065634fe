//! Progressive text reveal.
//!
//! A [`Reveal`] exposes a growing character prefix of a fixed text, one
//! character per tick, from a background tokio task. The full text is always
//! available; only the displayed prefix changes.
//!
//! CANCELLATION
//! ============
//! The ticking task is tied to a `CancellationToken` whose drop guard lives
//! in the `Reveal`. Dropping or replacing the `Reveal` (slot overwritten,
//! wizard restarted, modal closed) stops the timer; nothing outlives its
//! owner.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::{CancellationToken, DropGuard};

pub struct Reveal {
    text: Arc<str>,
    total: usize,
    shown: watch::Receiver<usize>,
    guard: Option<DropGuard>,
}

impl Reveal {
    /// Start revealing `text` at one character per `interval`.
    ///
    /// A zero interval or empty text yields a completed reveal without
    /// spawning anything. Must be called inside a tokio runtime otherwise.
    pub fn start(text: impl Into<Arc<str>>, interval: Duration) -> Self {
        let text = text.into();
        let total = text.chars().count();
        if interval.is_zero() || total == 0 {
            return Self::completed(text);
        }

        let (tx, rx) = watch::channel(0usize);
        let token = CancellationToken::new();
        let cancelled = token.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            for shown in 1..=total {
                tokio::select! {
                    () = cancelled.cancelled() => return,
                    _ = ticker.tick() => {}
                }
                if tx.send(shown).is_err() {
                    return;
                }
            }
        });

        Self { text, total, shown: rx, guard: Some(token.drop_guard()) }
    }

    /// A reveal that already shows everything.
    pub fn completed(text: impl Into<Arc<str>>) -> Self {
        let text = text.into();
        let total = text.chars().count();
        let (_tx, rx) = watch::channel(total);
        Self { text, total, shown: rx, guard: None }
    }

    #[must_use]
    pub fn full_text(&self) -> &str {
        &self.text
    }

    /// The prefix currently on display.
    #[must_use]
    pub fn displayed(&self) -> &str {
        let shown = *self.shown.borrow();
        match self.text.char_indices().nth(shown) {
            Some((end, _)) => &self.text[..end],
            None => &self.text,
        }
    }

    #[must_use]
    pub fn shown_chars(&self) -> usize {
        *self.shown.borrow()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        *self.shown.borrow() >= self.total
    }

    /// Wait until the whole text is displayed, or until the reveal is
    /// cancelled.
    pub async fn finished(&self) {
        let mut rx = self.shown.clone();
        let total = self.total;
        let _ = rx.wait_for(|shown| *shown >= total).await;
    }

    /// Wait until at least `chars` characters are displayed (capped at the
    /// text length), or until the reveal is cancelled.
    pub async fn reached(&self, chars: usize) {
        let mut rx = self.shown.clone();
        let wanted = chars.min(self.total);
        let _ = rx.wait_for(|shown| *shown >= wanted).await;
    }

    /// Receiver of the displayed character count, for renderers that redraw
    /// on change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.shown.clone()
    }
}

impl fmt::Debug for Reveal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reveal")
            .field("total", &self.total)
            .field("shown", &*self.shown.borrow())
            .field("running", &self.guard.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "reveal_test.rs"]
mod tests;
