//! Typewriter text reveal.
//!
//! Shows one more character per interval once started. Progress is derived
//! from elapsed time rather than from counting callbacks, so a late frame
//! catches up instead of drifting.

use std::iter::FusedIterator;
use std::str::CharIndices;

use crate::error::{Result, ScrollFxError};

/// Lazy sequence of growing prefixes: "O", "OK", ... ending at the full text.
#[derive(Clone, Debug)]
pub struct Prefixes<'a> {
    text: &'a str,
    chars: CharIndices<'a>,
}

impl<'a> Prefixes<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            chars: text.char_indices(),
        }
    }
}

impl<'a> Iterator for Prefixes<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let (start, ch) = self.chars.next()?;
        Some(&self.text[..start + ch.len_utf8()])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chars.size_hint()
    }
}

impl FusedIterator for Prefixes<'_> {}

#[derive(Clone, Debug, PartialEq)]
pub struct Typewriter {
    text: String,
    interval_ms: f64,
    /// Byte offset of the end of each character.
    ends: Vec<usize>,
    started_at: Option<f64>,
    shown: usize,
    cancelled: bool,
}

impl Typewriter {
    pub fn new(text: impl Into<String>, interval_ms: f64) -> Result<Self> {
        if !interval_ms.is_finite() || interval_ms <= 0.0 {
            return Err(ScrollFxError::InvalidDescriptor {
                reason: format!("typewriter interval must be > 0, got {interval_ms}"),
            });
        }
        let text = text.into();
        let ends = text.char_indices().map(|(i, c)| i + c.len_utf8()).collect();
        Ok(Self {
            text,
            interval_ms,
            ends,
            started_at: None,
            shown: 0,
            cancelled: false,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn prefixes(&self) -> Prefixes<'_> {
        Prefixes::new(&self.text)
    }

    #[inline]
    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.shown == self.ends.len() && self.is_started()
    }

    /// Still revealing characters (hosts show a caret meanwhile).
    #[inline]
    pub fn is_typing(&self) -> bool {
        self.is_started() && !self.cancelled && !self.is_finished()
    }

    /// Begin typing at `now`. Has no effect once started or cancelled.
    pub fn start(&mut self, now: f64) {
        if self.cancelled || self.started_at.is_some() {
            return;
        }
        self.started_at = Some(now);
    }

    /// Start over from an empty string.
    pub fn restart(&mut self, now: f64) {
        self.cancelled = false;
        self.shown = 0;
        self.started_at = Some(now);
    }

    /// Stop for good; later polls emit nothing.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Text currently on screen.
    pub fn displayed(&self) -> &str {
        self.prefix(self.shown)
    }

    fn prefix(&self, chars: usize) -> &str {
        match chars {
            0 => "",
            n => &self.text[..self.ends[n.min(self.ends.len()) - 1]],
        }
    }

    fn due_chars(&self, now: f64, reduced: bool) -> usize {
        let Some(start) = self.started_at else {
            return 0;
        };
        if reduced {
            return self.ends.len();
        }
        let elapsed = (now - start).max(0.0);
        ((elapsed / self.interval_ms).floor() as usize).min(self.ends.len())
    }

    /// Advance to `now`. Returns the new prefix only when it grew.
    pub fn poll(&mut self, now: f64, reduced: bool) -> Option<&str> {
        if self.cancelled {
            return None;
        }
        let due = self.due_chars(now, reduced);
        if due <= self.shown {
            return None;
        }
        self.shown = due;
        Some(self.prefix(due))
    }
}
