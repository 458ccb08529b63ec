// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Keystroke-to-code scan decoder.
//!
//! Badge scanners type a burst of characters, usually followed by Enter or
//! Tab. The decoder accumulates characters and emits the buffer as a scan
//! code on a terminating key, or on an inactivity deadline once the buffer
//! is long enough to be a badge. The deadline is a plain value; the runtime
//! sleeps until it and calls [`ScanDecoder::fire`].

use std::time::Duration;
use tokio::time::Instant;

/// Inactivity window after the last character.
pub const SCAN_IDLE: Duration = Duration::from_millis(600);

/// Minimum buffered length for a deadline flush.
pub const AUTO_FLUSH_LEN: usize = 5;

/// Where an input event originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputTarget {
    /// The station surface itself.
    Surface,
    /// A text-entry widget; its input is never decoded.
    TextField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Enter,
    Tab,
    /// IME composition; always ignored.
    Composition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub key: KeyInput,
    pub target: InputTarget,
}

impl InputEvent {
    pub fn surface(key: KeyInput) -> Self {
        InputEvent {
            key,
            target: InputTarget::Surface,
        }
    }
}

#[derive(Debug, Default)]
pub struct ScanDecoder {
    buffer: String,
    deadline: Option<Instant>,
    active: bool,
}

impl ScanDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Attaches or detaches the decoder. Detaching drops the buffer and
    /// cancels the deadline.
    pub fn set_active(&mut self, active: bool) {
        if self.active != active {
            tracing::debug!(active, "scan decoder attached");
        }
        self.active = active;
        if !active {
            self.buffer.clear();
            self.deadline = None;
        }
    }

    /// The armed inactivity deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn buffered(&self) -> &str {
        &self.buffer
    }

    /// Feeds one event, returning a code when the event completes one.
    pub fn feed(&mut self, event: InputEvent, now: Instant) -> Option<String> {
        if !self.active || event.target == InputTarget::TextField {
            return None;
        }
        match event.key {
            KeyInput::Composition => None,
            KeyInput::Enter | KeyInput::Tab => self.flush(),
            KeyInput::Char(c) => {
                self.buffer.push(c);
                self.deadline = Some(now + SCAN_IDLE);
                None
            }
        }
    }

    /// Handles the inactivity deadline. A short buffer is kept for more
    /// input or a later terminating key.
    pub fn fire(&mut self, now: Instant) -> Option<String> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                if self.buffer.chars().count() >= AUTO_FLUSH_LEN {
                    self.flush()
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn flush(&mut self) -> Option<String> {
        self.deadline = None;
        let raw = std::mem::take(&mut self.buffer);
        let code = raw.trim();
        if code.is_empty() {
            return None;
        }
        tracing::debug!(len = code.len(), "scan code decoded");
        Some(code.to_string())
    }
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
