// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Capabilities the lifecycle borrows from its surface: free-text prompts
//! and the audible alert.
//!
//! Both are injected so the pass and roster logic can run under a scripted
//! prompt in tests and under the terminal or stdin in production.

use std::future::Future;
use std::io::{BufRead, Write};
use std::pin::Pin;

/// Asks the user for one line of text.
pub trait Prompt: Send {
    /// Returns the trimmed answer, or `None` if the user cancelled or
    /// entered nothing.
    fn ask(&mut self, message: &str) -> Pin<Box<dyn Future<Output = Option<String>> + Send + '_>>;
}

/// Audible alert for over-limit returns.
pub trait Alert: Send {
    fn chime(&mut self);
}

/// Trims an answer, mapping blank input to `None`.
pub fn normalize_answer(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Prompt that reads a line from stdin, for one-shot commands.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn ask(&mut self, message: &str) -> Pin<Box<dyn Future<Output = Option<String>> + Send + '_>> {
        let message = message.to_string();
        Box::pin(async move {
            let answer = tokio::task::spawn_blocking(move || {
                eprint!("{} ", message);
                let _ = std::io::stderr().flush();
                let mut line = String::new();
                match std::io::stdin().lock().read_line(&mut line) {
                    Ok(0) | Err(_) => None,
                    Ok(_) => Some(line),
                }
            })
            .await
            .ok()
            .flatten();
            normalize_answer(answer)
        })
    }
}

/// Alert that rings the terminal bell.
#[derive(Debug, Default)]
pub struct BellAlert;

impl Alert for BellAlert {
    fn chime(&mut self) {
        let mut err = std::io::stderr();
        let _ = err.write_all(b"\x07");
        let _ = err.flush();
    }
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
