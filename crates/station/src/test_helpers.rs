// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted prompt and counting alert for lifecycle tests.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;

use crate::prompt::{normalize_answer, Alert, Prompt};

/// Answers prompts from a fixed script; runs out as cancellations.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<Option<String>>,
    /// Every message asked, in order.
    pub asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        ScriptedPrompt {
            answers: answers.into_iter().map(|a| a.map(Into::into)).collect(),
            asked: Vec::new(),
        }
    }

    /// A prompt the test expects never to be asked.
    pub fn silent() -> Self {
        Self::default()
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, message: &str) -> Pin<Box<dyn Future<Output = Option<String>> + Send + '_>> {
        self.asked.push(message.to_string());
        let answer = self.answers.pop_front().flatten();
        Box::pin(async move { normalize_answer(answer) })
    }
}

#[derive(Debug, Default)]
pub struct CountingAlert {
    pub chimes: usize,
}

impl Alert for CountingAlert {
    fn chime(&mut self) {
        self.chimes += 1;
    }
}
