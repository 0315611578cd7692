// src/runner/mock.rs

//! Scripted runner for exercising resources without a controller
//!
//! Responses are registered against a suffix of the command line, e.g.
//! `"raw 0x30 0x47 0x02"` or `"lan print 1"`. Registering the same suffix
//! again queues another response; the last queued response repeats once the
//! queue is drained. Commands with no matching rule succeed with empty output.
//! Every invocation (redacted and raw) and every settle delay is recorded
//! for later assertions.

use super::{redact, CommandOutput, CommandRunner};
use crate::error::Result;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

struct Rule {
    suffix: String,
    responses: VecDeque<CommandOutput>,
}

/// A [`CommandRunner`] that replays canned output
#[derive(Default)]
pub struct MockRunner {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<String>>,
    argvs: Mutex<Vec<Vec<String>>>,
    settles: Mutex<Vec<Duration>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to commands ending in `suffix` with a successful `stdout`
    pub fn on(&self, suffix: &str, stdout: &str) -> &Self {
        self.on_output(suffix, CommandOutput::ok(stdout))
    }

    /// Respond to commands ending in `suffix` with a non-zero exit
    pub fn on_failure(&self, suffix: &str, stderr: &str) -> &Self {
        self.on_output(suffix, CommandOutput::failed(stderr))
    }

    pub fn on_output(&self, suffix: &str, output: CommandOutput) -> &Self {
        let mut rules = self.rules.lock().unwrap_or_else(|e| e.into_inner());
        match rules.iter_mut().find(|r| r.suffix == suffix) {
            Some(rule) => rule.responses.push_back(output),
            None => rules.push(Rule {
                suffix: suffix.to_string(),
                responses: VecDeque::from([output]),
            }),
        }
        self
    }

    /// Drop the rule for `suffix` and its queued responses
    pub fn clear(&self, suffix: &str) -> &Self {
        self.rules
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|r| r.suffix != suffix);
        self
    }

    /// All command lines run so far, space-joined and redacted
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// All argument vectors run so far, unredacted
    pub fn argvs(&self) -> Vec<Vec<String>> {
        self.argvs.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of recorded command lines containing `needle`
    pub fn count(&self, needle: &str) -> usize {
        self.calls().iter().filter(|c| c.contains(needle)).count()
    }

    /// Index of the first recorded command line containing `needle`
    pub fn position(&self, needle: &str) -> Option<usize> {
        self.calls().iter().position(|c| c.contains(needle))
    }

    pub fn settles(&self) -> Vec<Duration> {
        self.settles.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn next_response(&self, line: &str) -> CommandOutput {
        let mut rules = self.rules.lock().unwrap_or_else(|e| e.into_inner());
        let Some(rule) = rules.iter_mut().find(|r| line.ends_with(&r.suffix)) else {
            return CommandOutput::ok("");
        };
        if rule.responses.len() > 1 {
            rule.responses.pop_front().unwrap_or_default()
        } else {
            rule.responses.front().cloned().unwrap_or_default()
        }
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, argv: &[String], force_fail: bool) -> Result<CommandOutput> {
        let line = argv.join(" ");
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(redact(argv));
        self.argvs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(argv.to_vec());

        let output = self.next_response(&line);
        if force_fail && !output.success() {
            return Err(output.into_error(redact(argv)));
        }
        Ok(output)
    }

    fn settle(&self, duration: Duration) {
        self.settles
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(duration);
    }
}
