//! Test utilities for integration tests
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use tempfile::TempDir;

use kai::chat::{ChatSession, HistoryDir};
use kai::core::Config;
use kai::openai::{Completion, Message};

/// Stands in for the model. Replies with a numbered answer for each
/// call and records every history it was given so tests can check
/// what would have been sent. The first `failures` calls error out.
#[derive(Clone, Default)]
pub struct ScriptedCompletion {
    pub calls: Arc<Mutex<Vec<Vec<Message>>>>,
    failures: usize,
}

impl ScriptedCompletion {
    pub fn failing() -> Self {
        Self::failing_first(usize::MAX)
    }

    pub fn failing_first(failures: usize) -> Self {
        Self {
            calls: Arc::default(),
            failures,
        }
    }

    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Completion for ScriptedCompletion {
    async fn complete(&self, history: &[Message]) -> Result<String, Error> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(history.to_vec());
        if calls.len() <= self.failures {
            return Err(anyhow!("Quota exceeded"));
        }
        Ok(format!("answer {}", calls.len()))
    }
}

/// Creates a session rooted in a fresh temporary directory with the
/// given config file contents. The directory must be kept alive for
/// as long as the session is used.
pub fn test_session(config: &str, completion: ScriptedCompletion) -> (TempDir, ChatSession) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = dir.path().join("config.yml");
    fs::write(&config_path, config).expect("Failed to write config");

    let session = ChatSession::new(
        Config::load(&config_path).expect("Failed to load config"),
        config_path,
        HistoryDir::new(dir.path().join("history")),
        Box::new(completion),
    );
    (dir, session)
}

pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("Failed to read file")
        .lines()
        .map(String::from)
        .collect()
}
