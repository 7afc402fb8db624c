//! A single open-to-close lifetime of the assistant.
//!
//! The front end builds one `ChatSession` at startup and turns each
//! user action into a `Command`. `ChatSession::dispatch` runs it and
//! hands back an `Outcome` for the front end to show. The model call
//! is injected so the whole lifecycle can run without a network.
use std::path::PathBuf;

use anyhow::{Result, bail};

use super::history::{HistoryDir, SEPARATOR};
use super::models::{Transcript, to_display_line};
use crate::core::Config;
use crate::core::config::read_raw;
use crate::openai::{BoxedCompletion, Role};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Closing,
    Closed,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Submit(String),
    ListHistory,
    Load(String),
    ViewConfig,
    ConfigStatus,
    Close,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// Lines to add to the on-screen transcript for one turn.
    Reply(Vec<String>),
    /// Nothing was sent, either an empty prompt or no API key.
    Skipped,
    Sessions(Vec<String>),
    Text(String),
    NotFound(String),
    Closed(Option<PathBuf>),
}

pub struct ChatSession {
    config: Config,
    config_path: PathBuf,
    transcript: Transcript,
    history: HistoryDir,
    completion: BoxedCompletion,
    state: SessionState,
}

impl ChatSession {
    pub fn new(
        config: Config,
        config_path: PathBuf,
        history: HistoryDir,
        completion: BoxedCompletion,
    ) -> Self {
        Self {
            config,
            config_path,
            transcript: Transcript::new(),
            history,
            completion,
            state: SessionState::Open,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn history(&self) -> &HistoryDir {
        &self.history
    }

    pub async fn dispatch(&mut self, command: Command) -> Result<Outcome> {
        match command {
            Command::Submit(prompt) => self.submit(&prompt).await,
            Command::ListHistory => Ok(Outcome::Sessions(
                self.history.list_consolidated_sessions()?,
            )),
            Command::Load(name) => Ok(match self.history.read(&name)? {
                Some(text) => Outcome::Text(text),
                None => Outcome::NotFound(name),
            }),
            Command::ViewConfig => Ok(match read_raw(&self.config_path)? {
                Some(text) => Outcome::Text(text),
                None => Outcome::NotFound(self.config_path.display().to_string()),
            }),
            Command::ConfigStatus => Ok(Outcome::Text(self.config.status())),
            Command::Close => Ok(Outcome::Closed(self.close()?)),
        }
    }

    /// Runs one turn: records the prompt, sends the full history to
    /// the model, records the reply and appends both to the
    /// incremental transcript. If the model call fails the prompt
    /// stays in the history without a reply.
    pub async fn submit(&mut self, prompt: &str) -> Result<Outcome> {
        if self.state != SessionState::Open {
            bail!("Session is {:?}, not accepting prompts", self.state);
        }
        if prompt.trim().is_empty() {
            return Ok(Outcome::Skipped);
        }
        if !self.config.has_api_key() {
            tracing::warn!("API key is not configured, skipping prompt");
            return Ok(Outcome::Skipped);
        }

        let user_msg = self.transcript.append(Role::User, prompt);
        let reply = self
            .completion
            .complete(&self.transcript.to_ai_history())
            .await?;
        let assistant_msg = self.transcript.append(Role::Assistant, &reply);

        self.history.append_incremental(&user_msg, &assistant_msg)?;
        tracing::debug!("Turn saved, {} messages in session", self.transcript.len());

        Ok(Outcome::Reply(vec![
            to_display_line(&user_msg),
            to_display_line(&assistant_msg),
            SEPARATOR.to_string(),
        ]))
    }

    /// Writes the consolidated transcript if there is anything to
    /// write. Once closed, later calls do nothing.
    pub fn close(&mut self) -> Result<Option<PathBuf>> {
        if self.state == SessionState::Closed {
            return Ok(None);
        }
        self.state = SessionState::Closing;
        let path = self.history.write_consolidated(&self.transcript)?;
        self.state = SessionState::Closed;
        Ok(path)
    }
}
