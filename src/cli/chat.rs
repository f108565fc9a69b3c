//! Interactive line-based chat.
//!
//! Input keeps being read while a reply is outstanding; the session refuses
//! a second submission until the first one completes.

use std::error::Error;
use std::sync::Arc;

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, warn};

use crate::core::backend::{Backend, HttpBackend};
use crate::core::config::Settings;
use crate::core::providers::{ProviderTracker, SelectOutcome};
use crate::core::session::{ChatSession, SubmitOutcome, SubmitRejection};
use crate::ui::agents::render_agent_list;
use crate::ui::print_lines;
use crate::ui::status::{connection_line, render_provider_panel};
use crate::ui::transcript::{render_transcript, MessageRenderConfig};
use crate::utils::logging::LoggingState;

const HELP_TEXT: &str = "\
Chat commands:
  /help             Show this help
  /agents           Show the agents behind the assistant
  /providers        Show cached provider status
  /refresh          Refresh provider status now
  /switch <name>    Make an available provider the default
  /status           Probe the backend and show session state
  /log <filename>   Enable logging to specified file
  /log              Toggle logging pause/resume
  /quit             Leave the chat
Anything else is sent to the assistant.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Help,
    Agents,
    Providers,
    Refresh,
    Switch(Option<String>),
    Status,
    Log(Option<String>),
    Quit,
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput {
    Empty,
    Command(ChatCommand),
    Message(String),
}

impl ChatInput {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return ChatInput::Empty;
        }
        // "/2 nights in Porto" is a message, not a command.
        let Some(command) = trimmed
            .strip_prefix('/')
            .filter(|rest| rest.starts_with(|c: char| c.is_alphabetic() || c == '?'))
        else {
            return ChatInput::Message(line.to_string());
        };

        let mut parts = command.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default().to_ascii_lowercase();
        let arg = parts
            .next()
            .map(str::trim)
            .filter(|arg| !arg.is_empty())
            .map(str::to_string);

        ChatInput::Command(match name.as_str() {
            "help" | "?" => ChatCommand::Help,
            "agents" => ChatCommand::Agents,
            "providers" => ChatCommand::Providers,
            "refresh" => ChatCommand::Refresh,
            "switch" => ChatCommand::Switch(arg),
            "status" => ChatCommand::Status,
            "log" => ChatCommand::Log(arg),
            "quit" | "exit" | "q" => ChatCommand::Quit,
            _ => ChatCommand::Unknown(name),
        })
    }
}

struct ChatContext {
    backend: Arc<dyn Backend>,
    session: ChatSession,
    tracker: Arc<ProviderTracker>,
    logging: LoggingState,
    render: MessageRenderConfig,
    printed: usize,
}

impl ChatContext {
    fn notice(&self, text: &str) {
        let lines: Vec<Line<'static>> = text
            .lines()
            .map(|line| {
                Line::from(Span::styled(
                    line.to_string(),
                    Style::default().fg(Color::DarkGray),
                ))
            })
            .collect();
        self.print(&lines);
    }

    fn print(&self, lines: &[Line<'_>]) {
        if let Err(err) = print_lines(lines, self.render.markup) {
            warn!(error = %err, "Failed to write to stdout");
        }
    }

    /// Print and log every message appended since the last call.
    fn flush_messages(&mut self) {
        let fresh = self.session.messages_since(self.printed);
        if fresh.is_empty() {
            return;
        }
        self.printed += fresh.len();

        let agents = self.session.agents();
        self.print(&render_transcript(&fresh, agents, self.render));
        for message in &fresh {
            if let Err(err) = self.logging.log_turn(message, agents) {
                warn!(error = %err, "Failed to append to transcript log");
            }
        }
    }

    async fn show_providers(&self) {
        let snapshot = self.tracker.snapshot().await;
        let loaded = self.tracker.has_loaded().await;
        self.print(&render_provider_panel(
            &snapshot,
            loaded,
            self.session.is_connected(),
        ));
    }

    /// Returns false when the chat should end.
    async fn run_command(&mut self, command: ChatCommand) -> bool {
        match command {
            ChatCommand::Help => self.notice(HELP_TEXT),
            ChatCommand::Agents => self.print(&render_agent_list(self.session.agents())),
            ChatCommand::Providers => self.show_providers().await,
            ChatCommand::Refresh => {
                if !self.tracker.refresh().await {
                    self.notice("Could not refresh provider status; showing the last known state.");
                }
                self.show_providers().await;
            }
            ChatCommand::Switch(None) => self.notice("Usage: /switch <provider>"),
            ChatCommand::Switch(Some(key)) => match self.tracker.select(&key).await {
                SelectOutcome::Switched => self.notice(&format!("✅ Default provider is now {key}")),
                SelectOutcome::NotSwitchable => {
                    self.notice(&format!("❌ {key} is not an available provider"))
                }
                SelectOutcome::Failed(err) => {
                    self.notice(&format!("❌ Failed to switch to {key}: {err}"))
                }
            },
            ChatCommand::Status => {
                let connected = self.backend.probe().await;
                self.print(&[connection_line(connected)]);
                self.notice(&format!(
                    "User: {}\nAwaiting reply: {}\nAgents loaded: {}\nTranscript log: {}",
                    self.session.user_id(),
                    if self.session.is_sending() { "yes" } else { "no" },
                    self.session.agents().len(),
                    self.logging.get_status_string(),
                ));
            }
            ChatCommand::Log(Some(path)) => match self.logging.set_log_file(path) {
                Ok(message) => self.notice(&message),
                Err(err) => self.notice(&format!("❌ Error setting log file: {err}")),
            },
            ChatCommand::Log(None) => match self.logging.toggle_logging("Logging paused") {
                Ok(message) => self.notice(&message),
                Err(err) => self.notice(&format!("❌ {err}")),
            },
            ChatCommand::Quit => return false,
            ChatCommand::Unknown(name) => {
                self.notice(&format!("Unknown command: /{name}. Type /help for commands."))
            }
        }
        true
    }

    fn submit(&mut self, text: &str) -> Option<JoinHandle<SubmitOutcome>> {
        match self.session.begin_submit(text) {
            Ok(pending) => {
                self.flush_messages();
                Some(tokio::spawn(pending.complete()))
            }
            Err(SubmitRejection::Busy) => {
                self.notice("⏳ Still waiting for the previous reply; message not sent.");
                None
            }
            Err(SubmitRejection::Blank) => None,
        }
    }
}

async fn wait_for_reply(
    pending: &mut Option<JoinHandle<SubmitOutcome>>,
) -> Result<SubmitOutcome, JoinError> {
    match pending {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

pub async fn run_chat(settings: Settings, log_file: Option<String>) -> Result<(), Box<dyn Error>> {
    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(&settings.base_url));
    let logging = LoggingState::new(log_file)?;

    println!("🧭 Wayfarer connected to {}", settings.base_url);
    println!("💡 Type /help for commands, /quit to leave.");
    println!();

    let session = ChatSession::initialize(backend.clone(), settings.user_id.clone()).await;
    let tracker = Arc::new(ProviderTracker::new(backend.clone()));
    let poller = tracker.start_polling(settings.provider_refresh);

    let mut chat = ChatContext {
        backend,
        session,
        tracker,
        logging,
        render: MessageRenderConfig::markup(settings.markup),
        printed: 0,
    };
    chat.flush_messages();

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut pending: Option<JoinHandle<SubmitOutcome>> = None;

    loop {
        tokio::select! {
            outcome = wait_for_reply(&mut pending) => {
                pending = None;
                match outcome {
                    Ok(SubmitOutcome::Failed { error, .. }) => debug!(error = %error, "Reply failed"),
                    Ok(_) => {}
                    Err(err) => warn!(error = %err, "Send task ended unexpectedly"),
                }
                chat.flush_messages();
            }
            line = input.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match ChatInput::parse(&line) {
                    ChatInput::Empty => {}
                    ChatInput::Command(command) => {
                        if !chat.run_command(command).await {
                            break;
                        }
                    }
                    ChatInput::Message(text) => {
                        if let Some(handle) = chat.submit(&text) {
                            pending = Some(handle);
                        }
                    }
                }
            }
        }
    }

    if let Some(handle) = pending.take() {
        handle.abort();
    }
    poller.stop().await;
    Ok(())
}
