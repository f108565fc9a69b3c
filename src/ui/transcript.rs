//! Conversation rendering.
//!
//! Each message becomes a header line (author, local time, optional
//! confidence), its body lines, an optional sources footer and a trailing
//! blank separator.

use std::str::FromStr;

use chrono::{DateTime, Local, Utc};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::agents::{AgentRegistry, Persona};
use crate::core::constants::DEFAULT_PERSONA_COLOR;
use crate::core::markup::{classify_lines, LineKind};
use crate::core::message::Message;

const USER_LABEL: &str = "You";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRenderConfig {
    /// When false, content is printed verbatim without line classification.
    pub markup: bool,
}

impl MessageRenderConfig {
    pub fn markup(enabled: bool) -> Self {
        Self { markup: enabled }
    }
}

impl Default for MessageRenderConfig {
    fn default() -> Self {
        Self::markup(true)
    }
}

/// Parse a `#RRGGBB` persona colour, falling back to the default persona's.
pub fn persona_color(color: &str) -> Color {
    Color::from_str(color)
        .or_else(|_| Color::from_str(DEFAULT_PERSONA_COLOR))
        .unwrap_or(Color::Blue)
}

/// `HH:MM` in the local timezone.
pub fn format_time(timestamp: DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M").to_string()
}

fn meta_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn header_line(message: &Message, persona: Option<Persona<'_>>) -> Line<'static> {
    let author = match persona {
        Some(persona) => {
            let mut style = Style::default()
                .fg(persona_color(persona.color))
                .add_modifier(Modifier::BOLD);
            // Stand-in for an agent the registry does not know.
            if !persona.resolved {
                style = style.add_modifier(Modifier::ITALIC);
            }
            Span::styled(persona.name.to_string(), style)
        }
        None => Span::styled(
            USER_LABEL,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
    };

    let mut spans = vec![
        author,
        Span::styled(format!("  {}", format_time(message.timestamp)), meta_style()),
    ];
    if let Some(percent) = message.metadata().and_then(|meta| meta.confidence_percent()) {
        spans.push(Span::styled(
            format!("  {percent}% confidence"),
            meta_style(),
        ));
    }
    Line::from(spans)
}

fn body_lines(content: &str, config: MessageRenderConfig) -> Vec<Line<'static>> {
    if !config.markup {
        return content
            .split('\n')
            .map(|line| Line::from(line.to_string()))
            .collect();
    }

    classify_lines(content)
        .map(|line| match line.kind {
            LineKind::Bullet => Line::from(vec![
                Span::styled("  • ", Style::default().fg(Color::Cyan)),
                Span::raw(line.text.into_owned()),
            ]),
            LineKind::Bold => Line::from(Span::styled(
                line.text.into_owned(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            LineKind::Plain => Line::from(line.text.into_owned()),
        })
        .collect()
}

/// Render one message.
pub fn render_message(
    message: &Message,
    agents: &AgentRegistry,
    config: MessageRenderConfig,
) -> Vec<Line<'static>> {
    let persona = (!message.is_user()).then(|| agents.persona_for(message.agent_id()));

    let mut lines = vec![header_line(message, persona)];
    lines.extend(body_lines(&message.content, config));

    if let Some(meta) = message.metadata().filter(|meta| !meta.sources.is_empty()) {
        lines.push(Line::from(Span::styled(
            format!("via {}", meta.sources.join(", ")),
            meta_style().add_modifier(Modifier::ITALIC),
        )));
    }

    lines.push(Line::default());
    lines
}

pub fn render_transcript<'a>(
    messages: impl IntoIterator<Item = &'a Message>,
    agents: &AgentRegistry,
    config: MessageRenderConfig,
) -> Vec<Line<'static>> {
    messages
        .into_iter()
        .flat_map(|message| render_message(message, agents, config))
        .collect()
}
