use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::agents::AgentRegistry;
use crate::ui::transcript::persona_color;

/// Agent list: name, id and active flag, then specialisations and
/// description on indented lines.
pub fn render_agent_list(agents: &AgentRegistry) -> Vec<Line<'static>> {
    if agents.is_empty() {
        return vec![Line::from(Span::styled(
            "No agents available.",
            Style::default().fg(Color::DarkGray),
        ))];
    }

    let mut lines = vec![Line::from(Span::styled(
        format!("Agents ({} active of {})", agents.active().count(), agents.len()),
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    for agent in agents.agents() {
        let (state, state_color) = if agent.active {
            ("active", Color::Green)
        } else {
            ("inactive", Color::DarkGray)
        };
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                agent.name.clone(),
                Style::default()
                    .fg(persona_color(&agent.color))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" ({})", agent.id), Style::default().fg(Color::DarkGray)),
            Span::styled(format!("  {state}"), Style::default().fg(state_color)),
        ]));
        if !agent.specialization.is_empty() {
            lines.push(Line::from(format!(
                "    {}",
                agent.specialization.join(", ")
            )));
        }
        if !agent.description.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("    {}", agent.description),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }
    lines
}
