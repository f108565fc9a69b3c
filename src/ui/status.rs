//! Provider panel and connection indicator.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::core::providers::ProviderSnapshot;

const AVAILABLE_MARK: &str = "✓";
const UNAVAILABLE_MARK: &str = "✗";

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(UnicodeWidthStr::width(text));
    format!("{text}{}", " ".repeat(fill))
}

/// `● API Connected` / `● API Disconnected`.
pub fn connection_line(connected: bool) -> Line<'static> {
    let (color, label) = if connected {
        (Color::Green, "API Connected")
    } else {
        (Color::Red, "API Disconnected")
    };
    Line::from(vec![
        Span::styled("● ", Style::default().fg(color)),
        Span::styled(label, Style::default().fg(color)),
    ])
}

/// `N of M providers active`.
pub fn summary_line(snapshot: &ProviderSnapshot) -> Line<'static> {
    Line::from(Span::styled(
        format!(
            "{} of {} providers active",
            snapshot.available_count(),
            snapshot.total()
        ),
        Style::default().fg(Color::DarkGray),
    ))
}

/// One row per provider in key order, then the summary and connectivity.
///
/// The `default` badge is shown only when the default provider is
/// currently available.
pub fn render_provider_panel(
    snapshot: &ProviderSnapshot,
    loaded: bool,
    connected: bool,
) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        "LLM Providers",
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    if !loaded {
        lines.push(Line::from(Span::styled(
            "  Provider status not loaded yet",
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(connection_line(connected));
        return lines;
    }

    let key_width = snapshot
        .providers()
        .keys()
        .map(|key| UnicodeWidthStr::width(key.as_str()))
        .max()
        .unwrap_or(0);
    let name_width = snapshot
        .providers()
        .iter()
        .map(|(key, provider)| UnicodeWidthStr::width(provider.name.as_deref().unwrap_or(key)))
        .max()
        .unwrap_or(0);
    let badge = snapshot.badge_key();

    for (key, provider) in snapshot.providers() {
        let (mark, mark_color) = if provider.available {
            (AVAILABLE_MARK, Color::Green)
        } else {
            (UNAVAILABLE_MARK, Color::Red)
        };
        let name = provider.name.as_deref().unwrap_or(key);

        let mut spans = vec![
            Span::raw("  "),
            Span::styled(mark, Style::default().fg(mark_color)),
            Span::raw(" "),
            Span::raw(pad(key, key_width)),
            Span::raw("  "),
            Span::raw(pad(name, name_width)),
            Span::styled(
                format!("  {}", provider.status),
                Style::default().fg(Color::DarkGray),
            ),
        ];
        if badge == Some(key.as_str()) {
            spans.push(Span::styled(
                "  default",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ));
        }
        lines.push(Line::from(spans));

        if !provider.models.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("      {}", provider.models.join(", ")),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    lines.push(summary_line(snapshot));
    lines.push(connection_line(connected));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::providers::ProviderStatus;
    use crate::ui::plain_text;
    use std::collections::BTreeMap;

    fn status(name: &str, available: bool, status: &str) -> ProviderStatus {
        ProviderStatus {
            name: Some(name.to_string()),
            available,
            models: Vec::new(),
            status: status.to_string(),
        }
    }

    fn sample(default: &str) -> ProviderSnapshot {
        let mut providers = BTreeMap::new();
        providers.insert("openai".to_string(), status("OpenAI", true, "Available"));
        providers.insert("cohere".to_string(), status("Cohere", false, "No API Key"));
        providers.insert("anthropic".to_string(), status("Anthropic", true, "Available"));
        ProviderSnapshot::new(providers, Some(default.to_string()))
    }

    #[test]
    fn rows_are_sorted_and_aligned() {
        let text: Vec<String> = render_provider_panel(&sample("openai"), true, true)
            .iter()
            .map(plain_text)
            .collect();
        assert_eq!(
            text,
            vec![
                "LLM Providers",
                "  ✓ anthropic  Anthropic  Available",
                "  ✗ cohere     Cohere     No API Key",
                "  ✓ openai     OpenAI     Available  default",
                "2 of 3 providers active",
                "● API Connected",
            ]
        );
    }

    #[test]
    fn unavailable_default_gets_no_badge() {
        let text: Vec<String> = render_provider_panel(&sample("cohere"), true, false)
            .iter()
            .map(plain_text)
            .collect();
        assert!(text.iter().all(|line| !line.ends_with("default")));
        assert_eq!(text.last().map(String::as_str), Some("● API Disconnected"));
    }

    #[test]
    fn unloaded_panel_says_so() {
        let lines = render_provider_panel(&ProviderSnapshot::default(), false, false);
        assert_eq!(plain_text(&lines[1]), "  Provider status not loaded yet");
        assert_eq!(lines.len(), 3);
    }
}
