//! Line-oriented terminal output.
//!
//! Renderers build `ratatui` lines; [`print_lines`] writes them to stdout,
//! styled through crossterm when stdout is a terminal.

pub mod agents;
pub mod status;
pub mod transcript;

use std::io::{self, IsTerminal, Write};

use ratatui::crossterm::style::{
    Attribute, Color as TermColor, ContentStyle, PrintStyledContent, StyledContent,
};
use ratatui::crossterm::queue;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;

/// The unstyled text of a line.
pub fn plain_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
}

fn term_color(color: Color) -> TermColor {
    match color {
        Color::Reset => TermColor::Reset,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::Gray => TermColor::Grey,
        Color::DarkGray => TermColor::DarkGrey,
        Color::LightRed => TermColor::Red,
        Color::LightGreen => TermColor::Green,
        Color::LightYellow => TermColor::Yellow,
        Color::LightBlue => TermColor::Blue,
        Color::LightMagenta => TermColor::Magenta,
        Color::LightCyan => TermColor::Cyan,
        Color::White => TermColor::White,
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
        Color::Indexed(index) => TermColor::AnsiValue(index),
    }
}

fn content_style(style: Style) -> ContentStyle {
    let mut content = ContentStyle::new();
    content.foreground_color = style.fg.map(term_color);
    content.background_color = style.bg.map(term_color);
    for (modifier, attribute) in [
        (Modifier::BOLD, Attribute::Bold),
        (Modifier::DIM, Attribute::Dim),
        (Modifier::ITALIC, Attribute::Italic),
        (Modifier::UNDERLINED, Attribute::Underlined),
    ] {
        if style.add_modifier.contains(modifier) {
            content.attributes.set(attribute);
        }
    }
    content
}

/// Write `lines` to `out`, with terminal styling when `styled` is set.
pub fn write_lines<W: Write>(out: &mut W, lines: &[Line<'_>], styled: bool) -> io::Result<()> {
    for line in lines {
        if styled {
            for span in &line.spans {
                let style = content_style(line.style.patch(span.style));
                queue!(
                    out,
                    PrintStyledContent(StyledContent::new(style, span.content.as_ref()))
                )?;
            }
            writeln!(out)?;
        } else {
            writeln!(out, "{}", plain_text(line))?;
        }
    }
    out.flush()
}

pub fn print_lines(lines: &[Line<'_>], markup: bool) -> io::Result<()> {
    let stdout = io::stdout();
    let styled = markup && stdout.is_terminal();
    write_lines(&mut stdout.lock(), lines, styled)
}
