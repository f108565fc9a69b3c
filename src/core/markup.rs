//! Line classifier for the lightweight message markup.
//!
//! Message content is rendered line by line. Each line is classified on its
//! own, with no state carried between lines:
//! - a line starting with `• ` is a bullet; the marker is dropped
//! - a line that both starts and ends with `**` is bold; every `**` pair is
//!   removed from the text
//! - anything else is plain text, kept verbatim

const BULLET_MARKER: &str = "• ";
const BOLD_MARKER: &str = "**";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Bullet,
    Bold,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine<'a> {
    pub kind: LineKind,
    pub text: std::borrow::Cow<'a, str>,
}

pub fn classify_line(line: &str) -> ClassifiedLine<'_> {
    if let Some(rest) = line.strip_prefix(BULLET_MARKER) {
        return ClassifiedLine {
            kind: LineKind::Bullet,
            text: rest.into(),
        };
    }

    if line.starts_with(BOLD_MARKER) && line.ends_with(BOLD_MARKER) {
        return ClassifiedLine {
            kind: LineKind::Bold,
            text: line.replace(BOLD_MARKER, "").into(),
        };
    }

    ClassifiedLine {
        kind: LineKind::Plain,
        text: line.into(),
    }
}

/// Lazily classify every line of `content`, splitting on `\n` only.
pub fn classify_lines(content: &str) -> impl Iterator<Item = ClassifiedLine<'_>> {
    content.split('\n').map(classify_line)
}
