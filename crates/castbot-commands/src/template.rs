//! Reply templates.
//!
//! A template is literal text with `{{ name }}` placeholders. The only
//! placeholder today is `uptime`. After substitution, emoji shortcodes such
//! as `:tada:` are replaced with the emoji itself.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::status::{StatusProvider, uptime_text};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("valid regex"));

static SHORTCODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":([a-z0-9_+\-]+):").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placeholder {
    Uptime,
}

impl Placeholder {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "uptime" => Some(Self::Uptime),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Placeholder(Placeholder),
}

/// A parsed reply template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse `source`, rejecting unknown placeholders and unbalanced braces.
    pub fn parse(source: &str) -> Result<Self, String> {
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in PLACEHOLDER.captures_iter(source) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            push_text(&mut segments, &source[last..whole.start()])?;
            let placeholder = Placeholder::parse(name.as_str())
                .ok_or_else(|| format!("unknown placeholder {:?}", name.as_str()))?;
            segments.push(Segment::Placeholder(placeholder));
            last = whole.end();
        }
        push_text(&mut segments, &source[last..])?;

        Ok(Self { segments })
    }

    pub fn uses_status(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Placeholder(Placeholder::Uptime)))
    }

    /// Render with live values from `status`, then decorate emoji.
    pub async fn render<S: StatusProvider>(&self, status: &S) -> String {
        let uptime = if self.uses_status() {
            uptime_text(status).await
        } else {
            String::new()
        };

        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Placeholder(Placeholder::Uptime) => out.push_str(&uptime),
            }
        }
        emojize(&out)
    }
}

fn push_text(segments: &mut Vec<Segment>, text: &str) -> Result<(), String> {
    if text.contains("{{") || text.contains("}}") {
        return Err(format!("malformed placeholder in {text:?}"));
    }
    if !text.is_empty() {
        segments.push(Segment::Text(text.to_string()));
    }
    Ok(())
}

/// Replace `:shortcode:` with its emoji. Unknown shortcodes stay as written.
///
/// The emoji is inserted bare, with no trailing space, so `:tada::tada:`
/// becomes two adjacent emoji and punctuation after a shortcode stays put.
pub fn emojize(text: &str) -> String {
    SHORTCODE
        .replace_all(text, |caps: &Captures| match emojis::get_by_shortcode(&caps[1]) {
            Some(emoji) => emoji.as_str().to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
