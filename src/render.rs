use crate::cue::Cue;

use once_cell::sync::Lazy;
use regex::Regex;

static MARKUP_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?[^>]+>").unwrap());

/// Projects the painted cues into a display container. Every call replaces
/// the previous content entirely.
pub trait CueRenderer {
    fn render(&mut self, cues: &[&Cue]);
}

/// Builds an HTML fragment with one `<div class="cue">` per cue. Payload
/// markup is passed through for the page's own layout.
#[derive(Debug, Default)]
pub struct HtmlRenderer {
    fragment: String,
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }
}

impl CueRenderer for HtmlRenderer {
    fn render(&mut self, cues: &[&Cue]) {
        self.fragment.clear();
        for cue in cues {
            self.fragment.push_str("<div class=\"cue\" data-id=\"");
            self.fragment.push_str(&escape_attribute(cue.id()));
            self.fragment.push_str("\">");
            self.fragment.push_str(&cue.text().replace('\n', "<br>"));
            self.fragment.push_str("</div>");
        }
    }
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Plain-text rendering for terminals: markup tags are stripped and cues are
/// separated by newlines.
#[derive(Debug, Default)]
pub struct TextRenderer {
    lines: Vec<String>,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl CueRenderer for TextRenderer {
    fn render(&mut self, cues: &[&Cue]) {
        self.lines = cues
            .iter()
            .flat_map(|cue| cue.text().lines())
            .map(|line| MARKUP_TAG.replace_all(line, "").into_owned())
            .collect();
    }
}
