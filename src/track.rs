use crate::cue::Cue;

use std::fmt;

use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTrackKind {
    Subtitles,
    Captions,
    Descriptions,
    Chapters,
    Metadata,
}

impl TextTrackKind {
    /// Absent kinds default to subtitles, unknown kinds become metadata.
    pub fn parse(kind: Option<&str>) -> Self {
        match kind {
            None => TextTrackKind::Subtitles,
            Some("subtitles") => TextTrackKind::Subtitles,
            Some("captions") => TextTrackKind::Captions,
            Some("descriptions") => TextTrackKind::Descriptions,
            Some("chapters") => TextTrackKind::Chapters,
            Some(_) => TextTrackKind::Metadata,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TextTrackKind::Subtitles => "subtitles",
            TextTrackKind::Captions => "captions",
            TextTrackKind::Descriptions => "descriptions",
            TextTrackKind::Chapters => "chapters",
            TextTrackKind::Metadata => "metadata",
        }
    }
}

impl fmt::Display for TextTrackKind {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTrackMode {
    Disabled,
    Hidden,
    Showing,
}

impl TextTrackMode {
    pub fn parse(mode: &str) -> Option<Self> {
        match mode {
            "disabled" => Some(TextTrackMode::Disabled),
            "hidden" => Some(TextTrackMode::Hidden),
            "showing" => Some(TextTrackMode::Showing),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TextTrackMode::Disabled => "disabled",
            TextTrackMode::Hidden => "hidden",
            TextTrackMode::Showing => "showing",
        }
    }
}

impl fmt::Display for TextTrackMode {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}", self.as_str())
    }
}

/// All cues of one subtitle stream plus the subset active at the current
/// playback position.
#[derive(Debug)]
pub struct TextTrack {
    kind: TextTrackKind,
    label: String,
    language: String,
    mode: TextTrackMode,
    cues: Vec<Cue>,
    // Indices into `cues`, kept sorted.
    pub(crate) active: Vec<usize>,
}

impl TextTrack {
    pub fn new(kind: Option<&str>, label: Option<&str>, language: Option<&str>) -> Self {
        Self {
            kind: TextTrackKind::parse(kind),
            label: label.unwrap_or_default().to_string(),
            language: language.unwrap_or_default().to_string(),
            mode: TextTrackMode::Disabled,
            cues: Vec::new(),
            active: Vec::new(),
        }
    }

    pub fn kind(&self) -> TextTrackKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn mode(&self) -> TextTrackMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: TextTrackMode) {
        self.mode = mode;
    }

    /// Sets the mode from its string form. Unknown values leave the mode as is.
    pub fn set_mode_str(&mut self, mode: &str) {
        match TextTrackMode::parse(mode) {
            Some(mode) => self.mode = mode,
            None => debug!("Ignoring invalid track mode '{}'", mode),
        }
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    /// Active cues in cue-list order.
    pub fn active_cues(&self) -> impl Iterator<Item = &Cue> + '_ {
        self.active.iter().map(move |&i| &self.cues[i])
    }

    pub fn is_active(&self, cue: &Cue) -> bool {
        self.active_cues().any(|c| c == cue)
    }

    pub fn cue_by_id(&self, id: &str) -> Option<&Cue> {
        self.cues.iter().find(|c| c.id() == id)
    }

    pub fn add_cue(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    /// Removes the first equal cue. An active cue is dropped from the active
    /// set without counting as an exit.
    pub fn remove_cue(&mut self, cue: &Cue) -> bool {
        let index = match self.cues.iter().position(|c| c == cue) {
            Some(index) => index,
            None => return false,
        };
        self.cues.remove(index);
        self.active.retain(|&i| i != index);
        for i in self.active.iter_mut() {
            if *i > index {
                *i -= 1;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_kind {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (input, expected) = $value;

                assert_eq!(TextTrackKind::parse(input), expected);
            }
        )*
        }
    }

    test_kind! {
        test_kind_absent: (None, TextTrackKind::Subtitles),
        test_kind_subtitles: (Some("subtitles"), TextTrackKind::Subtitles),
        test_kind_captions: (Some("captions"), TextTrackKind::Captions),
        test_kind_descriptions: (Some("descriptions"), TextTrackKind::Descriptions),
        test_kind_chapters: (Some("chapters"), TextTrackKind::Chapters),
        test_kind_metadata: (Some("metadata"), TextTrackKind::Metadata),
        test_kind_unknown: (Some("karaoke"), TextTrackKind::Metadata),
    }

    fn cue(id: &str, start: f64, end: f64) -> Cue {
        Cue::new(id, start, end, id).unwrap()
    }

    #[test]
    fn test_new_track_defaults() {
        let track = TextTrack::new(None, None, Some("nl"));
        assert_eq!(track.kind(), TextTrackKind::Subtitles);
        assert_eq!(track.label(), "");
        assert_eq!(track.language(), "nl");
        assert_eq!(track.mode(), TextTrackMode::Disabled);
        assert!(track.cues().is_empty());
        assert_eq!(track.active_cues().count(), 0);
    }

    #[test]
    fn test_invalid_mode_is_ignored() {
        let mut track = TextTrack::new(None, None, None);
        track.set_mode_str("hidden");
        assert_eq!(track.mode(), TextTrackMode::Hidden);
        track.set_mode_str("visible");
        assert_eq!(track.mode(), TextTrackMode::Hidden);
        track.set_mode_str("Showing");
        assert_eq!(track.mode(), TextTrackMode::Hidden);
    }

    #[test]
    fn test_duplicate_cues_are_kept() {
        let mut track = TextTrack::new(None, None, None);
        track.add_cue(cue("1", 0.0, 1.0));
        track.add_cue(cue("1", 0.0, 1.0));
        assert_eq!(track.cues().len(), 2);
    }

    #[test]
    fn test_remove_cue_removes_first_match_only() {
        let mut track = TextTrack::new(None, None, None);
        track.add_cue(cue("a", 0.0, 1.0));
        track.add_cue(cue("b", 1.0, 2.0));
        track.add_cue(cue("a", 0.0, 1.0));

        assert!(track.remove_cue(&cue("a", 0.0, 1.0)));
        let ids: Vec<&str> = track.cues().iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert!(!track.remove_cue(&cue("c", 0.0, 1.0)));
    }

    #[test]
    fn test_remove_cue_keeps_active_indices_consistent() {
        let mut track = TextTrack::new(None, None, None);
        track.add_cue(cue("a", 0.0, 1.0));
        track.add_cue(cue("b", 0.0, 1.0));
        track.add_cue(cue("c", 0.0, 1.0));
        track.active = vec![0, 2];

        assert!(track.remove_cue(&cue("a", 0.0, 1.0)));
        let active: Vec<&str> = track.active_cues().map(|c| c.id()).collect();
        assert_eq!(active, vec!["c"]);
    }

    #[test]
    fn test_cue_by_id() {
        let mut track = TextTrack::new(None, None, None);
        track.add_cue(cue("a", 0.0, 1.0));
        track.add_cue(cue("b", 1.0, 2.0));
        assert_eq!(track.cue_by_id("b").map(|c| c.start_time()), Some(1.0));
        assert!(track.cue_by_id("z").is_none());
    }
}
