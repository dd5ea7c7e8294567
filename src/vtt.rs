use crate::cue::Cue;
use crate::error::TrackError;
use crate::parser::{blocks, normalise, vtt_timing, CueParser, CueSink};

use log::{debug, warn};

/// WebVTT parser. Only the id, the cue bounds and the payload are extracted.
/// Cue settings are not interpreted; the payload markup is left untouched for
/// the renderer.
#[derive(Debug, Default)]
pub struct VttParser {
    buffer: String,
}

impl VttParser {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }
}

impl CueParser for VttParser {
    fn parse(&mut self, chunk: &str) {
        self.buffer.push_str(chunk);
    }

    fn flush(&mut self, sink: &mut dyn CueSink) {
        let text = normalise(&std::mem::take(&mut self.buffer));
        let blocks = blocks(&text);

        match blocks.first() {
            Some(header) if is_signature(header[0]) => {}
            _ => {
                let err = TrackError::CueParse {
                    block: 0,
                    reason: "missing WEBVTT signature".to_string(),
                };
                warn!("Rejecting WebVTT file: {}", err);
                sink.on_error(err);
                sink.on_complete();
                return;
            }
        }
        debug!("Flushing {} WebVTT blocks", blocks.len() - 1);

        for (index, lines) in blocks.iter().enumerate().skip(1) {
            if is_ignored_block(lines[0]) {
                continue;
            }
            match block_to_cue(index, lines) {
                Ok(cue) => sink.on_cue(cue),
                Err(err) => {
                    warn!("Skipping WebVTT block: {}", err);
                    sink.on_error(err);
                }
            }
        }
        sink.on_complete();
    }
}

fn is_signature(line: &str) -> bool {
    keyword(line, "WEBVTT")
}

fn is_ignored_block(line: &str) -> bool {
    keyword(line, "NOTE") || keyword(line, "STYLE") || keyword(line, "REGION")
}

fn keyword(line: &str, word: &str) -> bool {
    match line.strip_prefix(word) {
        Some(rest) => rest.is_empty() || rest.starts_with(' ') || rest.starts_with('\t'),
        None => false,
    }
}

fn block_to_cue(block: usize, lines: &[&str]) -> Result<Cue, TrackError> {
    let (id, timing_index) = if lines[0].contains("-->") {
        ("", 0)
    } else {
        (lines[0], 1)
    };
    let timing = lines.get(timing_index).ok_or_else(|| TrackError::CueParse {
        block,
        reason: "missing timing line".to_string(),
    })?;
    let (start, end) =
        vtt_timing(timing).map_err(|reason| TrackError::CueParse { block, reason })?;
    let text = lines[timing_index + 1..].join("\n");

    Cue::new(id, start, end, text).map_err(|err| TrackError::CueParse {
        block,
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::CueCollector;

    fn parse_all(input: &str) -> CueCollector {
        let mut parser = VttParser::new();
        parser.parse(input);
        let mut sink = CueCollector::default();
        parser.flush(&mut sink);
        sink
    }

    #[test]
    fn test_parse_cues_with_and_without_ids() {
        let out = parse_all(
            "WEBVTT - demo\n\n\
             intro\n00:01.000 --> 00:02.500 align:start\n<v Bob>Hello</v>\n\n\
             00:00:03.000 --> 00:00:04.000\nSecond\nline\n",
        );

        assert!(out.errors.is_empty());
        assert_eq!(out.cues.len(), 2);
        assert_eq!(out.cues[0].id(), "intro");
        assert_eq!(out.cues[0].start_time(), 1.0);
        assert_eq!(out.cues[0].end_time(), 2.5);
        assert_eq!(out.cues[0].text(), "<v Bob>Hello</v>");
        assert_eq!(out.cues[1].id(), "");
        assert_eq!(out.cues[1].text(), "Second\nline");
        assert!(out.complete);
    }

    #[test]
    fn test_skips_note_style_and_region_blocks() {
        let out = parse_all(
            "WEBVTT\n\nNOTE this is a comment\n\nSTYLE\n::cue { color: red }\n\n\
             REGION\nid:fred\n\n00:01.000 --> 00:02.000\nText\n",
        );
        assert!(out.errors.is_empty());
        assert_eq!(out.cues.len(), 1);
    }

    #[test]
    fn test_missing_signature() {
        let out = parse_all("00:01.000 --> 00:02.000\nText\n");
        assert_eq!(out.errors.len(), 1);
        assert!(out.cues.is_empty());
        assert!(out.complete);
    }

    #[test]
    fn test_signature_must_be_a_word() {
        let out = parse_all("WEBVTTX\n\n00:01.000 --> 00:02.000\nText\n");
        assert_eq!(out.errors.len(), 1);
        assert!(out.cues.is_empty());
    }

    #[test]
    fn test_overflowing_hours_are_a_parse_error() {
        let out = parse_all(
            "WEBVTT\n\n9999999999999999:00:00.000 --> 9999999999999999:00:01.000\nBoom\n\n\
             00:03.000 --> 00:04.000\nOk\n",
        );
        assert_eq!(out.errors.len(), 1);
        assert!(matches!(out.errors[0], TrackError::CueParse { block: 1, .. }));
        assert_eq!(out.cues.len(), 1);
        assert_eq!(out.cues[0].text(), "Ok");
        assert!(out.complete);
    }

    #[test]
    fn test_minutes_above_59_are_a_parse_error() {
        let out = parse_all("WEBVTT\n\n00:99.000 --> 01:40.000\nLate\n");
        assert_eq!(out.errors.len(), 1);
        assert!(out.cues.is_empty());
    }

    #[test]
    fn test_malformed_cue_is_skipped() {
        let out = parse_all(
            "WEBVTT\n\nbad\n00:01,000 --> 00:02,000\nText\n\n00:03.000 --> 00:04.000\nOk\n",
        );
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.cues.len(), 1);
        assert_eq!(out.cues[0].text(), "Ok");
    }
}
