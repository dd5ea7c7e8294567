use crate::cue::Cue;
use crate::error::TrackError;
use crate::parser::{blocks, normalise, srt_timing, CueParser, CueSink};

use log::{debug, warn};

/// SubRip parser. Each block is an id line, a timing line and the cue text.
#[derive(Debug, Default)]
pub struct SrtParser {
    buffer: String,
}

impl SrtParser {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }
}

impl CueParser for SrtParser {
    fn parse(&mut self, chunk: &str) {
        self.buffer.push_str(chunk);
    }

    fn flush(&mut self, sink: &mut dyn CueSink) {
        let text = normalise(&std::mem::take(&mut self.buffer));
        let blocks = blocks(&text);
        debug!("Flushing {} SRT blocks", blocks.len());

        for (index, lines) in blocks.iter().enumerate() {
            match block_to_cue(index, lines) {
                Ok(cue) => sink.on_cue(cue),
                Err(err) => {
                    warn!("Skipping SRT block: {}", err);
                    sink.on_error(err);
                }
            }
        }
        sink.on_complete();
    }
}

fn block_to_cue(index: usize, lines: &[&str]) -> Result<Cue, TrackError> {
    let block = index + 1;
    let (id, timing) = match lines {
        [id, timing, ..] => (*id, *timing),
        _ => {
            return Err(TrackError::CueParse {
                block,
                reason: "missing timing line".to_string(),
            })
        }
    };
    let (start, end) =
        srt_timing(timing).map_err(|reason| TrackError::CueParse { block, reason })?;
    let text = lines[2..].join("\n");

    Cue::new(id, start, end, text).map_err(|err| TrackError::CueParse {
        block,
        reason: err.to_string(),
    })
}
