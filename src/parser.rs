use crate::cue::Cue;
use crate::error::{Result, TrackError};
use crate::srt::SrtParser;
use crate::vtt::VttParser;

use nom::branch::alt;
use nom::bytes::complete::{tag, take_while_m_n};
use nom::character::complete::{digit1, space0, space1};
use nom::combinator::{eof, map_res, rest, verify};
use nom::error::{convert_error, ErrorKind, ParseError, VerboseError};
use nom::sequence::{delimited, preceded};
use nom::{Err, IResult};

type PResult<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;
type Timestamp = for<'a> fn(&'a str) -> PResult<'a, f64>;

/// Receives the output of a `CueParser::flush`.
pub trait CueSink {
    fn on_cue(&mut self, cue: Cue);

    /// Called once per malformed block. The block is skipped.
    fn on_error(&mut self, _error: TrackError) {}

    fn on_complete(&mut self) {}
}

/// Streaming subtitle parser. Chunks are buffered by `parse` and turned into
/// cues by `flush`, which consumes the buffer.
pub trait CueParser {
    fn parse(&mut self, chunk: &str);
    fn flush(&mut self, sink: &mut dyn CueSink);
}

/// Sink that keeps everything it is given.
#[derive(Debug, Default)]
pub struct CueCollector {
    pub cues: Vec<Cue>,
    pub errors: Vec<TrackError>,
    pub complete: bool,
}

impl CueSink for CueCollector {
    fn on_cue(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    fn on_error(&mut self, error: TrackError) {
        self.errors.push(error);
    }

    fn on_complete(&mut self) {
        self.complete = true;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Srt,
    Vtt,
}

impl Format {
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "srt" => Ok(Format::Srt),
            "vtt" => Ok(Format::Vtt),
            _ => Err(TrackError::UnsupportedFormat(ext.to_string())),
        }
    }

    pub fn parser(self) -> Box<dyn CueParser> {
        match self {
            Format::Srt => Box::new(SrtParser::new()),
            Format::Vtt => Box::new(VttParser::new()),
        }
    }
}

/// Normalises line endings, drops a leading BOM and trims the whole buffer.
pub(crate) fn normalise(buffer: &str) -> String {
    let text = buffer.replace("\r\n", "\n");
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(&text);
    text.trim().to_string()
}

/// Splits text into blocks of lines separated by one or more blank lines.
pub(crate) fn blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in text.split('\n') {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

/// Parses `HH:MM:SS,mmm --> HH:MM:SS,mmm`.
pub(crate) fn srt_timing(line: &str) -> std::result::Result<(f64, f64), String> {
    timing_line(srt_timestamp, line)
}

/// Parses `[HH:]MM:SS.mmm --> [HH:]MM:SS.mmm [settings]`. Settings are dropped.
pub(crate) fn vtt_timing(line: &str) -> std::result::Result<(f64, f64), String> {
    timing_line(vtt_timestamp, line)
}

fn timing_line(timestamp: Timestamp, line: &str) -> std::result::Result<(f64, f64), String> {
    match timing(timestamp, line) {
        Ok((_, bounds)) => Ok(bounds),
        Err(Err::Error(err)) | Err(Err::Failure(err)) => {
            Err(convert_error(line, err).trim_end().to_string())
        }
        Err(Err::Incomplete(_)) => Err(format!("incomplete timing line '{}'", line)),
    }
}

fn timing(timestamp: Timestamp, input: &str) -> PResult<'_, (f64, f64)> {
    let (input, start) = timestamp(input)?;
    let (input, _) = delimited(space0, tag("-->"), space0)(input)?;
    let (input, end) = timestamp(input)?;
    let (input, _) = alt((eof, preceded(space1, rest)))(input)?;

    Ok((input, (start, end)))
}

fn digits<'a>(count: usize) -> impl FnMut(&'a str) -> PResult<'a, u64> {
    map_res(
        take_while_m_n(count, count, |c: char| c.is_ascii_digit()),
        |s: &str| s.parse::<u64>(),
    )
}

fn sexagesimal<'a>() -> impl FnMut(&'a str) -> PResult<'a, u64> {
    verify(digits(2), |value: &u64| *value < 60)
}

/// Fails with `TooLarge` when the whole seconds do not fit in a `u64`.
fn seconds(input: &str, hours: u64, minutes: u64, secs: u64, millis: u64) -> PResult<'_, f64> {
    let whole = hours
        .checked_mul(3600)
        .and_then(|h| h.checked_add(minutes * 60))
        .and_then(|hm| hm.checked_add(secs));
    match whole {
        Some(whole) => Ok((input, whole as f64 + millis as f64 / 1000.0)),
        None => Err(Err::Error(VerboseError::from_error_kind(
            input,
            ErrorKind::TooLarge,
        ))),
    }
}

fn srt_timestamp(input: &str) -> PResult<'_, f64> {
    let (input, hours) = digits(2)(input)?;
    let (input, _) = tag(":")(input)?;
    let (input, minutes) = digits(2)(input)?;
    let (input, _) = tag(":")(input)?;
    let (input, secs) = digits(2)(input)?;
    let (input, _) = tag(",")(input)?;
    let (input, millis) = digits(3)(input)?;

    seconds(input, hours, minutes, secs, millis)
}

fn vtt_timestamp(input: &str) -> PResult<'_, f64> {
    alt((vtt_long_timestamp, vtt_short_timestamp))(input)
}

fn vtt_long_timestamp(input: &str) -> PResult<'_, f64> {
    let (input, hours) = map_res(digit1, |s: &str| s.parse::<u64>())(input)?;
    let (input, _) = tag(":")(input)?;
    let (input, (minutes, secs, millis)) = vtt_minutes_seconds(input)?;

    seconds(input, hours, minutes, secs, millis)
}

fn vtt_short_timestamp(input: &str) -> PResult<'_, f64> {
    let (input, (minutes, secs, millis)) = vtt_minutes_seconds(input)?;

    seconds(input, 0, minutes, secs, millis)
}

fn vtt_minutes_seconds(input: &str) -> PResult<'_, (u64, u64, u64)> {
    let (input, minutes) = sexagesimal()(input)?;
    let (input, _) = tag(":")(input)?;
    let (input, secs) = sexagesimal()(input)?;
    let (input, _) = tag(".")(input)?;
    let (input, millis) = digits(3)(input)?;

    Ok((input, (minutes, secs, millis)))
}
