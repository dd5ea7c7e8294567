use crate::cue::Cue;
use crate::error::{Result, TrackError};
use crate::parser::{CueSink, Format};
use crate::track::TextTrack;

use std::path::Path;

use log::{info, warn};
use url::Url;

/// Retrieves the body of a subtitle resource.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Reads local paths and `file://` URLs.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileFetcher;

impl Fetch for FileFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        let failure = |reason: String| TrackError::FetchFailure {
            url: url.to_string(),
            reason,
        };
        let path = match Url::parse(url) {
            Ok(parsed) if parsed.scheme() == "file" => parsed
                .to_file_path()
                .map_err(|_| failure("not a local file URL".to_string()))?,
            Ok(parsed) if parsed.scheme().len() > 1 => {
                return Err(failure(format!("unsupported scheme '{}'", parsed.scheme())))
            }
            _ => Path::new(url).to_path_buf(),
        };
        std::fs::read_to_string(&path).map_err(|err| failure(err.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    None,
    Loading,
    Loaded,
    Error,
}

/// Fetches one subtitle resource and streams its cues to a callback.
#[derive(Debug)]
pub struct Loader {
    url: String,
    format: Format,
    ready_state: ReadyState,
    error: Option<TrackError>,
    cue_count: usize,
    parse_errors: usize,
}

impl Loader {
    /// Picks the parser from the URL's extension. Fails before any I/O when
    /// the extension is not `srt` or `vtt`.
    pub fn new(url: &str) -> Result<Self> {
        let format = Format::from_extension(&extension(url))?;
        Ok(Self {
            url: url.to_string(),
            format,
            ready_state: ReadyState::None,
            error: None,
            cue_count: 0,
            parse_errors: 0,
        })
    }

    /// `new` followed by `load`.
    pub fn open<F, C>(url: &str, fetch: &F, on_cue: C) -> Result<Self>
    where
        F: Fetch + ?Sized,
        C: FnMut(Cue),
    {
        let mut loader = Self::new(url)?;
        loader.load(fetch, on_cue);
        Ok(loader)
    }

    /// Performs the single fetch of this loader. Later calls do nothing.
    pub fn load<F, C>(&mut self, fetch: &F, on_cue: C)
    where
        F: Fetch + ?Sized,
        C: FnMut(Cue),
    {
        if self.ready_state != ReadyState::None {
            warn!("Loader for '{}' already used, not fetching again", self.url);
            return;
        }
        self.ready_state = ReadyState::Loading;

        let body = match fetch.fetch(&self.url) {
            Ok(body) => body,
            Err(err) => {
                warn!("{}", err);
                self.error = Some(err);
                self.ready_state = ReadyState::Error;
                return;
            }
        };

        let mut sink = LoaderSink {
            on_cue,
            cues: 0,
            errors: 0,
        };
        let mut parser = self.format.parser();
        parser.parse(&body);
        parser.flush(&mut sink);

        self.cue_count = sink.cues;
        self.parse_errors = sink.errors;
        self.ready_state = ReadyState::Loaded;
        info!(
            "Loaded {} cues from '{}' ({} malformed blocks skipped)",
            self.cue_count, self.url, self.parse_errors
        );
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    /// The fetch failure, if the loader ended in `ReadyState::Error`.
    pub fn error(&self) -> Option<&TrackError> {
        self.error.as_ref()
    }

    pub fn cue_count(&self) -> usize {
        self.cue_count
    }

    /// Malformed blocks skipped during flush. `Loaded` is reached even when
    /// every block failed, so a player that cares must check this count.
    pub fn parse_errors(&self) -> usize {
        self.parse_errors
    }
}

struct LoaderSink<C> {
    on_cue: C,
    cues: usize,
    errors: usize,
}

impl<C: FnMut(Cue)> CueSink for LoaderSink<C> {
    fn on_cue(&mut self, cue: Cue) {
        self.cues += 1;
        (self.on_cue)(cue);
    }

    fn on_error(&mut self, _error: TrackError) {
        self.errors += 1;
    }
}

/// Loads `url` straight into `track`.
pub fn load_into<F: Fetch + ?Sized>(track: &mut TextTrack, url: &str, fetch: &F) -> Result<Loader> {
    Loader::open(url, fetch, |cue| track.add_cue(cue))
}

fn extension(url: &str) -> String {
    let path = match Url::parse(url) {
        Ok(parsed) if parsed.scheme().len() > 1 => parsed.path().to_string(),
        _ => url.split(|c: char| c == '?' || c == '#').next().unwrap_or(url).to_string(),
    };
    Path::new(&path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_string()
}
