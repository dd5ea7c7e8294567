use crate::error::{Result, TrackError};

/// A single timed text entry. Times are in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    id: String,
    start_time: f64,
    end_time: f64,
    text: String,
    pause_on_exit: bool,
}

impl Cue {
    pub fn new<I, T>(id: I, start_time: f64, end_time: f64, text: T) -> Result<Self>
    where
        I: Into<String>,
        T: Into<String>,
    {
        if !start_time.is_finite() || !end_time.is_finite() {
            return Err(TrackError::InvalidCue(format!(
                "non-finite bounds {} --> {}",
                start_time, end_time
            )));
        }
        if start_time < 0.0 {
            return Err(TrackError::InvalidCue(format!(
                "negative start time {}",
                start_time
            )));
        }
        if end_time < start_time {
            return Err(TrackError::InvalidCue(format!(
                "end time {} is before start time {}",
                end_time, start_time
            )));
        }

        Ok(Self {
            id: id.into(),
            start_time,
            end_time,
            text: text.into(),
            pause_on_exit: false,
        })
    }

    /// Request a playback pause when the cue leaves the active set.
    pub fn with_pause_on_exit(mut self, pause_on_exit: bool) -> Self {
        self.pause_on_exit = pause_on_exit;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn pause_on_exit(&self) -> bool {
        self.pause_on_exit
    }

    /// Closed interval test, both bounds inclusive.
    pub fn contains(&self, time: f64) -> bool {
        self.start_time <= time && self.end_time >= time
    }
}
