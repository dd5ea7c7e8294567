use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrackError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackError {
    #[error("Unsupported subtitle format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Failed to fetch '{url}': {reason}")]
    FetchFailure { url: String, reason: String },

    #[error("Malformed cue in block {block}: {reason}")]
    CueParse { block: usize, reason: String },

    #[error("Invalid cue: {0}")]
    InvalidCue(String),
}
