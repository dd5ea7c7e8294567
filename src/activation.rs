use crate::cue::Cue;
use crate::render::CueRenderer;
use crate::track::{TextTrack, TextTrackMode};

use log::debug;

/// Look-ahead added to the playback position before cue bounds are compared,
/// so text is staged slightly ahead of the frame it belongs to.
pub const DEFAULT_PROCESSING_DELAY: f64 = 0.39;

/// The player a cue engine is attached to.
pub trait MediaElement {
    /// Current playback position in seconds.
    fn current_time(&self) -> f64;

    /// Fire-and-forget pause request. Pausing a paused element is a no-op.
    fn pause(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub processing_delay: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            processing_delay: DEFAULT_PROCESSING_DELAY,
        }
    }
}

/// What one pass over a track changed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Transitions {
    pub entered: usize,
    pub exited: usize,
    pub pauses: usize,
}

impl Transitions {
    pub fn is_empty(&self) -> bool {
        self.entered == 0 && self.exited == 0
    }
}

/// Recomputes the active cues of one track for playback time `time`.
/// Disabled tracks are left untouched.
pub fn update_active_cues(
    track: &mut TextTrack,
    time: f64,
    processing_delay: f64,
    media: &mut dyn MediaElement,
) -> Transitions {
    let mut transitions = Transitions::default();
    if track.mode() == TextTrackMode::Disabled {
        return transitions;
    }
    let time = time + processing_delay;

    // Exits first, back to front so removal keeps the remaining indices valid.
    for slot in (0..track.active.len()).rev() {
        let index = track.active[slot];
        let cue = &track.cues()[index];
        if cue.start_time() > time || cue.end_time() < time {
            let pause = cue.pause_on_exit();
            debug!("Cue '{}' exited at {:.3}", cue.id(), time);
            track.active.remove(slot);
            transitions.exited += 1;
            if pause {
                media.pause();
                transitions.pauses += 1;
            }
        }
    }

    let mut entering = Vec::new();
    for (index, cue) in track.cues().iter().enumerate() {
        if cue.contains(time) && track.active.binary_search(&index).is_err() {
            debug!("Cue '{}' entered at {:.3}", cue.id(), time);
            entering.push(index);
        }
    }
    for index in entering {
        if let Err(slot) = track.active.binary_search(&index) {
            track.active.insert(slot, index);
            transitions.entered += 1;
        }
    }

    transitions
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackId(usize);

/// The text tracks attached to one player.
#[derive(Debug, Default)]
pub struct CueEngine {
    config: EngineConfig,
    tracks: Vec<TextTrack>,
}

impl CueEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            tracks: Vec::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn add_track(&mut self, track: TextTrack) -> TrackId {
        self.tracks.push(track);
        TrackId(self.tracks.len() - 1)
    }

    pub fn track(&self, id: TrackId) -> Option<&TextTrack> {
        self.tracks.get(id.0)
    }

    pub fn track_mut(&mut self, id: TrackId) -> Option<&mut TextTrack> {
        self.tracks.get_mut(id.0)
    }

    pub fn tracks(&self) -> impl Iterator<Item = &TextTrack> + '_ {
        self.tracks.iter()
    }

    /// Runs on every time-advance notification of the player, seeks included.
    /// Returns true when the set of painted cues changed.
    pub fn time_update(&mut self, media: &mut dyn MediaElement) -> bool {
        let time = media.current_time();
        let delay = self.config.processing_delay;
        let mut repaint = false;
        for track in self.tracks.iter_mut() {
            let transitions = update_active_cues(track, time, delay, media);
            if track.mode() == TextTrackMode::Showing && !transitions.is_empty() {
                repaint = true;
            }
        }
        repaint
    }

    /// Active cues of all showing tracks, in track order then cue order.
    pub fn showing_cues(&self) -> Vec<&Cue> {
        self.tracks
            .iter()
            .filter(|t| t.mode() == TextTrackMode::Showing)
            .flat_map(|t| t.active_cues())
            .collect()
    }

    pub fn render<R: CueRenderer + ?Sized>(&self, renderer: &mut R) {
        renderer.render(&self.showing_cues());
    }
}
