//! Text-track cue engine for an HTML5 video player: SubRip and WebVTT
//! parsing, per-track active cue tracking driven by playback time, and
//! projection of the painted cues into a display container.

pub mod activation;
pub mod cue;
pub mod error;
pub mod loader;
pub mod parser;
pub mod render;
pub mod serialiser;
pub mod srt;
pub mod track;
pub mod vtt;

pub use activation::{
    update_active_cues, CueEngine, EngineConfig, MediaElement, TrackId, Transitions,
    DEFAULT_PROCESSING_DELAY,
};
pub use cue::Cue;
pub use error::{Result, TrackError};
pub use loader::{load_into, Fetch, FileFetcher, Loader, ReadyState};
pub use parser::{CueCollector, CueParser, CueSink, Format};
pub use render::{CueRenderer, HtmlRenderer, TextRenderer};
pub use srt::SrtParser;
pub use track::{TextTrack, TextTrackKind, TextTrackMode};
pub use vtt::VttParser;

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticFetch(&'static str);

    impl Fetch for StaticFetch {
        fn fetch(&self, _url: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct Player {
        time: f64,
        pauses: usize,
    }

    impl MediaElement for Player {
        fn current_time(&self) -> f64 {
            self.time
        }

        fn pause(&mut self) {
            self.pauses += 1;
        }
    }

    #[test]
    fn test_load_activate_and_render() {
        let mut english = TextTrack::new(Some("captions"), Some("English"), Some("en"));
        let srt = StaticFetch(
            "1\n00:00:01,000 --> 00:00:02,000\n<b>Hello</b>\n\n\
             2\n00:00:03,000 --> 00:00:04,000\nBye\n",
        );
        let loader = load_into(&mut english, "movie.en.srt", &srt).unwrap();
        assert_eq!(loader.ready_state(), ReadyState::Loaded);
        english.set_mode(TextTrackMode::Showing);

        let mut dutch = TextTrack::new(None, Some("Nederlands"), Some("nl"));
        let vtt = StaticFetch("WEBVTT\n\n00:01.000 --> 00:03.500\nHallo\n");
        load_into(&mut dutch, "movie.nl.vtt", &vtt).unwrap();
        dutch.set_mode(TextTrackMode::Hidden);

        let mut engine = CueEngine::new(EngineConfig::default());
        engine.add_track(english);
        let dutch = engine.add_track(dutch);
        let mut player = Player {
            time: 0.7,
            pauses: 0,
        };
        let mut renderer = TextRenderer::new();

        assert!(engine.time_update(&mut player));
        engine.render(&mut renderer);
        assert_eq!(renderer.lines(), &["Hello"]);
        assert_eq!(engine.track(dutch).unwrap().active_cues().count(), 1);

        player.time = 1.8;
        assert!(engine.time_update(&mut player));
        engine.render(&mut renderer);
        assert!(renderer.lines().is_empty());

        player.time = 2.7;
        engine.time_update(&mut player);
        engine.render(&mut renderer);
        assert_eq!(renderer.lines(), &["Bye"]);
        assert_eq!(player.pauses, 0);
    }
}
