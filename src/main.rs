use subcue::{
    load_into, serialiser, CueEngine, EngineConfig, FileFetcher, HtmlRenderer,
    MediaElement, ReadyState, TextRenderer, TextTrack, TextTrackMode,
};

use std::io;

use anyhow::{anyhow, Context, Result};
use clap::Parser as ClapParser;
use log::debug;

fn main() {
    env_logger::init();
    match run() {
        Ok(()) => (),
        Err(err) => {
            eprintln!("An error occurred: {}", err);
            for cause in err.chain().skip(1) {
                eprintln!("    {}", cause);
            }
        }
    }
}

#[derive(ClapParser)]
#[command(about = "Load SRT or WebVTT subtitles and replay their cues against a simulated clock")]
struct Cli {
    #[arg(value_name = "FILE", help = "The subtitle file (.srt or .vtt) to load.")]
    input: String,
    #[arg(long, help = "Track kind: subtitles, captions, descriptions, chapters or metadata.")]
    kind: Option<String>,
    #[arg(long, help = "Track label.")]
    label: Option<String>,
    #[arg(long, help = "Track language.")]
    language: Option<String>,
    #[arg(
        long,
        default_value = "showing",
        help = "Track mode: disabled, hidden or showing."
    )]
    mode: String,
    #[arg(
        long,
        env = "SUBCUE_PROCESSING_DELAY",
        default_value_t = subcue::DEFAULT_PROCESSING_DELAY,
        help = "Seconds added to the playback position before cue bounds are compared."
    )]
    processing_delay: f64,
    #[arg(long, default_value_t = 0.25, help = "Seconds between simulated time updates.")]
    step: f64,
    #[arg(long, help = "Stop the replay at this position. Defaults to the end of the last cue.")]
    until: Option<f64>,
    #[arg(long, help = "Write the parsed cues to standard output as SRT instead of replaying.")]
    dump: bool,
    #[arg(long, help = "Print HTML fragments instead of plain text.")]
    html: bool,
}

/// A player that advances by a fixed step and resumes right after a pause.
struct SimulatedClock {
    time: f64,
    paused: bool,
}

impl MediaElement for SimulatedClock {
    fn current_time(&self) -> f64 {
        self.time
    }

    fn pause(&mut self) {
        self.paused = true;
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    if cli.step.is_nan() || cli.step <= 0.0 {
        return Err(anyhow!("The step must be a positive number of seconds."));
    }

    let mut track = TextTrack::new(
        cli.kind.as_deref(),
        cli.label.as_deref(),
        cli.language.as_deref(),
    );
    let loader = load_into(&mut track, &cli.input, &FileFetcher)
        .context(format!("Failed to load subtitles: '{}'", cli.input))?;
    if loader.ready_state() == ReadyState::Error {
        let err = loader
            .error()
            .map(|e| anyhow!(e.clone()))
            .unwrap_or_else(|| anyhow!("unknown fetch failure"));
        return Err(err.context(format!("Failed to load subtitles: '{}'", cli.input)));
    }
    if track.cues().is_empty() {
        return Err(anyhow!("You appear to have supplied a file without cues."));
    }

    if cli.dump {
        return serialiser::serialise(track.cues(), io::stdout());
    }

    let mode = TextTrackMode::parse(&cli.mode)
        .ok_or_else(|| anyhow!("Unknown track mode: '{}'", cli.mode))?;
    track.set_mode(mode);
    let until = cli.until.unwrap_or_else(|| {
        track
            .cues()
            .iter()
            .map(|c| c.end_time())
            .fold(0.0, f64::max)
    });

    let mut engine = CueEngine::new(EngineConfig {
        processing_delay: cli.processing_delay,
    });
    engine.add_track(track);
    replay(&mut engine, cli.step, until, cli.html);
    Ok(())
}

fn replay(engine: &mut CueEngine, step: f64, until: f64, html: bool) {
    let mut clock = SimulatedClock {
        time: 0.0,
        paused: false,
    };
    let mut html_renderer = HtmlRenderer::new();
    let mut text_renderer = TextRenderer::new();
    let mut tick: u64 = 0;

    while clock.time <= until {
        if engine.time_update(&mut clock) {
            if html {
                engine.render(&mut html_renderer);
                println!("[{:>9.3}] {}", clock.time, html_renderer.fragment());
            } else {
                engine.render(&mut text_renderer);
                println!("[{:>9.3}] {}", clock.time, text_renderer.lines().join(" / "));
            }
        }
        if clock.paused {
            println!("[{:>9.3}] (paused)", clock.time);
            debug!("Resuming simulated playback at {:.3}", clock.time);
            clock.paused = false;
        }
        tick += 1;
        clock.time = tick as f64 * step;
    }
}
