//! Headless rehearsal: scrolls through a presentation on a simulated clock
//! and logs every window edge and channel level along the way.
//! Run with `--help` for the options.

use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;
use strip_core::{
    ContentId, Edge, PlayableChannel, PlaybackRejected, Presentation, PresentationConfig,
};

/// Stands in for a media element; remembers only what it would be doing.
struct LoggingChannel {
    name: String,
    volume: f32,
    playing: bool,
}

impl PlayableChannel for LoggingChannel {
    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn play(&mut self) -> Result<(), PlaybackRejected> {
        if !self.playing {
            log::debug!("[native] {} play", self.name);
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        if self.playing {
            log::debug!("[native] {} pause", self.name);
        }
        self.playing = false;
    }

    fn rewind(&mut self) {}
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct OverlayScript {
    open_s: f32,
    close_s: f32,
    content: ContentId,
}

#[derive(Parser, Debug)]
#[command(name = "strip-native")]
#[command(about = "Rehearse a scroll-driven presentation on a simulated clock")]
struct Cli {
    /// Presentation config as JSON; the built-in presentation when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Length of the scripted scroll from top to bottom
    #[arg(long, default_value_t = 20.0, value_parser = parse_seconds)]
    seconds: f32,

    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    fps: u32,

    /// Open the overlay at OPEN seconds and close it at CLOSE, showing CONTENT
    #[arg(long, value_name = "OPEN:CLOSE:CONTENT", value_parser = parse_overlay)]
    overlay: Option<OverlayScript>,

    /// Print the resolved config as JSON and exit
    #[arg(long)]
    print_config: bool,
}

fn parse_seconds(arg: &str) -> anyhow::Result<f32> {
    let seconds: f32 = arg.parse().context("seconds")?;
    if !(seconds.is_finite() && seconds > 0.0) {
        bail!("seconds must be positive, got {arg}");
    }
    Ok(seconds)
}

fn parse_overlay(arg: &str) -> anyhow::Result<OverlayScript> {
    let parts: Vec<&str> = arg.split(':').collect();
    let [open, close, content] = parts.as_slice() else {
        bail!("--overlay expects OPEN:CLOSE:CONTENT, got {arg:?}");
    };
    let script = OverlayScript {
        open_s: open.parse().context("overlay open time")?,
        close_s: close.parse().context("overlay close time")?,
        content: content.parse().context("overlay content id")?,
    };
    if script.close_s < script.open_s {
        bail!("overlay closes before it opens");
    }
    Ok(script)
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<PresentationConfig> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
        }
        None => Ok(PresentationConfig::music_strip()),
    }
}

fn log_levels(t: f32, presentation: &Presentation<LoggingChannel>) {
    let registry = presentation.registry();
    let bg = registry.background();
    let mut line = format!(
        "[t={t:6.2}s] pos={:6.3} master={:.2} {}={:.3}",
        presentation.position(),
        registry.master_level(),
        bg.name(),
        bg.output().volume
    );
    for ch in registry.ambients().iter().filter(|c| c.is_playing()) {
        line.push_str(&format!(" {}={:.3}", ch.name(), ch.output().volume));
    }
    log::info!("{}", line);
}

fn rehearse(opts: &Cli, config: PresentationConfig) -> anyhow::Result<()> {
    let mut presentation = Presentation::new(config, |def| LoggingChannel {
        name: def.name.clone(),
        volume: 0.0,
        playing: false,
    })?;

    let frame_ms = 1000.0 / opts.fps as f32;
    let tick_ms = presentation.config().tuning.fade_tick_ms as f32;
    let total_frames = (opts.seconds * opts.fps as f32).ceil() as u32;
    let mut audio_clock_ms = 0.0_f32;
    let mut overlay_open = false;
    let mut last_logged_second = -1_i32;

    for frame in 0..=total_frames {
        let t = frame as f32 * frame_ms / 1000.0;
        let fraction = (t / opts.seconds).min(1.0);

        if let Some(script) = opts.overlay {
            if !overlay_open && t >= script.open_s && t < script.close_s {
                overlay_open = true;
                if let Some(change) = presentation.open_overlay(script.content) {
                    log::info!("[t={t:6.2}s] overlay {:?}", change);
                }
            } else if overlay_open && t >= script.close_s {
                overlay_open = false;
                if let Some(change) = presentation.close_overlay() {
                    log::info!("[t={t:6.2}s] overlay {:?}", change);
                }
            }
        }

        let report = presentation.frame(fraction);
        for tr in &report.transitions {
            let verb = match tr.edge {
                Edge::Enter => "enter",
                Edge::Exit => "exit",
            };
            log::info!(
                "[t={t:6.2}s] pos={:6.3} {} {} {}",
                report.position,
                verb,
                tr.kind.label(),
                presentation.windows().name(tr.signal)
            );
        }

        audio_clock_ms += frame_ms;
        while audio_clock_ms >= tick_ms {
            audio_clock_ms -= tick_ms;
            presentation.fade_tick();
        }

        if t.floor() as i32 > last_logged_second {
            last_logged_second = t.floor() as i32;
            log_levels(t, &presentation);
        }
    }

    presentation.shutdown();
    log::info!("[native] rehearsal finished after {:.1}s", opts.seconds);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let opts = Cli::parse();
    let config = load_config(opts.config.as_ref())?;
    if opts.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }
    rehearse(&opts, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("strip-native").chain(args.iter().copied()))
    }

    #[test]
    fn parses_overlay_script() {
        let opts = cli(&["--overlay", "4.5:7:3", "--fps", "30"]).unwrap();
        assert_eq!(
            opts.overlay,
            Some(OverlayScript {
                open_s: 4.5,
                close_s: 7.0,
                content: 3
            })
        );
        assert_eq!(opts.fps, 30);
        assert_eq!(opts.seconds, 20.0);
        assert!(!opts.print_config);
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(cli(&["--overlay", "7:4:1"]).is_err());
        assert!(cli(&["--overlay", "1:2"]).is_err());
        assert!(cli(&["--fps", "0"]).is_err());
        assert!(cli(&["--seconds", "-1"]).is_err());
        assert!(cli(&["--seconds"]).is_err());
        assert!(cli(&["--loud"]).is_err());
    }

    #[test]
    fn rehearsal_runs_default_presentation() {
        let opts = cli(&["--seconds", "2", "--fps", "20", "--overlay", "0.5:1:2"]).unwrap();
        rehearse(&opts, PresentationConfig::music_strip()).unwrap();
    }
}
