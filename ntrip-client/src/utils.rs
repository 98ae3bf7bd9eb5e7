use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::error::Error;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Initializes the logger. Reads the RUST_LOG environment variable and sets
/// the log level (one of error, warn, info, debug, trace; default info).
pub fn logger_init() -> Result<(), Box<dyn Error>> {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let log_level = LevelFilter::from_str(&log_level).unwrap_or(LevelFilter::Info);

    TermLogger::init(log_level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto)?;
    Ok(())
}

/// An iterator that waits when `next` is called if execution outpaces the
/// configured frame rate. Used to poll the session's event channel and print
/// a periodic summary without busy-looping.
pub struct GameLoop {
    current_frame_start: Instant,
    duration_per_frame: Duration,
}

impl GameLoop {
    pub fn new(duration_per_frame: Duration) -> GameLoop {
        GameLoop {
            current_frame_start: Instant::now(),
            duration_per_frame,
        }
    }

    pub fn from_fps(fps: usize) -> GameLoop {
        Self::new(Duration::from_secs_f32(1.0 / (fps as f32)))
    }
}

impl Iterator for GameLoop {
    type Item = ();

    fn next(&mut self) -> Option<Self::Item> {
        let end_time = self.current_frame_start + self.duration_per_frame;
        let now = Instant::now();
        if now <= end_time {
            std::thread::sleep(end_time - now);
        } else {
            log::warn!("The poll loop is hanging behind by {:?}.", now - end_time);
        }

        self.current_frame_start = Instant::now();
        Some(())
    }
}
