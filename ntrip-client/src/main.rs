use std::error::Error;
use std::sync::atomic::Ordering;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use ntrip_core::output::StdoutSink;
use ntrip_core::session::{self, SessionEvent, SessionTelemetry};
use ntrip_core::stats::StatsAggregator;

mod config;
mod utils;

fn main() -> Result<(), Box<dyn Error>> {
    utils::logger_init()?;
    log::info!("ntrip-client started");

    let result = run();
    if let Err(e) = &result {
        log::error!("{}", e);
    } else {
        log::info!("session ended");
    }
    result
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = config::load()?;
    log::info!(
        "connecting to {}:{} mountpoint {}",
        config.host,
        config.port,
        config.mountpoint_name()
    );

    let cancel = session::new_cancel_flag();
    let telemetry = Arc::new(SessionTelemetry::default());
    let (tx, rx) = mpsc::channel();

    let session_config = config.clone();
    let session_cancel = cancel.clone();
    let session_telemetry = telemetry.clone();
    let handle = thread::spawn(move || {
        let mut sink = StdoutSink;
        let mut stats = StatsAggregator::new();
        session::run_stream_session(
            &session_config,
            session_cancel,
            &mut stats,
            &mut sink,
            tx,
            &session_telemetry,
        )
    });

    for _ in utils::GameLoop::from_fps(5) {
        for event in rx.try_iter() {
            if let SessionEvent::StreamDone = event {
                log::warn!("caster closed the connection");
            }
        }
        if handle.is_finished() {
            break;
        }
    }

    let session_result = handle.join().unwrap_or_else(|_| Err(ntrip_core::NtripError::Cancelled));

    log::info!(
        "{} bytes received, {} frames decoded",
        telemetry.bytes_received.load(Ordering::Relaxed),
        telemetry.frames_decoded.load(Ordering::Relaxed)
    );

    match session_result {
        Ok(()) | Err(ntrip_core::NtripError::Cancelled) => Ok(()),
        Err(e) => Err(Box::new(e)),
    }
}
