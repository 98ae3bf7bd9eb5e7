//! The NTRIP session: TCP handshake, GGA uplink, and streamed RTCM decode.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;

use crate::config::NtripConfig;
use crate::decode;
use crate::error::{NtripError, Result};
use crate::frame::FrameParser;
use crate::nmea::build_gga;
use crate::output::OutputSink;
use crate::stats::StatsAggregator;
use crate::stream_format::{self, StreamFormat};

const RECEIVE_TIMEOUT: Duration = Duration::from_millis(200);
const GGA_UPLOAD_INTERVAL: Duration = Duration::from_secs(1);
const HEADER_BUFFER_LIMIT: usize = 4096;

/// Events a running session publishes to an interested consumer (a CLI
/// printer, or eventually a UI). Ownership of any buffer transfers with the
/// send.
pub enum SessionEvent {
    RawFrame(Vec<u8>),
    StreamDone,
}

/// Cross-thread telemetry updated only by the session thread.
#[derive(Default)]
pub struct SessionTelemetry {
    pub bytes_received: AtomicU64,
    pub frames_decoded: AtomicU64,
}

/// One-shot cooperative cancellation flag, polled by the session between
/// socket reads.
pub fn new_cancel_flag() -> Arc<AtomicBool> {
    Arc::new(AtomicBool::new(false))
}

/// Requests a sourcetable listing from the caster and returns the response
/// body up to (and including) the `ENDSOURCETABLE` terminator.
pub fn fetch_sourcetable(config: &NtripConfig) -> Result<String> {
    let mut stream = connect(config)?;

    let request = format!(
        "GET / HTTP/1.1\r\nHost: {}\r\nUser-Agent: NTRIP ntrip-client/1.0\r\nAuthorization: Basic {}\r\n\r\n",
        config.host,
        config.basic_auth_token()
    );
    stream.write_all(request.as_bytes()).map_err(NtripError::SendFailed)?;

    let mut body = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = stream.read(&mut buf)?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&buf[..n]);
        if contains(&body, b"ENDSOURCETABLE") {
            break;
        }
    }

    Ok(String::from_utf8_lossy(&body).into_owned())
}

/// Runs a stream-mode session until `cancel` is set or the server closes
/// the connection. Every complete, length-valid frame is decoded through
/// `sink` and recorded into `stats`; raw frame bytes and terminal events are
/// forwarded over `events`.
pub fn run_stream_session(
    config: &NtripConfig,
    cancel: Arc<AtomicBool>,
    stats: &mut StatsAggregator,
    sink: &mut dyn OutputSink,
    events: Sender<SessionEvent>,
    telemetry: &SessionTelemetry,
) -> Result<()> {
    let mut stream = connect(config)?;
    stream.set_read_timeout(Some(RECEIVE_TIMEOUT))?;

    send_stream_request(&mut stream, config)?;
    skip_response_header(&mut stream)?;

    let mut parser = FrameParser::new();
    let mut read_buf = [0u8; 4096];
    let mut last_gga_sent = Instant::now();
    let start = Instant::now();
    let mut format_logged = false;

    loop {
        if cancel.load(Ordering::Relaxed) {
            return Err(NtripError::Cancelled);
        }

        if last_gga_sent.elapsed() >= GGA_UPLOAD_INTERVAL {
            if let Some((lat, lon)) = config.rover_position() {
                let sentence = build_gga(lat, lon, Utc::now());
                stream.write_all(sentence.as_bytes()).map_err(NtripError::SendFailed)?;
            }
            last_gga_sent = Instant::now();
        }

        match stream.read(&mut read_buf) {
            Ok(0) => {
                let _ = events.send(SessionEvent::StreamDone);
                return Ok(());
            }
            Ok(n) => {
                telemetry.bytes_received.fetch_add(n as u64, Ordering::Relaxed);

                if !format_logged {
                    format_logged = true;
                    if stream_format::detect_from_sync_bytes(&read_buf[..n]) != StreamFormat::Rtcm3 {
                        log::warn!("stream does not start with an RTCM3 preamble; framing may desync");
                    }
                }

                parser.push(&read_buf[..n]);

                for frame in parser.poll() {
                    let now = start.elapsed().as_secs_f64();
                    stats.record(frame.msg_type, now);
                    stats.record_satellites(&frame.payload, frame.msg_type);

                    let _ = decode::decode(&frame, config.rover_position(), sink);

                    telemetry.frames_decoded.fetch_add(1, Ordering::Relaxed);
                    let _ = events.send(SessionEvent::RawFrame(frame.raw));
                }
            }
            Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock || e.kind() == std::io::ErrorKind::TimedOut => {
                continue;
            }
            Err(e) => return Err(NtripError::Io(e)),
        }
    }
}

fn connect(config: &NtripConfig) -> Result<TcpStream> {
    TcpStream::connect((config.host.as_str(), config.port)).map_err(|source| NtripError::ConnectFailed {
        host: config.host.clone(),
        port: config.port,
        source,
    })
}

fn send_stream_request(stream: &mut TcpStream, config: &NtripConfig) -> Result<()> {
    let request = format!(
        "GET /{} HTTP/1.1\r\nHost: {}\r\nNtrip-Version: Ntrip/2.0\r\nUser-Agent: NTRIP ntrip-client/1.0\r\nAuthorization: Basic {}\r\n\r\n",
        config.mountpoint_name(),
        config.host,
        config.basic_auth_token()
    );
    stream.write_all(request.as_bytes()).map_err(NtripError::SendFailed)
}

/// Reads from `stream` until the response header's terminating `\r\n\r\n` is
/// found, validates the status line, and leaves the stream positioned right
/// after the header so subsequent reads yield only RTCM bytes.
fn skip_response_header(stream: &mut TcpStream) -> Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 512];

    loop {
        if buf.len() > HEADER_BUFFER_LIMIT {
            return Err(NtripError::ProtocolDesync { limit: HEADER_BUFFER_LIMIT });
        }

        let n = stream.read(&mut chunk)?;
        if n == 0 {
            return Err(NtripError::ProtocolDesync { limit: HEADER_BUFFER_LIMIT });
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(pos) = find_subsequence(&buf, b"\r\n\r\n") {
            let header_text = String::from_utf8_lossy(&buf[..pos]);
            let status_line = header_text.lines().next().unwrap_or("");
            if !status_line.contains("200") {
                return Err(NtripError::AuthRejected {
                    status_line: status_line.to_string(),
                });
            }
            return Ok(());
        }
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    find_subsequence(haystack, needle).is_some()
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
