//! Explicit decoder output sink.
//!
//! The original decoder redirected its `printf`-style output through a
//! process-global buffer pointer (`g_rtcm_strbuf`). Every decode entry point
//! here instead takes a `&mut dyn OutputSink`, so multiple sessions can
//! decode concurrently without a shared mutable global.

use std::fmt;

/// Destination for decoder textual output.
pub trait OutputSink {
    fn write_line(&mut self, line: fmt::Arguments);
}

/// Writes every line to stdout, for interactive CLI use.
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write_line(&mut self, line: fmt::Arguments) {
        println!("{}", line);
    }
}

/// Captures every line into an owned, growable buffer instead of a process
/// stream. Capacity doubling is inherited from `String`'s own `Vec<u8>`
/// growth policy.
#[derive(Debug, Default)]
pub struct CapturedSink {
    pub buffer: String,
}

impl CapturedSink {
    pub fn new() -> Self {
        CapturedSink::default()
    }
}

impl OutputSink for CapturedSink {
    fn write_line(&mut self, line: fmt::Arguments) {
        use std::fmt::Write;
        let _ = writeln!(self.buffer, "{}", line);
    }
}

/// Convenience macro mirroring the original `rtcm_printf` call sites.
#[macro_export]
macro_rules! sink_writeln {
    ($sink:expr, $($arg:tt)*) => {
        $sink.write_line(format_args!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captured_sink_accumulates_lines() {
        let mut sink = CapturedSink::new();
        sink_writeln!(sink, "station {}", 1234);
        sink_writeln!(sink, "lat {:.4}", 52.1);
        assert_eq!(sink.buffer, "station 1234\nlat 52.1000\n");
    }

    #[test]
    fn decoding_twice_into_fresh_buffers_is_idempotent() {
        let mut first = CapturedSink::new();
        let mut second = CapturedSink::new();
        for sink in [&mut first, &mut second] {
            sink_writeln!(sink, "station {}", 42);
        }
        assert_eq!(first.buffer, second.buffer);
    }
}
