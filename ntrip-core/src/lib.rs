pub mod bitreader;
pub mod config;
pub mod crc24q;
pub mod decode;
pub mod error;
pub mod frame;
pub mod geodesy;
pub mod nmea;
pub mod output;
pub mod session;
pub mod sourcetable;
pub mod stats;
pub mod stream_format;

pub use config::NtripConfig;
pub use error::{NtripError, Result};
pub use frame::{FrameParser, RtcmFrame};
pub use sourcetable::{parse_sourcetable, MountpointRecord};
pub use stats::{GnssSatStats, MsgStat, SatStatsSummary, StatsAggregator};
