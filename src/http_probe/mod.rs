pub mod probe;
pub mod result;
pub mod transport;

use std::fmt::Write;

pub mod prelude {
    pub use super::ProbeError;
    pub use super::probe::{Prober, ProberConfig};
    pub use super::result::{ProbeSuccess, format_delay};
    pub use super::transport::Transport;
}

/// The single failure kind a probe distinguishes. DNS, connect, TLS,
/// timeout and transfer errors all collapse into one human-readable
/// message; no status, body or delay survives a failed call.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct ProbeError(pub String);

impl ProbeError {
    pub fn from_source(err: &(dyn std::error::Error + 'static)) -> Self {
        ProbeError(report(err))
    }
}

fn report(mut err: &(dyn std::error::Error + 'static)) -> String {
    let mut s = format!("{}", err);
    while let Some(src) = err.source() {
        let _ = write!(s, ": {}", src);
        err = src;
    }
    s
}
