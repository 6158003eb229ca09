use bytes::Bytes;

/// Outcome of a probe that made it through to a full HTTP response.
///
/// HTTP-level failures (4xx/5xx) still land here with their status code;
/// only transport failures produce a [`ProbeError`](super::ProbeError).
#[derive(Debug, Clone)]
pub struct ProbeSuccess {
    /// Numeric HTTP response code.
    pub status: u16,
    /// The full response body, read to completion before timing stops.
    pub response: Bytes,
    /// Wall-clock round-trip time in milliseconds, two decimal places.
    pub delay_ms: f64,
}

/// Round a millisecond value to two decimal places.
pub fn round_ms(ms: f64) -> f64 {
    (ms * 100.0).round() / 100.0
}

/// Render a delay the way the driver loop prints it: two decimal
/// places, no unit suffix.
pub fn format_delay(delay_ms: f64) -> String {
    format!("{:.2}", delay_ms)
}
