use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::http_probe::transport::Transport;

/// The probe run configuration for the sockprobe tool.
/// Describes the request to issue, the schedule to issue it on, and how
/// the connection is dialed and verified.
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    /// Absolute HTTP(S) URL to probe.
    pub url: String,

    /// Request method, case-insensitive. Only POST attaches `body`.
    #[serde(default = "default_method")]
    pub method: String,

    /// Request payload; ignored unless `method` is POST.
    #[serde(default)]
    pub body: String,

    /// Custom headers in `"Name: value"` form, attached in order.
    #[serde(default)]
    pub headers: Vec<String>,

    /// Number of probe iterations. Defaults to 100.
    #[serde(default = "default_count")]
    pub count: u32,

    /// Seconds slept before each probe. Defaults to 1.
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,

    /// Per-probe timeout in seconds, dial through full body read.
    /// 0 disables the timeout entirely. Defaults to 10.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// When set, dial this Unix domain socket instead of the URL's
    /// host. A proxy listening there is expected to carry the traffic
    /// upstream.
    #[serde(default)]
    pub unix_socket: Option<PathBuf>,

    /// Verify TLS certificate chains and hostnames. Defaults to true;
    /// turn off only for local/dev endpoints behind a socket proxy.
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,
}

fn default_method() -> String {
    "GET".to_string()
}

fn default_count() -> u32 {
    100
}

fn default_interval() -> u64 {
    1
}

fn default_timeout() -> u64 {
    10
}

fn default_verify_tls() -> bool {
    true
}

impl Default for ProbeConfig {
    /// The stock diagnostic run: probe the translate endpoint through
    /// the fastcar socket, once a second, 100 times.
    fn default() -> Self {
        ProbeConfig {
            url: "https://api.fanyi.baidu.com/api/trans/vip/translate".to_string(),
            method: default_method(),
            body: String::new(),
            headers: Vec::new(),
            count: default_count(),
            interval_seconds: default_interval(),
            timeout_seconds: default_timeout(),
            unix_socket: Some(PathBuf::from("/tmp/fastcar.sock")),
            verify_tls: false,
        }
    }
}

impl ProbeConfig {
    pub fn transport(&self) -> Transport {
        match &self.unix_socket {
            Some(path) => Transport::UnixSocket(path.clone()),
            None => Transport::Network,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds))
    }
}
