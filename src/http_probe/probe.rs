use std::path::Path;
use std::time::{Duration, Instant};

use bytes::Bytes;
use http::Request;
use http_body_util::Full;
use tokio_native_tls::TlsConnector as TokioTlsConnector;
use url::Url;

use super::ProbeError;
use super::result::{ProbeSuccess, round_ms};
use super::transport::{self, Transport};

/// How a [`Prober`] connects and verifies its peers.
pub struct ProberConfig {
    /// Transport to dial. Defaults to the normal network path.
    pub transport: Transport,
    /// When false, certificate-chain and hostname verification are
    /// disabled for every call on both transports. Disabling this is a
    /// deliberate trade for reaching local/dev endpoints behind a
    /// socket proxy.
    pub verify_tls: bool,
    /// Bounds one probe from dial through full body read. `None`
    /// blocks indefinitely on a stalled connection.
    pub timeout: Option<Duration>,
}

impl Default for ProberConfig {
    fn default() -> Self {
        ProberConfig {
            transport: Transport::Network,
            verify_tls: true,
            timeout: Some(Duration::from_secs(10)),
        }
    }
}

/// Issues one HTTP request per call and measures wall-clock round-trip
/// latency. Every call dials a fresh connection; nothing is pooled and
/// nothing survives the call but the returned result.
pub struct Prober {
    client: reqwest::Client,
    tls: TokioTlsConnector,
    transport: Transport,
    timeout: Option<Duration>,
}

impl Prober {
    pub fn new(config: ProberConfig) -> Result<Self, ProbeError> {
        let mut builder = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .user_agent("sockprobe/1.0");
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if !config.verify_tls {
            // Both checks come off together; the native-tls backend
            // keeps hostname verification on unless told otherwise.
            builder = builder
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true);
        }
        let client = builder.build().map_err(|e| ProbeError::from_source(&e))?;

        let mut tls = native_tls::TlsConnector::builder();
        if !config.verify_tls {
            tls.danger_accept_invalid_certs(true);
            tls.danger_accept_invalid_hostnames(true);
        }
        let tls = tls.build().map_err(|e| ProbeError::from_source(&e))?;

        Ok(Prober {
            client,
            tls: TokioTlsConnector::from(tls),
            transport: config.transport,
            timeout: config.timeout,
        })
    }

    /// One probe: build the request, transmit it, read the full
    /// response body, and report the elapsed time in milliseconds
    /// rounded to two decimals.
    ///
    /// Only a `POST` method attaches `body`; any other token (known or
    /// not) is sent as a custom request method with no payload. 4xx and
    /// 5xx responses are successful probes; only transport failures
    /// produce a [`ProbeError`].
    pub async fn probe(
        &self,
        url: &str,
        method: &str,
        body: &str,
        headers: &[String],
    ) -> Result<ProbeSuccess, ProbeError> {
        let parsed = Url::parse(url).map_err(|e| ProbeError::from_source(&e))?;
        let (method, payload) = attach_payload(method, body);

        let start = Instant::now();
        let fut = self.dispatch(&parsed, &method, payload, headers);
        let (status, response) = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, fut).await.map_err(|_| {
                ProbeError(format!("probe timed out after {:.1}s", limit.as_secs_f64()))
            })??,
            None => fut.await?,
        };
        let delay_ms = round_ms(start.elapsed().as_secs_f64() * 1000.0);

        Ok(ProbeSuccess {
            status,
            response,
            delay_ms,
        })
    }

    async fn dispatch(
        &self,
        url: &Url,
        method: &str,
        payload: Option<Bytes>,
        headers: &[String],
    ) -> Result<(u16, Bytes), ProbeError> {
        match &self.transport {
            Transport::Network => self.send_network(url, method, payload, headers).await,
            Transport::UnixSocket(path) => {
                self.send_unix(path, url, method, payload, headers).await
            }
        }
    }

    async fn send_network(
        &self,
        url: &Url,
        method: &str,
        payload: Option<Bytes>,
        headers: &[String],
    ) -> Result<(u16, Bytes), ProbeError> {
        let method = reqwest::Method::from_bytes(method.as_bytes())
            .map_err(|e| ProbeError::from_source(&e))?;

        let mut request = self.client.request(method, url.clone());
        if let Some(payload) = payload {
            request = request.body(payload);
        }
        for header in headers {
            let (name, value) = split_header(header)?;
            request = request.header(name, value);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| ProbeError::from_source(&e))?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(|e| ProbeError::from_source(&e))?;

        Ok((status, body))
    }

    async fn send_unix(
        &self,
        path: &Path,
        url: &Url,
        method: &str,
        payload: Option<Bytes>,
        headers: &[String],
    ) -> Result<(u16, Bytes), ProbeError> {
        let host = url.host_str().unwrap_or_default().to_string();
        let mut target = url.path().to_string();
        if let Some(query) = url.query() {
            target.push('?');
            target.push_str(query);
        }

        let method =
            http::Method::from_bytes(method.as_bytes()).map_err(|e| ProbeError::from_source(&e))?;

        let mut builder = Request::builder()
            .method(method)
            .uri(target)
            .header(http::header::HOST, &host)
            .header(http::header::USER_AGENT, "sockprobe/1.0");
        for header in headers {
            let (name, value) = split_header(header)?;
            builder = builder.header(name, value);
        }
        let req = builder
            .body(Full::new(payload.unwrap_or_default()))
            .map_err(|e| ProbeError::from_source(&e))?;

        transport::send_over_unix(path, url.scheme() == "https", &host, &self.tls, req).await
    }
}

/// Normalize the method to upper case and decide whether the body rides
/// along. Only POST carries a payload, and a POST payload is attached
/// even when empty.
fn attach_payload(method: &str, body: &str) -> (String, Option<Bytes>) {
    let method = method.to_ascii_uppercase();
    let payload = (method == "POST").then(|| Bytes::from(body.to_owned()));
    (method, payload)
}

fn split_header(raw: &str) -> Result<(&str, &str), ProbeError> {
    match raw.split_once(':') {
        Some((name, value)) => Ok((name.trim(), value.trim())),
        None => Err(ProbeError(format!(
            "malformed header (expected \"Name: value\"): {raw}"
        ))),
    }
}
