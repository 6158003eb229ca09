use std::path::{Path, PathBuf};

use bytes::Bytes;
use http::Request;
use http_body_util::{BodyExt, Full};
use hyper_util::rt::TokioIo;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::UnixStream;
use tokio_native_tls::TlsConnector as TokioTlsConnector;

use super::ProbeError;

/// Where a probe dials its connection.
#[derive(Debug, Clone, Default)]
pub enum Transport {
    /// Resolve the URL's host and connect over the network as usual.
    #[default]
    Network,
    /// Dial this Unix domain socket path instead of the URL's host.
    /// The URL still supplies the scheme, Host header and request path;
    /// whatever listens on the socket is expected to carry the traffic
    /// to the real upstream.
    UnixSocket(PathBuf),
}

/// Send a single request over a freshly dialed Unix domain socket.
/// For `https` URLs the stream is wrapped in a TLS handshake against
/// `host` before HTTP starts.
pub(super) async fn send_over_unix(
    path: &Path,
    https: bool,
    host: &str,
    tls: &TokioTlsConnector,
    req: Request<Full<Bytes>>,
) -> Result<(u16, Bytes), ProbeError> {
    let stream = UnixStream::connect(path)
        .await
        .map_err(|e| ProbeError::from_source(&e))?;

    if https {
        let stream = tls
            .connect(host, stream)
            .await
            .map_err(|e| ProbeError::from_source(&e))?;
        send_request(stream, req).await
    } else {
        send_request(stream, req).await
    }
}

/// HTTP/1 handshake, one request, full body read. The connection is not
/// reused; it is torn down when the driving task finishes.
async fn send_request<S>(stream: S, req: Request<Full<Bytes>>) -> Result<(u16, Bytes), ProbeError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let io = TokioIo::new(stream);
    let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
        .await
        .map_err(|e| ProbeError::from_source(&e))?;

    tokio::spawn(async move {
        let _ = conn.await;
    });

    let resp = sender
        .send_request(req)
        .await
        .map_err(|e| ProbeError::from_source(&e))?;

    let status = resp.status().as_u16();
    let body = resp
        .into_body()
        .collect()
        .await
        .map_err(|e| ProbeError::from_source(&e))?
        .to_bytes();

    Ok((status, body))
}
