use std::future::Future;
use std::io::Write;
use std::time::Duration;

use tokio::time::sleep;

use crate::http_probe::ProbeError;
use crate::http_probe::result::{ProbeSuccess, format_delay};

/// The probe schedule: sleep, probe, print one delay line per success.
/// The sleep is wall-clock and not compensated for probe duration, so a
/// full run takes roughly `count * (interval + probe latency)`.
pub async fn run_loop<P, Fut, W>(count: u32, interval: Duration, mut out: W, probe: P)
where
    P: Fn() -> Fut,
    Fut: Future<Output = Result<ProbeSuccess, ProbeError>>,
    W: Write,
{
    for _ in 0..count {
        sleep(interval).await;

        match probe().await {
            Ok(result) => {
                if let Err(e) = writeln!(out, "{}", format_delay(result.delay_ms)) {
                    log::warn!("Failed to write delay line: {e}");
                }
            }
            // A failed probe never fakes a delay value: the message
            // goes to the log and the loop moves on.
            Err(e) => log::warn!("Probe failed: {e}"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use bytes::Bytes;

    #[tokio::test(start_paused = true)]
    async fn test_one_line_per_successful_probe() {
        let mut out = Vec::new();
        run_loop(100, Duration::from_secs(1), &mut out, || async {
            Ok(ProbeSuccess {
                status: 200,
                response: Bytes::from("pong"),
                delay_ms: 42.0,
            })
        })
        .await;

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 100);
        assert!(lines.iter().all(|line| *line == "42.00"));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "broken pipe",
            ))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_survives_write_failures() {
        // A dead output stream must not abort the remaining probes.
        run_loop(3, Duration::from_secs(1), BrokenPipe, || async {
            Ok(ProbeSuccess {
                status: 200,
                response: Bytes::from("pong"),
                delay_ms: 1.0,
            })
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_probes_print_nothing() {
        let mut out = Vec::new();
        run_loop(3, Duration::from_secs(1), &mut out, || async {
            Err(ProbeError("connect failed".to_string()))
        })
        .await;

        assert!(out.is_empty());
    }
}
