use std::time::Duration;

use sockprobe::config::app_config::load_config;
use sockprobe::driver::run_loop;
use sockprobe::http_probe::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = load_config().expect("Failed to load probe config");

    log::info!(
        "Probing {} ({} iterations, {}s interval)",
        config.url,
        config.count,
        config.interval_seconds
    );
    if let Some(path) = &config.unix_socket {
        log::info!("Transport override: unix socket {}", path.display());
    }
    if !config.verify_tls {
        log::warn!("TLS certificate and hostname verification are DISABLED");
    }

    let prober = Prober::new(ProberConfig {
        transport: config.transport(),
        verify_tls: config.verify_tls,
        timeout: config.timeout(),
    })
    .expect("Failed to build prober");

    run_loop(
        config.count,
        Duration::from_secs(config.interval_seconds),
        std::io::stdout(),
        || prober.probe(&config.url, &config.method, &config.body, &config.headers),
    )
    .await;
}
