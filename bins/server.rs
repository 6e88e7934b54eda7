use configs::AppConfig;
use dotenvy::dotenv;
use tracing::{error, info, warn};
use uuid::Uuid;

fn load_config() -> (AppConfig, Option<anyhow::Error>) {
    match AppConfig::load_and_validate() {
        Ok(cfg) => (cfg, None),
        Err(file_err) => match AppConfig::from_env() {
            Ok(cfg) => (cfg, Some(file_err)),
            Err(env_err) => (AppConfig::default(), Some(env_err.context(file_err.to_string()))),
        },
    }
}

fn main() -> std::process::ExitCode {
    // Load .env first so RUST_LOG and INVENTORY_BASE_URL apply.
    dotenv().ok();
    let (config, config_err) = load_config();
    common::utils::logging::init_logging(config.logging.format);
    info!(service = "storefront_cart", event = "logger_init", "tracing subscriber initialized");
    if let Some(e) = config_err {
        warn!(error = %e, "config file unavailable; using defaults and environment");
    }

    let session_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "storefront_cart",
            event = "panic",
            %session_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = config.server.worker_threads { builder.worker_threads(w); }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "storefront_cart", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "storefront_cart",
        event = "start",
        %session_id,
        pid,
        version,
        "storefront cart starting"
    );

    rt.block_on(async move {
        let server_task = tokio::spawn(server::run(config));

        tokio::select! {
            res = server_task => {
                match res {
                    Ok(Ok(())) => {
                        info!(service = "storefront_cart", event = "stop", %session_id, pid, "server stopped normally");
                        std::process::ExitCode::SUCCESS
                    }
                    Ok(Err(e)) => {
                        error!(service = "storefront_cart", event = "run_failed", error = %e, "server::run returned error");
                        std::process::ExitCode::FAILURE
                    }
                    Err(e) => {
                        error!(service = "storefront_cart", event = "task_join_error", error = %e, "server task join error");
                        std::process::ExitCode::FAILURE
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                // Every accepted mutation is already persisted; nothing to flush.
                info!(service = "storefront_cart", event = "shutdown_signal", %session_id, pid, "received Ctrl+C, shutting down");
                std::process::ExitCode::SUCCESS
            }
        }
    })
}
