//! Server entry-point – Axum + Leptos SSR, with the JSON API merged in.

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use std::path::PathBuf;
    use std::sync::Arc;

    use anyhow::Context;
    use leptos::prelude::*;
    use tracing::info;

    use gallery_common::config::{self, Config};
    use gallery_server::store::Store;
    use gallery_web::app::{router, AppState};

    // ── Tracing ──────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "gallery_web=info,gallery_server=info,tower_http=info".into()
            }),
        )
        .init();

    // ── Configuration ────────────────────────────────────────────────────
    let config_path =
        std::env::var("GALLERY_CONFIG").unwrap_or_else(|_| Config::default_path().to_string());
    let config = config::load(&PathBuf::from(&config_path)).context("Config load failed")?;

    let conf = get_configuration(None).context("Cannot read Leptos configuration")?;
    let leptos_options = conf.leptos_options;
    let addr = leptos_options.site_addr;

    let store = Arc::new(Store::from_config(&config).context("Cannot initialise image store")?);

    let state = AppState {
        store,
        config: Arc::new(config),
    };
    let app = router(state, leptos_options);

    info!("Gallery Web listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Cannot bind {addr}"))?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gallery Web stopped");
    Ok(())
}

#[cfg(feature = "ssr")]
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(not(feature = "ssr"))]
fn main() {
    // This binary is only built with the `ssr` feature.
    // The WASM entry point is `lib::hydrate()`.
}
