//! snac-server — standalone binary wiring the core to stub collaborators.
//!
//! Reads config from:
//!   SNAC_CONFIG  — path to a YAML config file (default: ./snac.yaml)
//!   SNAC_ADDRESS — overrides `address` from the config file
//!   SNAC_PORT    — overrides `port` from the config file

use std::sync::Arc;

use anyhow::Context as _;
use snac_core::collaborators::UserProfile;
use snac_core::config::Config;
use snac_core::context::ContextBuilder;
use snac_core::diagnostics::TracingDiagnostics;
use snac_core::lifecycle::Server;
use snac_core::stubs::{
    DecliningActivityPub, DecliningHtml, DecliningMastoApi, DecliningOAuth, DecliningWebFinger,
    EmptyInstanceTimeline, InMemoryUserDirectory, NoopQueueProcessor,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,snac_core=debug".into()),
        )
        .init();

    let config_path = std::env::var("SNAC_CONFIG").unwrap_or_else(|_| "snac.yaml".to_string());
    let config = Config::from_yaml_file(&config_path)
        .with_context(|| format!("failed to load config from {config_path}"))?;

    tracing::info!("Starting snac-core on {}:{}", config.address, config.port);

    // Wire in the stand-in collaborators. A production deployment replaces
    // these with real ActivityPub/WebFinger/Mastodon/HTML/user-store
    // implementations behind the same trait objects.
    let users = InMemoryUserDirectory::new(vec![UserProfile {
        uid: "admin".to_string(),
        actor_url: format!("{}/admin", config.base_url),
        display_name: "Administrator".to_string(),
    }]);

    let ctx = ContextBuilder::new(
        Arc::new(config),
        Arc::new(TracingDiagnostics::new()),
        Arc::new(users),
        Arc::new(EmptyInstanceTimeline),
        Arc::new(DecliningWebFinger),
        Arc::new(DecliningActivityPub),
        Arc::new(DecliningOAuth),
        Arc::new(DecliningMastoApi),
        Arc::new(DecliningHtml),
        Arc::new(NoopQueueProcessor),
    )
    .build();

    let server = Server::bind(Arc::new(ctx)).context("failed to bind listening socket")?;
    server
        .install_signal_handlers()
        .context("failed to install signal handlers")?;
    server.run().context("server loop failed")?;

    Ok(())
}
