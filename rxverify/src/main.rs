use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rxverify::api::{create_router, AppState};
use rxverify::config::Config;
use rxverify::extraction::VisionProvider;
use rxverify::llm::LlmProvider;
use rxverify::speech::SpeechProvider;
use rxverify::verification::{HttpRegistryClient, RegistryLookup};

#[derive(Parser)]
#[command(name = "rxverify")]
#[command(about = "Prescription intake backend")]
struct Args {
    /// Load environment from this file instead of ./.env
    #[arg(long)]
    env_file: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match &args.env_file {
        Some(path) => {
            dotenvy::from_path(path)?;
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rxverify=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    tracing::info!("Initializing register client...");
    let registry: Arc<dyn RegistryLookup> = Arc::new(HttpRegistryClient::new(&config.registry)?);

    tracing::info!("Initializing vision provider: {}...", config.vision.model);
    let vision = VisionProvider::new(&config.vision)?;
    if !vision.is_available() {
        tracing::warn!("Vision unavailable - prescription uploads will be rejected");
    }

    if let Some(llm_config) = &config.llm {
        tracing::info!("Initializing LLM provider: {}...", llm_config.model);
    }
    let llm = LlmProvider::new(config.llm.as_ref());
    if !llm.is_available() {
        tracing::warn!("LLM unavailable - chat and medicine screening will be disabled");
    }

    let speech = match &config.speech {
        Some(speech_config) => {
            tracing::info!("Initializing speech provider: {}...", speech_config.model);
            SpeechProvider::new(speech_config)?
        }
        None => SpeechProvider::unavailable("SPEECH_MODEL is not set"),
    };
    if !speech.is_available() {
        tracing::warn!("Speech unavailable - chat will be text-only");
    }

    let state = AppState::new(config.clone(), registry, vision, llm, speech);

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Rxverify starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/api/v1/health", addr);
    tracing::info!("  API docs:     http://{}/api/v1/docs", addr);
    tracing::info!("  OpenAPI spec: http://{}/api/v1/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
