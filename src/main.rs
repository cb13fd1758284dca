use agent_workflow_backend::agents::{self, PitchPipeline, ShoppingAssistant};
use agent_workflow_backend::api::{self, AppContext};
use agent_workflow_backend::commerce::ucp::MerchantRegistry;
use agent_workflow_backend::config::Config;
use agent_workflow_backend::llm::{GeminiClient, ModelExecutor};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "agent_workflow_backend=debug,tower_http=debug".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let http = reqwest::Client::new();

    let registry = Arc::new(MerchantRegistry::new(http.clone(), &config.merchants));

    let executor: Arc<dyn ModelExecutor> = match &config.gemini_api_key {
        Some(key) => {
            tracing::info!(model = %config.model, "Using Gemini executor");
            Arc::new(GeminiClient::new(http, key.clone(), config.model.clone()))
        }
        None => {
            tracing::warn!("GEMINI_API_KEY not set; using the canned demo executor");
            agents::demo_executor().await
        }
    };

    tokio::fs::create_dir_all(&config.output_dir).await?;

    let pipeline = PitchPipeline::new(
        executor.clone(),
        config.output_dir.clone(),
        config.max_iterations,
    );
    let assistant = ShoppingAssistant::new(registry.clone(), executor, config.output_dir.clone());

    let context = Arc::new(AppContext {
        pipeline,
        assistant,
        registry,
        pipeline_timeout: Duration::from_secs(config.pipeline_timeout_secs),
    });

    let app = api::router(context);
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install shutdown handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}
