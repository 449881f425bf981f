use payments_intake_gateway::config::{
    AppConfig, HealthStoreBackend, PaymentStoreBackend, ProcessorClientBackend,
};
use payments_intake_gateway::health::prober::HealthProber;
use payments_intake_gateway::health::store_memory::HealthStoreMemory;
use payments_intake_gateway::health::store_redis::HealthStoreRedis;
use payments_intake_gateway::health::{HealthStateStore, HealthTtls};
use payments_intake_gateway::processors::http::HttpProcessorClient;
use payments_intake_gateway::processors::mock::MockProcessorClient;
use payments_intake_gateway::processors::ProcessorClient;
use payments_intake_gateway::repo::payments_memory::PaymentsMemoryStore;
use payments_intake_gateway::repo::payments_repo::{PaymentStore, PgPaymentsRepo};
use payments_intake_gateway::router::selector::ProcessorSelector;
use payments_intake_gateway::service::dispatcher::{PaymentDispatcher, PaymentForwarder};
use payments_intake_gateway::AppState;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();

    let payment_store: Arc<dyn PaymentStore> = match cfg.payment_store {
        PaymentStoreBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(cfg.db_max_connections)
                .connect(&cfg.database_url)
                .await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            Arc::new(PgPaymentsRepo { pool })
        }
        PaymentStoreBackend::Memory => Arc::new(PaymentsMemoryStore::new()),
    };

    let ttls = HealthTtls::from_interval(cfg.health_check_interval);
    let health_store: Arc<dyn HealthStateStore> = match cfg.health_store {
        HealthStoreBackend::Redis => Arc::new(HealthStoreRedis::new(&cfg.redis_url, ttls)?),
        HealthStoreBackend::Memory => Arc::new(HealthStoreMemory::new(ttls)),
    };

    let client: Arc<dyn ProcessorClient> = match cfg.processor_client {
        ProcessorClientBackend::Http => Arc::new(HttpProcessorClient::new(
            &cfg.default_processor_url,
            &cfg.fallback_processor_url,
            reqwest::Client::builder()
                .pool_max_idle_per_host(64)
                .build()?,
        )),
        ProcessorClientBackend::Mock => {
            tracing::warn!("PROCESSOR_CLIENT=mock, payments are not sent to any processor");
            Arc::new(MockProcessorClient::new())
        }
    };

    let prober = HealthProber::new(health_store.clone(), client.clone(), cfg.probe_timeout);
    let forwarder = PaymentForwarder {
        selector: ProcessorSelector::new(health_store.clone(), prober),
        client,
        health_store: health_store.clone(),
        payment_store: payment_store.clone(),
        forward_timeout: cfg.forward_timeout,
    };
    let (dispatcher, workers) = PaymentDispatcher::spawn(forwarder, cfg.dispatch_workers);

    let state = AppState {
        dispatcher,
        payment_store,
        health_store,
    };

    let app = payments_intake_gateway::http::routes::app(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!(
        "listening on {} ({} dispatch workers, health interval {:?})",
        cfg.bind_addr,
        cfg.dispatch_workers,
        cfg.health_check_interval
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("draining dispatch queue");
    workers.join().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
