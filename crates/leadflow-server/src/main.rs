use axum::{extract::FromRef, middleware, routing::get, Json, Router};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod adapters;
mod application;
mod auth;
mod models;
mod routes;
mod services;

use adapters::{
    EngineNotifier, PgActivityRepository, PgAgentRepository, PgCallEventRepository,
    PgCursorRepository, PgLeadRepository, PgReminderRepository,
};
use application::{IngestService, LeadService, ReminderService, SweepService};
use leadflow::SlaConfig;
use leadflow_integration_slack::{SlackClient, SlackConfig};
use services::scheduler;

/// Type aliases for application services with concrete adapters
pub type AppLeadService = LeadService<
    PgLeadRepository,
    PgAgentRepository,
    PgCursorRepository,
    EngineNotifier,
    PgActivityRepository,
>;
pub type AppIngestService =
    IngestService<PgLeadRepository, PgAgentRepository, PgCallEventRepository, EngineNotifier>;
pub type AppSweepService = SweepService<
    PgLeadRepository,
    PgAgentRepository,
    PgCursorRepository,
    EngineNotifier,
    PgActivityRepository,
>;
pub type AppReminderService =
    ReminderService<PgReminderRepository, PgAgentRepository, EngineNotifier>;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub lead_service: Arc<AppLeadService>,
    pub ingest_service: Arc<AppIngestService>,
    pub sweep_service: Arc<AppSweepService>,
    pub reminder_service: Arc<AppReminderService>,
    /// HMAC secret for the telephony webhook, when configured
    pub webhook_secret: Option<String>,
}

// Allow extracting PgPool directly from AppState
impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> PgPool {
        state.pool.clone()
    }
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    message: String,
    version: String,
}

async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "Leadflow API is running - leads flow to the right agent on time".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    tracing::info!("🧭 Leadflow API initializing...");

    // Initialize API key from secrets
    if let Some(api_key) = secrets.get("LEADFLOW_API_KEY") {
        auth::init_api_key(api_key);
        tracing::info!("🔐 API key authentication enabled");
    } else {
        tracing::warn!("⚠️  No LEADFLOW_API_KEY set - authentication disabled");
    }

    // Run migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("✅ Database migrations completed");

    // SLA windows, overridable per deployment
    let sla_config = SlaConfig {
        claim_window_minutes: secrets
            .get("CLAIM_WINDOW_MINUTES")
            .and_then(|s| s.parse().ok())
            .unwrap_or(5),
        contact_window_minutes: secrets
            .get("CONTACT_WINDOW_MINUTES")
            .and_then(|s| s.parse().ok())
            .unwrap_or(240),
    };
    tracing::info!(
        "⏱️  SLA windows: claim {}m, contact {}m",
        sla_config.claim_window_minutes,
        sla_config.contact_window_minutes
    );

    // Slack channel if configured
    let slack = secrets.get("SLACK_BOT_TOKEN").map(|token| {
        let mut config = SlackConfig::new(token).with_username("Leadflow");
        if let Some(channel) = secrets.get("SLACK_DEFAULT_CHANNEL") {
            config = config.with_default_channel(channel);
        }
        tracing::info!("💬 Slack notifications enabled");
        SlackClient::new(config)
    });
    if slack.is_none() {
        tracing::warn!("⚠️  No SLACK_BOT_TOKEN set - chat notifications disabled");
    }

    // Email channel if configured
    let resend_api_key = secrets.get("RESEND_API_KEY");
    if resend_api_key.is_none() {
        tracing::warn!("⚠️  No RESEND_API_KEY set - email notifications disabled");
    }
    let from_address = secrets
        .get("EMAIL_FROM")
        .unwrap_or_else(|| "CRM Alerts <crm@notifications.delsolprimehomes.com>".to_string());

    // Adapters
    let lead_repo = Arc::new(PgLeadRepository::new(pool.clone()));
    let agent_repo = Arc::new(PgAgentRepository::new(pool.clone()));
    let cursor_repo = Arc::new(PgCursorRepository::new(pool.clone()));
    let call_repo = Arc::new(PgCallEventRepository::new(pool.clone()));
    let reminder_repo = Arc::new(PgReminderRepository::new(pool.clone()));
    let activity_repo = Arc::new(PgActivityRepository::new(pool.clone()));
    let notifier = Arc::new(EngineNotifier::new(
        pool.clone(),
        resend_api_key,
        from_address,
        slack,
    ));

    // Application services
    let lead_service = Arc::new(LeadService::new(
        lead_repo.clone(),
        agent_repo.clone(),
        cursor_repo.clone(),
        notifier.clone(),
        activity_repo.clone(),
        sla_config.clone(),
    ));
    let ingest_service = Arc::new(IngestService::new(
        lead_repo.clone(),
        agent_repo.clone(),
        call_repo,
        notifier.clone(),
    ));
    let sweep_service = Arc::new(SweepService::new(
        lead_repo,
        agent_repo.clone(),
        cursor_repo,
        notifier.clone(),
        activity_repo,
        sla_config,
    ));
    let reminder_service = Arc::new(ReminderService::new(reminder_repo, agent_repo, notifier));

    // Create application state
    let state = AppState {
        pool,
        lead_service,
        ingest_service,
        sweep_service: sweep_service.clone(),
        reminder_service: reminder_service.clone(),
        webhook_secret: secrets.get("PROVIDER_WEBHOOK_SECRET"),
    };

    // Background sweep loop; the HTTP trigger stays available either way
    let sweep_interval = secrets
        .get("SWEEP_INTERVAL_SECS")
        .and_then(|s| s.parse().ok());
    let _handle = scheduler::start_scheduler(sweep_service, reminder_service, sweep_interval);
    tracing::info!("📅 Sweep scheduler started");

    // Protected routes (require authentication)
    let protected_routes = Router::new()
        .merge(routes::leads::router())
        .merge(routes::sweep::router())
        .merge(routes::reminders::router())
        .layer(middleware::from_fn(auth::auth_middleware));

    // OpenAPI documentation
    let openapi = routes::swagger::ApiDoc::openapi();

    // Build router with shared state. The call webhook authenticates by
    // payload signature, not bearer token, so it sits outside the
    // protected group.
    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(routes::calls::router())
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .with_state(state);

    tracing::info!("📚 Swagger UI: /swagger-ui");
    tracing::info!("✅ Leadflow API ready - the clock is ticking");

    Ok(router.into())
}
