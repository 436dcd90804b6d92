use axum::{
    routing::{get, post},
    Router,
};
use jobboard_backend::{
    config::{get_config, init_config},
    database::{pool::create_pool, seed::seed},
    middleware::auth::{require_auth, require_resource},
    models::account::Resource,
    routes,
    services::mail_service::MailService,
    AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jobboard_backend=info,tower_http=info".into()),
        )
        .init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    seed(&pool, config).await?;

    let mail_service = MailService::from_config(config)?;
    let app_state = AppState::new(pool, mail_service);

    let base_routes = Router::new().route("/health", get(routes::health::health));

    // Unauthenticated surface: registration, login, the advert board, intake.
    let public_api = Router::new()
        .route("/api/auth/register", post(routes::account_routes::register))
        .route(
            "/api/auth/verify",
            post(routes::account_routes::verify_account),
        )
        .route("/api/auth/login", post(routes::account_routes::login))
        .route(
            "/api/auth/forgot-password",
            post(routes::account_routes::forgot_password),
        )
        .route(
            "/api/auth/reset-password",
            get(routes::account_routes::validate_reset_token)
                .post(routes::account_routes::reset_password),
        )
        .route("/api/adverts", get(routes::advert_routes::search_adverts))
        .route(
            "/api/adverts/:id",
            get(routes::advert_routes::get_advert),
        )
        .route(
            "/api/adverts/:id/apply",
            post(routes::application_routes::apply),
        );

    let company_api = Router::new()
        .route(
            "/api/company/adverts",
            get(routes::advert_routes::list_my_adverts).post(routes::advert_routes::create_advert),
        )
        .route(
            "/api/company/adverts/:id",
            axum::routing::patch(routes::advert_routes::update_advert)
                .delete(routes::advert_routes::delete_advert),
        )
        .route(
            "/api/company/adverts/:id/publish",
            post(routes::advert_routes::publish_advert),
        )
        .route(
            "/api/company/adverts/:id/applications",
            get(routes::application_routes::list_for_advert),
        )
        .route(
            "/api/company/applications/:id/decision",
            post(routes::application_routes::decide),
        )
        .layer(axum::middleware::from_fn_with_state(
            Resource::AdvertManagement,
            require_resource,
        ))
        .layer(axum::middleware::from_fn(require_auth));

    let candidate_api = Router::new()
        .route(
            "/api/quiz/categories",
            get(routes::quiz_routes::list_categories),
        )
        .route(
            "/api/quiz/categories/:id/attempt",
            get(routes::quiz_routes::start_attempt).post(routes::quiz_routes::submit_attempt),
        )
        .route(
            "/api/quiz/results",
            get(routes::quiz_routes::list_my_results),
        )
        .route(
            "/api/quiz/results/:id",
            get(routes::quiz_routes::get_result),
        )
        .layer(axum::middleware::from_fn_with_state(
            Resource::QuizTaking,
            require_resource,
        ))
        .layer(axum::middleware::from_fn(require_auth));

    // Any authenticated account may look up its own applications.
    let account_api = Router::new()
        .route(
            "/api/applications/mine",
            get(routes::application_routes::my_applications),
        )
        .layer(axum::middleware::from_fn(require_auth));

    let admin_api = Router::new()
        .route(
            "/api/admin/questions",
            get(routes::admin_routes::list_questions).post(routes::admin_routes::create_question),
        )
        .route(
            "/api/admin/questions/:id",
            axum::routing::patch(routes::admin_routes::update_question)
                .delete(routes::admin_routes::delete_question),
        )
        .route(
            "/api/admin/categories",
            get(routes::quiz_routes::list_categories),
        )
        .route(
            "/api/admin/companies",
            get(routes::admin_routes::list_companies),
        )
        .route(
            "/api/admin/candidates",
            get(routes::admin_routes::list_candidates),
        )
        .layer(axum::middleware::from_fn_with_state(
            Resource::AdminPanel,
            require_resource,
        ))
        .layer(axum::middleware::from_fn(require_auth));

    let app = base_routes
        .merge(public_api)
        .merge(company_api)
        .merge(candidate_api)
        .merge(account_api)
        .merge(admin_api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
