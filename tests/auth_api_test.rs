use std::env;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;
use uuid::Uuid;

use jobboard_backend::services::mail_service::MailService;
use jobboard_backend::AppState;

async fn read_json(response: axum::response::Response) -> JsonValue {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

fn post_json(uri: &str, body: JsonValue) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn registration_and_password_reset_flow() {
    dotenvy::dotenv().ok();
    if env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL not set; skipping auth_api_test");
        return;
    }
    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("JWT_SECRET", "test_secret_key");

    jobboard_backend::config::init_config().expect("init config");
    let pool = jobboard_backend::database::pool::create_pool()
        .await
        .expect("pool");
    sqlx::migrate!("./migrations").run(&pool).await.expect("migrations");

    let mail = MailService::memory();
    let state = AppState::new(pool.clone(), mail.clone());

    let app = Router::new()
        .route(
            "/api/auth/register",
            post(jobboard_backend::routes::account_routes::register),
        )
        .route(
            "/api/auth/verify",
            post(jobboard_backend::routes::account_routes::verify_account),
        )
        .route(
            "/api/auth/login",
            post(jobboard_backend::routes::account_routes::login),
        )
        .route(
            "/api/auth/forgot-password",
            post(jobboard_backend::routes::account_routes::forgot_password),
        )
        .route(
            "/api/auth/reset-password",
            get(jobboard_backend::routes::account_routes::validate_reset_token)
                .post(jobboard_backend::routes::account_routes::reset_password),
        )
        .with_state(state);

    let email = format!("cand_{}@example.com", Uuid::new_v4());

    // Register twice: the second request replaces the pending record, so
    // only the newest code can confirm.
    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/auth/register",
            json!({ "email": email, "password": "hunter2hunter2", "role": "candidate" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let first_code = mail.sent().last().unwrap().context["code"]
        .as_str()
        .unwrap()
        .to_string();

    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/auth/register",
            json!({ "email": email, "password": "hunter2hunter2", "role": "candidate" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let second_code = mail.sent().last().unwrap().context["code"]
        .as_str()
        .unwrap()
        .to_string();
    assert_ne!(first_code, second_code);

    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/auth/verify",
            json!({ "email": email, "code": first_code }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/auth/verify",
            json!({ "email": email, "code": second_code }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;
    assert!(body["token"].as_str().is_some());
    assert_eq!(body["account"]["email"], JsonValue::from(email.clone()));

    // The pending record was consumed, so the same code cannot confirm twice.
    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/auth/verify",
            json!({ "email": email, "code": second_code }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            json!({ "email": email, "password": "hunter2hunter2" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Request a reset twice: the first secret must stop validating.
    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/auth/forgot-password",
            json!({ "email": email }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let first_secret = mail.sent().last().unwrap().context["token"]
        .as_str()
        .unwrap()
        .to_string();

    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/auth/forgot-password",
            json!({ "email": email }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let second_secret = mail.sent().last().unwrap().context["token"]
        .as_str()
        .unwrap()
        .to_string();
    assert_ne!(first_secret, second_secret);

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!(
                    "/api/auth/reset-password?email={}&token={}",
                    email, first_secret
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(read_json(resp).await["valid"], JsonValue::from(false));

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!(
                    "/api/auth/reset-password?email={}&token={}",
                    email, second_secret
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(read_json(resp).await["valid"], JsonValue::from(true));

    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/auth/reset-password",
            json!({ "email": email, "token": second_secret, "new_password": "s3cure-enough" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // A consumed token always fails afterwards.
    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/auth/reset-password",
            json!({ "email": email, "token": second_secret, "new_password": "another-pass" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            json!({ "email": email, "password": "s3cure-enough" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(post_json(
            "/api/auth/login",
            json!({ "email": email, "password": "hunter2hunter2" }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
