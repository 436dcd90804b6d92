use std::env;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    routing::{get, post},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;
use uuid::Uuid;

use jobboard_backend::middleware::auth::{issue_jwt, require_auth, require_resource};
use jobboard_backend::models::account::{Account, Resource, Role};
use jobboard_backend::services::mail_service::MailService;
use jobboard_backend::AppState;

async fn read_json(response: axum::response::Response) -> JsonValue {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

fn request(method: &str, uri: &str, bearer: Option<&str>, body: Option<JsonValue>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };
    builder.body(body).unwrap()
}

async fn seed_account(pool: &sqlx::PgPool, role: Role) -> Account {
    let id = Uuid::new_v4();
    let email = format!("seed_{}@example.com", id);
    sqlx::query(
        "INSERT INTO accounts (id, email, password_hash, role, is_active) VALUES ($1, $2, $3, $4, TRUE)",
    )
    .bind(id)
    .bind(&email)
    .bind("not-a-real-hash")
    .bind(role)
    .execute(pool)
    .await
    .expect("seed account");

    Account {
        id,
        email,
        password_hash: "not-a-real-hash".into(),
        role,
        is_active: true,
        created_at: Utc::now(),
    }
}

fn advert_payload(title: &str, skills: &str, deadline: chrono::NaiveDate) -> JsonValue {
    json!({
        "title": title,
        "company_name": "Initech",
        "description": "Work on the backend.",
        "employment_type": "full_time",
        "experience_level": "mid_level",
        "location_type": "remote",
        "location": "Berlin",
        "skills": skills,
        "deadline": deadline,
    })
}

#[tokio::test]
async fn advert_and_application_flow() {
    dotenvy::dotenv().ok();
    if env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL not set; skipping board_api_test");
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

    let public_api = Router::new()
        .route(
            "/api/adverts",
            get(jobboard_backend::routes::advert_routes::search_adverts),
        )
        .route(
            "/api/adverts/:id/apply",
            post(jobboard_backend::routes::application_routes::apply),
        );
    let company_api = Router::new()
        .route(
            "/api/company/adverts",
            get(jobboard_backend::routes::advert_routes::list_my_adverts)
                .post(jobboard_backend::routes::advert_routes::create_advert),
        )
        .route(
            "/api/company/adverts/:id",
            axum::routing::patch(jobboard_backend::routes::advert_routes::update_advert)
                .delete(jobboard_backend::routes::advert_routes::delete_advert),
        )
        .route(
            "/api/company/adverts/:id/applications",
            get(jobboard_backend::routes::application_routes::list_for_advert),
        )
        .route(
            "/api/company/applications/:id/decision",
            post(jobboard_backend::routes::application_routes::decide),
        )
        .layer(axum::middleware::from_fn_with_state(
            Resource::AdvertManagement,
            require_resource,
        ))
        .layer(axum::middleware::from_fn(require_auth));
    let app = public_api.merge(company_api).with_state(state);

    let owner = seed_account(&pool, Role::Company).await;
    let rival = seed_account(&pool, Role::Company).await;
    let candidate = seed_account(&pool, Role::Candidate).await;
    let owner_jwt = issue_jwt(&owner).expect("jwt");
    let rival_jwt = issue_jwt(&rival).expect("jwt");
    let candidate_jwt = issue_jwt(&candidate).expect("jwt");

    // Candidates cannot reach the advert-management surface at all.
    let resp = app
        .clone()
        .oneshot(request(
            "GET",
            "/api/company/adverts",
            Some(&candidate_jwt),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Unique marker keyword so search results are not polluted by other runs.
    let marker = format!("zx{}", Uuid::new_v4().simple());
    let future = (Utc::now() + Duration::days(30)).date_naive();
    let past = (Utc::now() - Duration::days(1)).date_naive();

    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/company/adverts",
            Some(&owner_jwt),
            Some(advert_payload("Backend Engineer", &marker, future)),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let first_advert = read_json(resp).await;

    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/company/adverts",
            Some(&owner_jwt),
            Some(advert_payload("Platform Engineer", &marker, future)),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let second_advert = read_json(resp).await;

    // Expired and unpublished adverts never show up on the board.
    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/company/adverts",
            Some(&owner_jwt),
            Some(advert_payload("Expired Engineer", &marker, past)),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let mut unpublished = advert_payload("Hidden Engineer", &marker, future);
    unpublished["is_published"] = JsonValue::from(false);
    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/company/adverts",
            Some(&owner_jwt),
            Some(unpublished),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/api/adverts?keyword={}", marker),
            None,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let found = read_json(resp).await;
    let found = found.as_array().unwrap();
    assert_eq!(found.len(), 2);
    assert!(found
        .iter()
        .all(|a| a["is_active"] == JsonValue::from(true)));
    // Newest first.
    assert_eq!(found[0]["id"], second_advert["id"]);
    assert_eq!(found[1]["id"], first_advert["id"]);

    // Location narrows the same result set.
    let resp = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/api/adverts?keyword={}&location=nowhere", marker),
            None,
            None,
        ))
        .await
        .unwrap();
    assert!(read_json(resp).await.as_array().unwrap().is_empty());

    let advert_id = first_advert["id"].as_str().unwrap().to_string();
    let apply_uri = format!("/api/adverts/{}/apply", advert_id);
    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            &apply_uri,
            None,
            Some(json!({
                "name": "Ada",
                "email": "ada@example.com",
                "portfolio_url": "https://ada.example.com",
                "cv": "https://cv.example.com/ada.pdf",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let application = read_json(resp).await;
    assert_eq!(application["status"], JsonValue::from("applied"));

    // Same address in a different case is still a duplicate.
    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            &apply_uri,
            None,
            Some(json!({
                "name": "Ada",
                "email": "ADA@Example.com",
                "portfolio_url": "https://ada.example.com",
                "cv": "https://cv.example.com/ada.pdf",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/api/company/adverts/{}/applications", advert_id),
            Some(&owner_jwt),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let applications = read_json(resp).await;
    assert_eq!(applications.as_array().unwrap().len(), 1);

    // Only the advert owner decides; a failed attempt leaves the status alone.
    let application_id = application["id"].as_str().unwrap();
    let decision_uri = format!("/api/company/applications/{}/decision", application_id);
    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            &decision_uri,
            Some(&rival_jwt),
            Some(json!({ "status": "rejected" })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(mail.sent().is_empty());

    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            &decision_uri,
            Some(&owner_jwt),
            Some(json!({ "status": "rejected" })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(read_json(resp).await["status"], JsonValue::from("rejected"));

    let sent = mail.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipients, vec!["ada@example.com".to_string()]);

    // Ownership also guards edits from other companies.
    let resp = app
        .clone()
        .oneshot(request(
            "PATCH",
            &format!("/api/company/adverts/{}", advert_id),
            Some(&rival_jwt),
            Some(json!({ "title": "Hijacked" })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = app
        .clone()
        .oneshot(request(
            "GET",
            "/api/company/adverts",
            Some(&owner_jwt),
            None,
        ))
        .await
        .unwrap();
    let mine = read_json(resp).await;
    let advert_row = mine
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["id"] == first_advert["id"])
        .expect("own advert listed");
    assert_eq!(advert_row["total_applications"], JsonValue::from(1));
}
