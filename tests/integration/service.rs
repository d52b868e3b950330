//! End to end: HTTP router over the pipeline, mock collaborators, real stores.

use crate::integration::mock_server::{
    catalog_body, generation_body, MockServerFixture, GENERATE_PATH,
};
use artwork_poems::api::{build_router, AppState, ErrorResponse, PoemResponse};
use artwork_poems::{LookupKey, Poem, PoemStore};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use std::sync::Arc;
use tower::ServiceExt;

async fn get(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_first_request_generates_then_cache_serves() {
    let mut fixture = MockServerFixture::new().await;
    let catalog = fixture
        .catalog
        .mock("GET", "/artworks/160729")
        .with_status(200)
        .with_body(catalog_body(160729, "1916.1018"))
        .expect(1)
        .create_async()
        .await;
    let llm = fixture
        .llm
        .mock("POST", GENERATE_PATH)
        .with_status(200)
        .with_body(generation_body("Stone eyes watch..."))
        .expect(1)
        .create_async()
        .await;

    let (pipeline, store) = fixture.memory_pipeline();
    let app = build_router(AppState::new(Arc::new(pipeline)));

    let (status, body) = get(&app, "/poem?id=160729").await;
    assert_eq!(status, StatusCode::OK);
    let poem: PoemResponse = serde_json::from_value(body).unwrap();
    assert_eq!(
        poem,
        PoemResponse {
            poem: "Stone eyes watch...".into(),
            id: "160729".into(),
            accession_number: "1916.1018".into(),
        }
    );
    assert_eq!(
        store
            .lookup(&LookupKey::PrimaryId("160729".into()))
            .await
            .unwrap(),
        Some(Poem::new("160729", "1916.1018", "Stone eyes watch..."))
    );

    let (status, again) = get(&app, "/poem?id=160729").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["poem"], "Stone eyes watch...");

    catalog.assert_async().await;
    llm.assert_async().await;
}

#[tokio::test]
async fn test_accession_request_keys_store_by_artwork_id() {
    let mut fixture = MockServerFixture::new().await;
    let _by_accession = fixture
        .mock_artwork("1916.1018", 200, &catalog_body(160729, "1916.1018"))
        .await;
    let by_id = fixture
        .catalog
        .mock("GET", "/artworks/160729")
        .expect(0)
        .create_async()
        .await;
    let _llm = fixture
        .mock_generation_for("1916.1018", "Marble remembers")
        .await;

    let (pipeline, store) = fixture.memory_pipeline();
    let app = build_router(AppState::new(Arc::new(pipeline)));

    let (status, body) = get(&app, "/poem?id=1916.1018").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "160729");
    assert_eq!(body["accessionNumber"], "1916.1018");

    let (status, body) = get(&app, "/poem?id=160729").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["poem"], "Marble remembers");
    assert_eq!(store.len().await, 1);
    by_id.assert_async().await;
}

#[tokio::test]
async fn test_missing_or_blank_id_is_bad_request() {
    let fixture = MockServerFixture::new().await;
    let (pipeline, _store) = fixture.memory_pipeline();
    let app = build_router(AppState::new(Arc::new(pipeline)));

    for uri in ["/poem", "/poem?id=", "/poem?id=%20%20", "/poem?id=1&id=2"] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        let err: ErrorResponse = serde_json::from_value(body).unwrap();
        assert_eq!(err.code, "E1001");
    }
}

#[tokio::test]
async fn test_catalog_failure_maps_to_bad_gateway() {
    let mut fixture = MockServerFixture::new().await;
    let _m = fixture.mock_artwork("42", 503, "busy").await;
    let llm = fixture
        .llm
        .mock("POST", GENERATE_PATH)
        .expect(0)
        .create_async()
        .await;

    let (pipeline, store) = fixture.memory_pipeline();
    let app = build_router(AppState::new(Arc::new(pipeline)));

    let (status, body) = get(&app, "/poem?id=42").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "E2001");
    assert!(body.get("poem").is_none());
    assert!(body.get("id").is_none());
    assert!(store.is_empty().await);
    llm.assert_async().await;
}

#[tokio::test]
async fn test_generation_failure_persists_nothing() {
    let mut fixture = MockServerFixture::new().await;
    let _c = fixture
        .mock_artwork("160729", 200, &catalog_body(160729, "1916.1018"))
        .await;
    let _g = fixture.mock_generation(500, "boom").await;

    let (pipeline, store) = fixture.memory_pipeline();
    let app = build_router(AppState::new(Arc::new(pipeline)));

    let (status, body) = get(&app, "/poem?id=160729").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "E2003");
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_health_reports_store_and_counters() {
    let mut fixture = MockServerFixture::new().await;
    let _c = fixture
        .mock_artwork("160729", 200, &catalog_body(160729, "1916.1018"))
        .await;
    let _g = fixture
        .mock_generation(200, &generation_body("Stone eyes watch..."))
        .await;

    let (pipeline, _store) = fixture.memory_pipeline();
    let app = build_router(AppState::new(Arc::new(pipeline)));
    get(&app, "/poem?id=160729").await;
    get(&app, "/poem?id=160729").await;

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
    assert_eq!(body["stats"]["hits"], 1);
    assert_eq!(body["stats"]["misses"], 1);
    assert_eq!(body["stats"]["generated"], 1);
}

#[cfg(feature = "sqlite")]
#[tokio::test]
async fn test_sqlite_backed_service() {
    use artwork_poems::SqlitePoemStore;
    use sqlx::sqlite::SqlitePoolOptions;

    let mut fixture = MockServerFixture::new().await;
    let _c = fixture
        .mock_artwork("160729", 200, &catalog_body(160729, "1916.1018"))
        .await;
    let llm = fixture
        .llm
        .mock("POST", GENERATE_PATH)
        .with_status(200)
        .with_body(generation_body("Stone eyes watch..."))
        .expect(1)
        .create_async()
        .await;

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let store = SqlitePoemStore::from_pool(pool, "poems").unwrap();
    store.migrate().await.unwrap();
    let store = Arc::new(store);

    let app = build_router(AppState::new(Arc::new(fixture.pipeline(store.clone()))));
    let (status, _) = get(&app, "/poem?id=160729").await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = get(&app, "/poem?id=1916.1018").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["poem"], "Stone eyes watch...");

    assert_eq!(
        store
            .lookup(&LookupKey::AccessionNumber("1916.1018".into()))
            .await
            .unwrap()
            .map(|p| p.id),
        Some("160729".to_string())
    );
    llm.assert_async().await;
}
