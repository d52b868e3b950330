//! Catalog client against a mock catalog.

use crate::integration::mock_server::{catalog_body, MockServerFixture};
use artwork_poems::error_code::ErrorKind;
use artwork_poems::ArtworkSource;

#[tokio::test]
async fn test_fetch_by_primary_id() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_artwork("160729", 200, &catalog_body(160729, "1916.1018"))
        .await;

    let artwork = fixture.source().fetch("160729").await.unwrap();
    assert_eq!(artwork.id, 160729);
    assert_eq!(artwork.accession_number, "1916.1018");
    assert_eq!(
        artwork.description.as_deref(),
        Some("A marble bust with a steady gaze.")
    );
    assert!(artwork.description_blob().contains("Portrait bust"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_by_accession_number() {
    let mut fixture = MockServerFixture::new().await;
    let _m = fixture
        .mock_artwork("1916.1018", 200, &catalog_body(160729, "1916.1018"))
        .await;

    let artwork = fixture.source().fetch("1916.1018").await.unwrap();
    assert_eq!(artwork.primary_id(), "160729");
}

#[tokio::test]
async fn test_identifier_is_path_encoded() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_artwork("1916%2F10", 200, &catalog_body(7, "1916/10"))
        .await;

    let artwork = fixture.source().fetch("1916/10").await.unwrap();
    assert_eq!(artwork.accession_number, "1916/10");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_not_found_is_upstream_unavailable() {
    let mut fixture = MockServerFixture::new().await;
    let _m = fixture
        .mock_artwork("999999999", 404, r#"{"detail":"not found"}"#)
        .await;

    let err = fixture.source().fetch("999999999").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_malformed_body_is_upstream_malformed() {
    let mut fixture = MockServerFixture::new().await;
    let _m = fixture.mock_artwork("1", 200, "<html>oops</html>").await;
    let _n = fixture.mock_artwork("2", 200, r#"{"data":{"title":"no ids"}}"#).await;

    let source = fixture.source();
    assert_eq!(
        source.fetch("1").await.unwrap_err().kind(),
        ErrorKind::UpstreamMalformed
    );
    assert_eq!(
        source.fetch("2").await.unwrap_err().kind(),
        ErrorKind::UpstreamMalformed
    );
}

#[tokio::test]
async fn test_unreachable_catalog_is_upstream_unavailable() {
    let source = artwork_poems::ClevelandArtSource::builder()
        .base_url("http://127.0.0.1:9/")
        .http_client(reqwest::Client::new())
        .build()
        .unwrap();

    let err = source.fetch("160729").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);
}
