//! Generation client against a mock inference endpoint.

use crate::integration::mock_server::{generation_body, MockServerFixture, GENERATE_PATH};
use artwork_poems::error_code::ErrorKind;
use artwork_poems::generation::SYSTEM_PROMPT;
use artwork_poems::PoemGenerator;
use mockito::Matcher;
use serde_json::json;

#[tokio::test]
async fn test_request_shape_and_verbatim_text() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .llm
        .mock("POST", GENERATE_PATH)
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::PartialJson(json!({
            "anthropic_version": "bedrock-2023-05-31",
            "system": SYSTEM_PROMPT,
            "max_tokens": 500,
            "top_k": 250,
            "stop_sequences": [],
            "messages": [{
                "role": "user",
                "content": [{
                    "type": "text",
                    "text": "<document>a bronze horse</document>\n\nWrite a short poem inspired by the artwork described by the <document>"
                }]
            }]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(generation_body("  Hooves of bronze\nstill running  "))
        .create_async()
        .await;

    let text = fixture.generator().generate("a bronze horse").await.unwrap();
    assert_eq!(text, "  Hooves of bronze\nstill running  ");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_is_generation_failed() {
    let mut fixture = MockServerFixture::new().await;
    let _m = fixture
        .mock_generation(500, r#"{"message":"internal"}"#)
        .await;

    let err = fixture.generator().generate("anything").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GenerationFailed);
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_empty_content_is_generation_failed() {
    let mut fixture = MockServerFixture::new().await;
    let _m = fixture
        .mock_generation(200, r#"{"content":[],"stop_reason":"end_turn"}"#)
        .await;

    let err = fixture.generator().generate("anything").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GenerationFailed);
}

#[tokio::test]
async fn test_unparseable_body_is_generation_failed() {
    let mut fixture = MockServerFixture::new().await;
    let _m = fixture.mock_generation(200, "not json").await;

    let err = fixture.generator().generate("anything").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GenerationFailed);
}

#[tokio::test]
async fn test_leading_non_text_block_is_generation_failed() {
    let mut fixture = MockServerFixture::new().await;
    let _m = fixture
        .mock_generation(
            200,
            r#"{"content":[{"type":"tool_use","id":"t1"},{"type":"text","text":"Quiet marble"}]}"#,
        )
        .await;

    let err = fixture.generator().generate("anything").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GenerationFailed);
}
