//! Mock HTTP server setup for integration tests

use artwork_poems::{
    ClevelandArtSource, GenerationPipeline, HttpPoemGenerator, MemoryPoemStore, PoemStore,
};
use mockito::{Matcher, Mock, Server, ServerGuard};
use std::sync::Arc;

pub const TEST_MODEL: &str = "test-model";
pub const GENERATE_PATH: &str = "/model/test-model/invoke";

/// Catalog body for the Jacques-Louis David bust used across tests.
pub fn catalog_body(id: u64, accession_number: &str) -> String {
    serde_json::json!({
        "data": {
            "id": id,
            "accession_number": accession_number,
            "title": "Portrait bust",
            "description": "A marble bust with a steady gaze."
        }
    })
    .to_string()
}

pub fn generation_body(text: &str) -> String {
    serde_json::json!({
        "id": "msg_01",
        "type": "message",
        "role": "assistant",
        "content": [{"type": "text", "text": text}],
        "stop_reason": "end_turn"
    })
    .to_string()
}

/// One mock catalog server plus one mock generation server.
pub struct MockServerFixture {
    pub catalog: ServerGuard,
    pub llm: ServerGuard,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        Self {
            catalog: Server::new_async().await,
            llm: Server::new_async().await,
        }
    }

    pub fn source(&self) -> ClevelandArtSource {
        ClevelandArtSource::builder()
            .base_url(self.catalog.url())
            .http_client(reqwest::Client::new())
            .build()
            .expect("catalog client")
    }

    pub fn generator(&self) -> HttpPoemGenerator {
        HttpPoemGenerator::builder()
            .endpoint(format!("{}/model/{{model}}/invoke", self.llm.url()))
            .model(TEST_MODEL)
            .api_key("test-key")
            .http_client(reqwest::Client::new())
            .build()
            .expect("generation client")
    }

    pub fn pipeline(&self, store: Arc<dyn PoemStore>) -> GenerationPipeline {
        GenerationPipeline::new(Arc::new(self.source()), Arc::new(self.generator()), store)
    }

    pub fn memory_pipeline(&self) -> (GenerationPipeline, Arc<MemoryPoemStore>) {
        let store = Arc::new(MemoryPoemStore::new());
        (self.pipeline(store.clone()), store)
    }

    pub async fn mock_artwork(&mut self, path_id: &str, status: usize, body: &str) -> Mock {
        self.catalog
            .mock("GET", format!("/artworks/{}", path_id).as_str())
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    pub async fn mock_generation(&mut self, status: usize, body: &str) -> Mock {
        self.llm
            .mock("POST", GENERATE_PATH)
            .match_header("authorization", "Bearer test-key")
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// Generation mock that only answers requests carrying `fragment` in the prompt.
    pub async fn mock_generation_for(&mut self, fragment: &str, text: &str) -> Mock {
        self.llm
            .mock("POST", GENERATE_PATH)
            .match_body(Matcher::Regex(regex::escape(fragment)))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(generation_body(text))
            .create_async()
            .await
    }
}
