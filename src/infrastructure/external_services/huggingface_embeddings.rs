use std::time::Duration;

use async_trait::async_trait;
use pgvector::Vector;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::ports::embedding_provider::{
    BatchEmbeddingRequest, BatchEmbeddingResponse, EmbeddingProvider, EmbeddingProviderError,
    EmbeddingRequest, EmbeddingResponse,
};

pub const DEFAULT_EMBEDDINGS_BASE_URL: &str = "https://router.huggingface.co/hf-inference/models";
pub const DEFAULT_EMBEDDINGS_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

#[derive(Serialize)]
struct FeatureExtractionRequest<'a> {
    inputs: &'a [String],
    options: RequestOptions,
}

#[derive(Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

/// Sentence-transformer models return one pooled vector per input; plain
/// transformer models return per-token vectors that are mean-pooled here.
#[derive(Deserialize)]
#[serde(untagged)]
enum FeatureExtractionResponse {
    Pooled(Vec<Vec<f32>>),
    TokenLevel(Vec<Vec<Vec<f32>>>),
}

impl FeatureExtractionResponse {
    fn into_vectors(self) -> Vec<Vec<f32>> {
        match self {
            FeatureExtractionResponse::Pooled(vectors) => vectors,
            FeatureExtractionResponse::TokenLevel(inputs) => {
                inputs.into_iter().map(|tokens| mean_pool(&tokens)).collect()
            }
        }
    }
}

fn mean_pool(tokens: &[Vec<f32>]) -> Vec<f32> {
    let Some(first) = tokens.first() else {
        return Vec::new();
    };
    let mut pooled = vec![0.0; first.len()];
    for token in tokens {
        for (sum, value) in pooled.iter_mut().zip(token) {
            *sum += value;
        }
    }
    let count = tokens.len() as f32;
    pooled.iter_mut().for_each(|sum| *sum /= count);
    pooled
}

#[derive(Debug, Clone)]
pub struct HuggingFaceConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub max_retries: u32,
    pub timeout_secs: u64,
    pub backoff_factor: f64,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_EMBEDDINGS_BASE_URL.to_string(),
            model: DEFAULT_EMBEDDINGS_MODEL.to_string(),
            api_key: None,
            max_retries: 2,
            timeout_secs: 30,
            backoff_factor: 1.5,
        }
    }
}

/// Embeddings through the Hugging Face feature-extraction pipeline.
pub struct HuggingFaceEmbeddingProvider {
    client: Client,
    config: HuggingFaceConfig,
    endpoint: String,
}

impl HuggingFaceEmbeddingProvider {
    pub fn new(config: HuggingFaceConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let endpoint = format!(
            "{}/{}/pipeline/feature-extraction",
            config.base_url.trim_end_matches('/'),
            config.model
        );

        Ok(Self {
            client,
            config,
            endpoint,
        })
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut attempts = 0;
        loop {
            attempts += 1;

            match self.execute_request(texts).await {
                Ok(vectors) => return Ok(vectors),
                Err(e) if attempts <= self.config.max_retries && is_retryable(&e) => {
                    let backoff_time = Duration::from_millis(
                        (self.config.backoff_factor.powi(attempts as i32 - 1) * 1000.0) as u64,
                    );
                    warn!(
                        "Embedding request failed (attempt {}): {}. Retrying in {:?}",
                        attempts, e, backoff_time
                    );
                    tokio::time::sleep(backoff_time).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn execute_request(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingProviderError> {
        let body = FeatureExtractionRequest {
            inputs: texts,
            options: RequestOptions {
                wait_for_model: true,
            },
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| EmbeddingProviderError::NetworkError(e.without_url().to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(EmbeddingProviderError::RateLimitExceeded);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmbeddingProviderError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let parsed = response
            .json::<FeatureExtractionResponse>()
            .await
            .map_err(|e| EmbeddingProviderError::MalformedResponse(e.to_string()))?;

        let vectors = parsed.into_vectors();
        debug!("Received {} embeddings from {}", vectors.len(), self.config.model);
        Ok(vectors)
    }
}

fn is_retryable(error: &EmbeddingProviderError) -> bool {
    match error {
        EmbeddingProviderError::NetworkError(_) => true,
        EmbeddingProviderError::ApiError { status, .. } => *status >= 500,
        _ => false,
    }
}

#[async_trait]
impl EmbeddingProvider for HuggingFaceEmbeddingProvider {
    async fn generate_embedding(
        &self,
        request: EmbeddingRequest,
    ) -> Result<EmbeddingResponse, EmbeddingProviderError> {
        if request.text.trim().is_empty() {
            return Err(EmbeddingProviderError::InvalidInput(
                "Cannot embed empty text".to_string(),
            ));
        }

        let mut vectors = self.embed(std::slice::from_ref(&request.text)).await?;
        if vectors.len() != 1 {
            return Err(EmbeddingProviderError::MalformedResponse(format!(
                "expected 1 vector, received {}",
                vectors.len()
            )));
        }

        Ok(EmbeddingResponse {
            embedding: Vector::from(vectors.remove(0)),
        })
    }

    async fn generate_embeddings(
        &self,
        request: BatchEmbeddingRequest,
    ) -> Result<BatchEmbeddingResponse, EmbeddingProviderError> {
        let vectors = self.embed(&request.texts).await?;

        Ok(BatchEmbeddingResponse {
            embeddings: vectors.into_iter().map(Vector::from).collect(),
        })
    }

    fn model_info(&self) -> (String, Option<String>) {
        (self.config.model.clone(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode as AxumStatus, routing::post};
    use serde_json::{Value, json};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", address)
    }

    fn provider(base_url: String) -> HuggingFaceEmbeddingProvider {
        HuggingFaceEmbeddingProvider::new(HuggingFaceConfig {
            base_url,
            model: "test/model".to_string(),
            api_key: Some("hf_test".to_string()),
            max_retries: 0,
            timeout_secs: 5,
            backoff_factor: 1.0,
        })
        .unwrap()
    }

    #[test]
    fn test_token_level_output_is_mean_pooled() {
        let parsed: FeatureExtractionResponse =
            serde_json::from_value(json!([[[1.0, 2.0], [3.0, 4.0]]])).unwrap();

        assert_eq!(parsed.into_vectors(), vec![vec![2.0, 3.0]]);
    }

    #[tokio::test]
    async fn test_batch_keeps_input_order() {
        let router = Router::new().route(
            "/test/model/pipeline/feature-extraction",
            post(|Json(body): Json<Value>| async move {
                let inputs = body["inputs"].as_array().cloned().unwrap_or_default();
                let vectors: Vec<Vec<f32>> = inputs
                    .iter()
                    .map(|input| vec![input.as_str().unwrap().len() as f32, 1.0])
                    .collect();
                Json(json!(vectors))
            }),
        );
        let provider = provider(serve(router).await);

        let response = provider
            .generate_embeddings(BatchEmbeddingRequest {
                texts: vec!["a".to_string(), "abc".to_string()],
            })
            .await
            .unwrap();

        assert_eq!(response.embeddings[0].as_slice(), &[1.0, 1.0]);
        assert_eq!(response.embeddings[1].as_slice(), &[3.0, 1.0]);
        assert_eq!(provider.model_info().0, "test/model");
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let router = Router::new().route(
            "/test/model/pipeline/feature-extraction",
            post(|| async { (AxumStatus::BAD_REQUEST, "bad input") }),
        );
        let provider = provider(serve(router).await);

        let result = provider
            .generate_embedding(EmbeddingRequest {
                text: "hello".to_string(),
            })
            .await;

        assert!(matches!(
            result,
            Err(EmbeddingProviderError::ApiError { status: 400, .. })
        ));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        let provider = provider("http://127.0.0.1:9".to_string());

        let result = provider
            .generate_embedding(EmbeddingRequest {
                text: "hello".to_string(),
            })
            .await;

        assert!(matches!(result, Err(EmbeddingProviderError::NetworkError(_))));
    }
}
