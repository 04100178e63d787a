//! HTTP client for the external image-generation API.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::application::images::{
    GenerateImageRequest, GeneratedImage, ImageGenError, ImageGenerator,
};

#[derive(Debug, Serialize)]
struct GenerationBody<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    n: u8,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    data: Vec<GenerationResult>,
}

#[derive(Debug, Deserialize)]
struct GenerationResult {
    url: String,
}

pub struct ReqwestImageGenerator {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl ReqwestImageGenerator {
    pub fn new(endpoint: Url, api_key: String) -> Result<Self, ImageGenError> {
        let client = Client::builder()
            .user_agent(concat!("atelier/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| ImageGenError::Http(err.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    fn generations_url(&self) -> Result<Url, ImageGenError> {
        self.endpoint
            .join("images/generations")
            .map_err(|err| ImageGenError::Http(err.to_string()))
    }
}

#[async_trait]
impl ImageGenerator for ReqwestImageGenerator {
    async fn generate(
        &self,
        request: &GenerateImageRequest,
    ) -> Result<GeneratedImage, ImageGenError> {
        let body = GenerationBody {
            model: request.model.identifier(),
            prompt: &request.prompt,
            size: request.size.dimensions(),
            n: 1,
        };

        let response = self
            .client
            .post(self.generations_url()?)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| ImageGenError::Http(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ImageGenError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerationResponse = response
            .json()
            .await
            .map_err(|err| ImageGenError::Http(err.to_string()))?;

        // The API may return several candidates; only the first is used.
        let first = parsed
            .data
            .into_iter()
            .next()
            .ok_or(ImageGenError::EmptyResponse)?;

        Ok(GeneratedImage {
            url: first.url,
            prompt: request.prompt.clone(),
            model: request.model,
            size: request.size,
        })
    }

    async fn download(&self, url: &str) -> Result<Bytes, ImageGenError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| ImageGenError::Http(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageGenError::Api {
                status: status.as_u16(),
                message: "source fetch failed".to_string(),
            });
        }

        response
            .bytes()
            .await
            .map_err(|err| ImageGenError::Http(err.to_string()))
    }
}
