use std::future::Future;
use std::time::Duration;

use log::{debug, error, info};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use super::types::{EditBase64Request, EditBase64Response, EditParams, HealthResponse, InfoResponse};
use crate::config::{DEFAULT_API_URL, EditorConfig};
use crate::error::ApiError;
use crate::serializer::strip_data_url;

/// The edit service as seen by the orchestrator
pub trait ImageEditService: Send + Sync {
    fn health(&self) -> impl Future<Output = Result<HealthResponse, ApiError>> + Send;

    /// Submit a base64 PNG and receive the edited image as base64
    fn edit_base64(&self, image: String, params: EditParams) -> impl Future<Output = Result<String, ApiError>> + Send;
}

/// HTTP client for the diffusion edit server
#[derive(Debug, Clone)]
pub struct DiffusionClient {
    client: Client,
    base_url: String,
}

impl DiffusionClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build().map_err(ApiError::Transport)?;
        let mut this = Self {
            client,
            base_url: DEFAULT_API_URL.to_owned(),
        };
        this.set_base_url(base_url)?;
        Ok(this)
    }

    pub fn from_config(config: &EditorConfig) -> Result<Self, ApiError> {
        Self::new(&config.api_base_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(&mut self, base_url: &str) -> Result<(), ApiError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if reqwest::Url::parse(trimmed).is_err() {
            return Err(ApiError::InvalidUrl(base_url.to_owned()));
        }
        self.base_url = trimmed.to_owned();
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /info`
    pub async fn info(&self) -> Result<InfoResponse, ApiError> {
        let response = self.client.get(self.url("/info")).send().await?;
        read_json(check_status(response).await?).await
    }

    /// `POST /edit` with the PNG as a multipart file; returns the raw edited image
    pub async fn edit(&self, png: Vec<u8>, params: &EditParams) -> Result<Vec<u8>, ApiError> {
        let image = Part::bytes(png)
            .file_name("image.png")
            .mime_str("image/png")
            .map_err(ApiError::Transport)?;
        let form = params
            .form_fields()
            .into_iter()
            .fold(Form::new().part("image", image), |form, (name, value)| form.text(name, value));

        info!("🎨 Submitting multipart edit: {:?}", params.prompt);
        let response = self.client.post(self.url("/edit")).multipart(form).send().await?;
        let bytes = check_status(response).await?.bytes().await?;
        debug!("Received {} bytes of edited image", bytes.len());
        Ok(bytes.to_vec())
    }
}

impl ImageEditService for DiffusionClient {
    async fn health(&self) -> Result<HealthResponse, ApiError> {
        let response = self.client.get(self.url("/health")).send().await?;
        let health: HealthResponse = read_json(check_status(response).await?).await?;
        debug!("Health: {:?}", health);
        Ok(health)
    }

    async fn edit_base64(&self, image: String, params: EditParams) -> Result<String, ApiError> {
        info!("🎨 Submitting edit: {:?} ({} steps)", params.prompt, params.num_inference_steps);
        let request = EditBase64Request { image, params };
        let response = self.client.post(self.url("/edit/base64")).json(&request).send().await?;
        let result: EditBase64Response = read_json(check_status(response).await?).await?;
        if result.image.is_empty() {
            return Err(ApiError::InvalidResponse("response contained no image".to_owned()));
        }
        info!("✅ Edit finished ({})", result.format);
        Ok(strip_data_url(&result.image).to_owned())
    }
}

/// Turn a non-2xx response into [`ApiError::Status`] carrying the server's text
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    let message = if text.trim().is_empty() {
        status.canonical_reason().unwrap_or("unknown error").to_owned()
    } else {
        text
    };
    error!("❌ Service returned {}: {}", status, message);
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|err| ApiError::InvalidResponse(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalization() {
        let mut client = DiffusionClient::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/health"), "http://localhost:8000/health");

        client.set_base_url(" http://gpu:9000 ").unwrap();
        assert_eq!(client.base_url(), "http://gpu:9000");

        assert!(matches!(client.set_base_url("not a url"), Err(ApiError::InvalidUrl(_))));
        assert_eq!(client.base_url(), "http://gpu:9000");
    }
}
