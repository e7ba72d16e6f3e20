//! Recognition service HTTP client
//!
//! Talks to the food-recognition backend: an image-classification
//! endpoint that names the food on a photo, and a nutrition-lookup
//! endpoint that returns per-100g values for a food name.

use reqwest::multipart;
use serde::Deserialize;
use thiserror::Error;

use crate::models::NutrientProfile;

/// Default recognition service address
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Errors from the recognition service
#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("recognition request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("recognition service returned {status}: {detail}")]
    Service { status: u16, detail: String },

    #[error("the service could not identify a food in the image")]
    Unrecognized,
}

/// A food identified on a photo
#[derive(Debug, Clone, Deserialize)]
pub struct RecognizedFood {
    pub food_name: String,
    #[serde(default)]
    pub confidence: f64,
    /// Portion weight estimated from the image, grams
    #[serde(default)]
    pub estimated_weight: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    food_name: Option<String>,
    #[serde(default)]
    confidence: f64,
    #[serde(default)]
    estimated_weight: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ServiceDetail {
    #[serde(default)]
    detail: String,
}

/// Client for the external food-recognition service
#[derive(Clone)]
pub struct RecognitionClient {
    base_url: String,
    http: reqwest::Client,
}

impl RecognitionClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    /// Build a client from `NUTRITRACK_RECOGNITION_URL` or the default
    pub fn from_env() -> Self {
        let base_url = std::env::var("NUTRITRACK_RECOGNITION_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn service_error(response: reqwest::Response) -> RecognitionError {
        let status = response.status().as_u16();
        let detail = response
            .json::<ServiceDetail>()
            .await
            .map(|d| d.detail)
            .unwrap_or_default();
        RecognitionError::Service { status, detail }
    }

    /// Send a photo for classification and return the identified food.
    ///
    /// An empty or "Unknown" answer from the service is reported as
    /// [`RecognitionError::Unrecognized`].
    pub async fn analyze_image(
        &self,
        image: Vec<u8>,
        file_name: &str,
    ) -> Result<RecognizedFood, RecognitionError> {
        let part = multipart::Part::bytes(image)
            .file_name(file_name.to_string())
            .mime_str("image/jpeg")?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(format!("{}/ai/analyze-food-image/", self.base_url))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }

        let body: AnalyzeResponse = response.json().await?;
        match body.food_name {
            Some(name) if !name.is_empty() && name != "Unknown" => Ok(RecognizedFood {
                food_name: name,
                confidence: body.confidence,
                estimated_weight: body.estimated_weight,
            }),
            _ => Err(RecognitionError::Unrecognized),
        }
    }

    /// Fetch per-100g nutrition for a food name.
    ///
    /// Returns `Ok(None)` when the service does not know the food.
    pub async fn lookup_nutrition(
        &self,
        food_name: &str,
    ) -> Result<Option<NutrientProfile>, RecognitionError> {
        let response = self
            .http
            .get(format!("{}/api/nutrition/lookup", self.base_url))
            .query(&[("food_name", food_name)])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::service_error(response).await);
        }

        // Unknown keys in the payload are ignored; missing ones are zero
        let nutrition: NutrientProfile = response.json().await?;
        Ok(Some(nutrition))
    }
}
