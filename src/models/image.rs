use base64::Engine;
use serde::{Deserialize, Serialize};

use super::common::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokePoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeMode {
    /// Paint the region that should be edited.
    #[default]
    Draw,
    /// Remove previously painted mask.
    Erase,
}

/// One brush stroke of the edit mask, in image pixel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskStroke {
    pub points: Vec<StrokePoint>,
    pub brush_size: f64,
    #[serde(default)]
    pub mode: StrokeMode,
}

impl MaskStroke {
    pub fn new(brush_size: f64) -> Self {
        Self {
            points: Vec::new(),
            brush_size,
            mode: StrokeMode::Draw,
        }
    }

    pub fn with_mode(mut self, mode: StrokeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn point(mut self, x: f64, y: f64) -> Self {
        self.points.push(StrokePoint { x, y });
        self
    }
}

/// An image edit to submit.
///
/// `strength`, `guidance`, `steps` and `seed` are kept for callers but the
/// backend has no field for them, so they are not sent. Their documented
/// ranges (strength 0-1, guidance 1-20) are not checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Base64 encoded input image (a data URL is accepted as-is).
    pub image_data: String,
    pub mask_data: Option<Vec<MaskStroke>>,
    pub prompt: Option<String>,
    pub strength: Option<f64>,
    pub guidance: Option<f64>,
    pub steps: Option<u32>,
    pub seed: Option<u64>,
}

impl GenerationRequest {
    pub fn new(image_data: impl Into<String>) -> Self {
        Self {
            image_data: image_data.into(),
            ..Default::default()
        }
    }

    /// Base64 encodes raw image bytes.
    pub fn from_image_bytes(bytes: &[u8]) -> Self {
        Self::new(base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_mask(mut self, strokes: Vec<MaskStroke>) -> Self {
        self.mask_data = Some(strokes);
        self
    }

    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = Some(strength);
        self
    }

    pub fn with_guidance(mut self, guidance: f64) -> Self {
        self.guidance = Some(guidance);
        self
    }

    pub fn with_steps(mut self, steps: u32) -> Self {
        self.steps = Some(steps);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn is_masked(&self) -> bool {
        self.mask_data.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance: Option<f64>,
    /// As reported by the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    /// URL or base64 of the generated image. Absent until the job completes.
    pub output: Option<String>,
    pub request_id: Option<String>,
    pub metadata: Option<GenerationMetadata>,
}

#[derive(Debug, Clone)]
pub enum GenerationResponse {
    Success(GenerationResult),
    Failure(ApiError),
}

impl GenerationResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationResponse::Success(_))
    }

    pub fn result(&self) -> Option<&GenerationResult> {
        match self {
            GenerationResponse::Success(result) => Some(result),
            GenerationResponse::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            GenerationResponse::Success(_) => None,
            GenerationResponse::Failure(error) => Some(error),
        }
    }

    /// The backend-assigned id to poll with.
    pub fn request_id(&self) -> Option<&str> {
        self.result().and_then(|r| r.request_id.as_deref())
    }

    pub fn into_result(self) -> Result<GenerationResult, ApiError> {
        match self {
            GenerationResponse::Success(result) => Ok(result),
            GenerationResponse::Failure(error) => Err(error),
        }
    }
}
