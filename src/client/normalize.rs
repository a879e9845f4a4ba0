//! Wire shapes of the Nano Banana endpoints and their mapping onto the
//! crate's result types.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use super::transport::TransportResponse;
use crate::error::{ClientError, Result};
use crate::models::{
    ApiError, ErrorCode, GenerationMetadata, GenerationRequest, GenerationResult,
    PollStatusResponse, MODEL_NAME,
};

/// Reply of the generate endpoint. Fields stay untyped until the branch
/// that consumes them reads them, so an odd field it never uses cannot fail
/// an otherwise good reply.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateReply {
    success: Option<Value>,
    request_id: Option<Value>,
    result: Option<Value>,
    error: Option<Value>,
}

/// Reply of the result endpoint. Any `requestId` echoed here is ignored.
#[derive(Debug, Deserialize)]
struct PollReply {
    success: Option<Value>,
    result: Option<Value>,
    error: Option<Value>,
}

fn succeeded(success: &Option<Value>) -> bool {
    matches!(success, Some(Value::Bool(true)))
}

fn text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn number(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64)
}

/// `error.message`, when the error is an object carrying a non-empty string.
fn error_message(error: &Option<Value>) -> Option<String> {
    text(error.as_ref().and_then(|e| e.get("message")))
}

/// A string id, or a numeric one rendered as text.
fn request_id(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// The generated image reference. A list (one entry per requested image)
/// yields its first string; other non-null shapes are kept as JSON text.
fn image_ref(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(output) => Some(output.clone()),
        Value::Array(items) => items.iter().find_map(|v| v.as_str().map(str::to_string)),
        other => Some(other.to_string()),
    }
}

fn decode<T: DeserializeOwned>(response: &TransportResponse, context: &str) -> Result<T> {
    if !response.is_ok() {
        return Err(ClientError::Http {
            context: context.to_string(),
            status: response.status,
            status_text: response.status_text.clone(),
        });
    }
    Ok(serde_json::from_str(&response.body)?)
}

fn metadata(processing_time: Option<f64>) -> GenerationMetadata {
    GenerationMetadata {
        model: Some(MODEL_NAME.to_string()),
        processing_time,
        ..Default::default()
    }
}

pub(crate) fn generation_body(request: &GenerationRequest) -> Value {
    let mut data = json!({
        "inputImage": [request.image_data],
        "numOfImages": 1,
        "model": MODEL_NAME,
    });

    if let Some(prompt) = &request.prompt {
        data["prompt"] = json!(prompt);
    }
    if let Some(strokes) = &request.mask_data {
        data["maskStrokes"] = json!(strokes);
        data["maskMode"] = json!(true);
    }

    json!({ "data": data })
}

pub(crate) fn poll_body(request_id: &str) -> Value {
    json!({ "data": { "requestId": request_id } })
}

pub(crate) fn generation_result(response: TransportResponse) -> Result<GenerationResult> {
    let reply: GenerateReply = decode(&response, "API request failed")?;

    match request_id(reply.request_id.as_ref()) {
        Some(request_id) if succeeded(&reply.success) => {
            let result = reply.result.as_ref();
            Ok(GenerationResult {
                output: image_ref(result.and_then(|r| r.get("output"))),
                request_id: Some(request_id),
                metadata: Some(metadata(number(result.and_then(|r| r.get("processingTime"))))),
            })
        }
        _ => Err(ClientError::Api(
            error_message(&reply.error).unwrap_or_else(|| "Generation failed".to_string()),
        )),
    }
}

/// `request_id` is the caller's id; the completed result echoes it rather
/// than anything the body carries.
pub(crate) fn poll_result(request_id: &str, response: TransportResponse) -> Result<PollStatusResponse> {
    let reply: PollReply = decode(&response, "Polling failed")?;

    if !succeeded(&reply.success) {
        return Err(ClientError::Api(
            error_message(&reply.error).unwrap_or_else(|| "Polling failed".to_string()),
        ));
    }

    let result = match reply.result {
        Some(result) if !result.is_null() => result,
        _ => return Err(ClientError::InvalidResponse("poll reply has no result".into())),
    };

    let status = match result.get("status").and_then(Value::as_str) {
        Some("COMPLETED") => PollStatusResponse::Completed(GenerationResult {
            output: image_ref(result.get("output")),
            request_id: Some(request_id.to_string()),
            metadata: Some(metadata(number(result.get("processingTime")))),
        }),
        Some("FAILED") => PollStatusResponse::Failed(ApiError::new(
            ErrorCode::GenerationFailed,
            text(result.get("errorMessage")).unwrap_or_else(|| "Generation failed".to_string()),
        )),
        // QUEUED, IN_PROGRESS and anything the backend adds later.
        _ => PollStatusResponse::Processing {
            progress: number(result.get("progress")),
            estimated_time_remaining: number(result.get("estimatedTimeRemaining")),
        },
    };
    Ok(status)
}
