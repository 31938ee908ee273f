/// Uniform JSON envelope shared by every API handler.
///
/// Every response carries `status: "success" | "failed" | "error"`.
/// `failed` is a business-rule rejection, `error` an unexpected fault;
/// both still answer HTTP 200 so browser clients can branch on `status`
/// alone.
use crate::error::ClinicError;
use axum::response::Json;
use serde_json::{json, Value};

pub fn success(message: &str) -> Json<Value> {
    Json(json!({"status": "success", "message": message}))
}

pub fn failed(message: &str) -> Json<Value> {
    Json(json!({"status": "failed", "message": message}))
}

pub fn error(message: &str) -> Json<Value> {
    Json(json!({"status": "error", "message": message}))
}

/// Map a domain error onto the envelope: validation and not-found become
/// `failed`, everything else `error` with the display string.
pub fn from_error(err: &ClinicError) -> Json<Value> {
    match err {
        ClinicError::Validation(msg) | ClinicError::NotFound(msg) => failed(msg),
        other => error(&other.to_string()),
    }
}

/// Resolve a handler result into the envelope.
pub fn respond(result: Result<Json<Value>, ClinicError>) -> Json<Value> {
    match result {
        Ok(json) => json,
        Err(e) => from_error(&e),
    }
}

/// Method fallback for mutating routes: unsupported verbs answer with the
/// envelope instead of a protocol 405.
pub async fn invalid_method() -> Json<Value> {
    failed("Invalid method")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_failed() {
        let Json(body) = from_error(&ClinicError::Validation("Incorrect password".into()));
        assert_eq!(body["status"], "failed");
        assert_eq!(body["message"], "Incorrect password");
    }

    #[test]
    fn unexpected_maps_to_error() {
        let Json(body) = from_error(&ClinicError::Internal("boom".into()));
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Internal error: boom");
    }
}
