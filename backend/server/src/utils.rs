use axum::{Json, extract::rejection::JsonRejection};
use catalog::ProductPayload;

use crate::error::AppError::{self, MalformedPayload};

/// Unwraps a product body, turning extractor rejections into the error envelope.
pub fn get_payload(body: Result<Json<ProductPayload>, JsonRejection>) -> Result<ProductPayload, AppError> {
    body.map(|Json(payload)| payload)
        .map_err(|rejection| MalformedPayload(rejection.body_text()))
}
