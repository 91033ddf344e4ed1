pub mod health;
pub mod rules;
pub mod video;

use std::collections::HashMap;

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::http::StatusCode;
use actix_web::{web, Either, HttpRequest, HttpResponse};
use ehs_pipeline::actions::INVALID_FORM_MESSAGE;
use ehs_pipeline::{FormInput, Outcome, ResultEnvelope};
use serde::Serialize;
use serde_json::Value;

/// A submission may arrive as JSON or as a url-encoded HTML form.
pub type Submission = Either<web::Json<FormInput>, web::Form<HashMap<String, String>>>;

pub(crate) fn into_form_input(submission: Submission) -> FormInput {
    match submission {
        Either::Left(json) => json.into_inner(),
        Either::Right(form) => form
            .into_inner()
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect(),
    }
}

pub(crate) fn envelope_response<P: Serialize>(envelope: &ResultEnvelope<P>) -> HttpResponse {
    let status = match envelope.outcome {
        Outcome::Succeeded => StatusCode::OK,
        Outcome::InvalidInput => StatusCode::UNPROCESSABLE_ENTITY,
        Outcome::Failed => StatusCode::BAD_GATEWAY,
    };
    HttpResponse::build(status).json(envelope)
}

/// Undecodable bodies still answer with an `invalid_input` envelope.
///
/// When neither JSON nor form decoding succeeds, `Either` reports the JSON error, so
/// this handler covers wrong content types as well as non-object JSON.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let (status, issue) = match &err {
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            (StatusCode::PAYLOAD_TOO_LARGE, err.to_string())
        }
        JsonPayloadError::ContentType => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "Request body must be a JSON object or a url-encoded form.".to_string(),
        ),
        _ => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
    };
    log::debug!("Rejected request body: {}", err);

    let envelope: ResultEnvelope<()> = ResultEnvelope::invalid(INVALID_FORM_MESSAGE, vec![issue], None);
    InternalError::from_response(err, HttpResponse::build(status).json(envelope)).into()
}
