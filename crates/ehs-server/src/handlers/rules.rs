use actix_web::{web, HttpResponse};
use ehs_pipeline::generate_rule_from_ai;

use super::{envelope_response, into_form_input, Submission};
use crate::state::AppState;

pub async fn handler(state: web::Data<AppState>, submission: Submission) -> HttpResponse {
    let form = into_form_input(submission);
    log::info!("Rule generation requested ({} fields)", form.len());

    let envelope = generate_rule_from_ai(state.provider.as_ref(), &form).await;
    log::debug!("Rule generation finished: {:?}", envelope.outcome);
    envelope_response(&envelope)
}
