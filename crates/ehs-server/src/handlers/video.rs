use actix_web::{web, HttpResponse};
use ehs_pipeline::analyze_video_action;

use super::{envelope_response, into_form_input, Submission};
use crate::state::AppState;

pub async fn handler(state: web::Data<AppState>, submission: Submission) -> HttpResponse {
    let form = into_form_input(submission);
    let video_chars = form
        .get("videoDataUri")
        .and_then(|value| value.as_str())
        .map_or(0, str::len);
    log::info!("Video analysis requested (videoDataUri={} chars)", video_chars);

    let envelope = analyze_video_action(state.provider.as_ref(), &form).await;
    log::debug!("Video analysis finished: {:?}", envelope.outcome);
    envelope_response(&envelope)
}
