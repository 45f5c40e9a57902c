use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use super::{read_form, Submission, SubmissionResponse};
use crate::catalog::{self, shows::ShowListing};
use crate::error::ApiError;
use crate::forms::{FormSchema, ShowForm};
use fyyur_db::AppState;

/// GET /shows
pub async fn list_shows(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ShowListing>>, ApiError> {
    let shows = catalog::shows::list(&state.db).await?;
    Ok(Json(shows))
}

/// GET /shows/create
pub async fn create_show_form() -> Json<FormSchema<ShowForm>> {
    Json(FormSchema::plain(ShowForm::starting_at(Utc::now())))
}

/// POST /shows/create
pub async fn create_show(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ShowForm>, JsonRejection>,
) -> SubmissionResponse {
    const FAILED: &str = "An error occurred. Show could not be listed.";

    let form = match read_form(payload, FAILED, "/") {
        Ok(form) => form,
        Err(response) => return response,
    };

    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            tracing::warn!(%errors, "show form rejected");
            return Submission::rejected(StatusCode::UNPROCESSABLE_ENTITY, errors, FAILED, "/");
        }
    };

    match catalog::shows::create(&state.db, input).await {
        Ok(show) => {
            tracing::info!(
                show_id = show.id,
                artist_id = show.artist_id,
                venue_id = show.venue_id,
                "show listed"
            );
            Submission::accepted(StatusCode::CREATED, show.id, "Show was successfully listed!", "/")
        }
        Err(e) => Submission::from_error(e, FAILED, "/"),
    }
}
