use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Form, Json,
};
use chrono::Utc;
use std::sync::Arc;

use super::{
    delete_failed, delete_ok, read_form, DeleteResponse, SearchForm, SearchPage, Submission,
    SubmissionResponse,
};
use crate::catalog::{self, venues::{CityGroup, VenueDetail}};
use crate::error::ApiError;
use crate::forms::{FormSchema, VenueForm};
use fyyur_db::AppState;

/// GET /venues
pub async fn list_venues(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CityGroup>>, ApiError> {
    let areas = catalog::venues::group_by_city(&state.db, Utc::now()).await?;
    Ok(Json(areas))
}

/// POST /venues/search
pub async fn search_venues(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> Result<Json<SearchPage>, ApiError> {
    let results = catalog::venues::search(&state.db, &form.search_term, Utc::now()).await?;
    Ok(Json(SearchPage {
        search_term: form.search_term,
        results,
    }))
}

/// GET /venues/:id
pub async fn get_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<VenueDetail>, ApiError> {
    let venue = catalog::venues::detail(&state.db, id, Utc::now()).await?;
    Ok(Json(venue))
}

/// GET /venues/create
pub async fn create_venue_form() -> Json<FormSchema<VenueForm>> {
    Json(FormSchema::with_choices(VenueForm::default()))
}

/// POST /venues/create
pub async fn create_venue(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<VenueForm>, JsonRejection>,
) -> SubmissionResponse {
    let form = match read_form(payload, "An error occurred. Venue could not be listed.", "/") {
        Ok(form) => form,
        Err(response) => return response,
    };
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            tracing::warn!(%errors, "venue form rejected");
            return Submission::rejected(
                StatusCode::UNPROCESSABLE_ENTITY,
                errors,
                "An error occurred. Venue could not be listed.",
                "/",
            );
        }
    };

    let name = input.name.clone();
    match catalog::venues::create(&state.db, input).await {
        Ok(venue) => {
            tracing::info!(venue_id = venue.id, name = %venue.name, "venue listed");
            Submission::accepted(
                StatusCode::CREATED,
                venue.id,
                format!("Venue {name} was successfully listed!"),
                "/",
            )
        }
        Err(e) => Submission::from_error(
            e,
            format!("An error occurred. Venue {name} could not be listed."),
            "/",
        ),
    }
}

/// GET /venues/:id/edit
pub async fn edit_venue_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<FormSchema<VenueForm>>, ApiError> {
    let form = catalog::venues::edit_form(&state.db, id).await?;
    Ok(Json(FormSchema::with_choices(form)))
}

/// POST /venues/:id/edit
pub async fn edit_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    payload: Result<Json<VenueForm>, JsonRejection>,
) -> SubmissionResponse {
    let detail_path = format!("/venues/{id}");
    let form = match read_form(payload, "Venue could not be updated.", &detail_path) {
        Ok(form) => form,
        Err(response) => return response,
    };

    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            tracing::warn!(venue_id = id, %errors, "venue edit rejected");
            return Submission::rejected(
                StatusCode::UNPROCESSABLE_ENTITY,
                errors,
                "Venue could not be updated.",
                detail_path,
            );
        }
    };

    match catalog::venues::update(&state.db, id, input).await {
        Ok(venue) => {
            tracing::info!(venue_id = venue.id, "venue updated");
            Submission::accepted(StatusCode::OK, venue.id, "Venue updated successfully", detail_path)
        }
        Err(e) => Submission::from_error(e, "Venue could not be updated.", detail_path),
    }
}

/// DELETE /venues/:id
pub async fn delete_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> DeleteResponse {
    match catalog::venues::delete(&state.db, id).await {
        Ok(removed) => {
            tracing::info!(venue_id = id, removed, "venue delete requested");
            delete_ok()
        }
        Err(e) => {
            tracing::error!(venue_id = id, error = %e, "could not delete venue");
            delete_failed(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
