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
use crate::catalog::{self, artists::{ArtistDetail, ArtistSummary}, CatalogError};
use crate::error::ApiError;
use crate::forms::{ArtistForm, FormSchema};
use fyyur_db::AppState;

/// GET /artists
pub async fn list_artists(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ArtistSummary>>, ApiError> {
    let artists = catalog::artists::list(&state.db).await?;
    Ok(Json(artists))
}

/// POST /artists/search
pub async fn search_artists(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> Result<Json<SearchPage>, ApiError> {
    let results = catalog::artists::search(&state.db, &form.search_term, Utc::now()).await?;
    Ok(Json(SearchPage {
        search_term: form.search_term,
        results,
    }))
}

/// GET /artists/:id
pub async fn get_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ArtistDetail>, ApiError> {
    let artist = catalog::artists::detail(&state.db, id, Utc::now()).await?;
    Ok(Json(artist))
}

/// GET /artists/create
pub async fn create_artist_form() -> Json<FormSchema<ArtistForm>> {
    Json(FormSchema::with_choices(ArtistForm::default()))
}

/// POST /artists/create
pub async fn create_artist(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ArtistForm>, JsonRejection>,
) -> SubmissionResponse {
    let form = match read_form(payload, "Artist could not be listed.", "/") {
        Ok(form) => form,
        Err(response) => return response,
    };
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            tracing::warn!(%errors, "artist form rejected");
            return Submission::rejected(
                StatusCode::UNPROCESSABLE_ENTITY,
                errors,
                "Artist could not be listed.",
                "/",
            );
        }
    };

    let name = input.name.clone();
    match catalog::artists::create(&state.db, input).await {
        Ok(artist) => {
            tracing::info!(artist_id = artist.id, name = %artist.name, "artist listed");
            Submission::accepted(
                StatusCode::CREATED,
                artist.id,
                format!("Artist {name} was successfully listed!"),
                "/",
            )
        }
        Err(e) => Submission::from_error(e, format!("Artist {name} could not be listed."), "/"),
    }
}

/// GET /artists/:id/edit
pub async fn edit_artist_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<FormSchema<ArtistForm>>, ApiError> {
    let form = catalog::artists::edit_form(&state.db, id).await?;
    Ok(Json(FormSchema::with_choices(form)))
}

/// POST /artists/:id/edit
pub async fn edit_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    payload: Result<Json<ArtistForm>, JsonRejection>,
) -> SubmissionResponse {
    let detail_path = format!("/artists/{id}");
    let form = match read_form(payload, "Could not edit artist details", &detail_path) {
        Ok(form) => form,
        Err(response) => return response,
    };

    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            tracing::warn!(artist_id = id, %errors, "artist edit rejected");
            return Submission::rejected(
                StatusCode::UNPROCESSABLE_ENTITY,
                errors,
                "Could not edit artist details",
                detail_path,
            );
        }
    };

    match catalog::artists::update(&state.db, id, input).await {
        Ok(artist) => {
            tracing::info!(artist_id = artist.id, "artist updated");
            Submission::accepted(
                StatusCode::OK,
                artist.id,
                "Artist details updated successfully",
                detail_path,
            )
        }
        Err(e) => Submission::from_error(e, "Artist details were not able to be updated", detail_path),
    }
}

/// DELETE /artists/:id
pub async fn delete_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> DeleteResponse {
    match catalog::artists::delete(&state.db, id).await {
        Ok(removed) => {
            tracing::info!(artist_id = id, removed, "artist delete requested");
            delete_ok()
        }
        Err(CatalogError::ArtistHasShows(_)) => {
            tracing::warn!(artist_id = id, "refusing to delete an artist with shows");
            delete_failed(StatusCode::CONFLICT)
        }
        Err(e) => {
            tracing::error!(artist_id = id, error = %e, "could not delete artist");
            delete_failed(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
