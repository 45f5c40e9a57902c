pub mod artists;
pub mod pages;
pub mod shows;
pub mod venues;

use axum::{extract::rejection::JsonRejection, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogError;
use crate::forms::FieldErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// User-facing outcome message of a form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Response to every create/edit form submission.
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub success: bool,
    pub notice: Notice,
    #[serde(skip_serializing_if = "FieldErrors::is_empty")]
    pub errors: FieldErrors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    /// Where the client should go next, whatever the outcome.
    pub redirect_to: String,
}

pub type SubmissionResponse = (StatusCode, Json<Submission>);

impl Submission {
    pub fn accepted(
        status: StatusCode,
        id: i32,
        message: impl Into<String>,
        redirect_to: impl Into<String>,
    ) -> SubmissionResponse {
        (
            status,
            Json(Self {
                success: true,
                notice: Notice {
                    level: NoticeLevel::Success,
                    message: message.into(),
                },
                errors: FieldErrors::new(),
                id: Some(id),
                redirect_to: redirect_to.into(),
            }),
        )
    }

    pub fn rejected(
        status: StatusCode,
        errors: FieldErrors,
        message: impl Into<String>,
        redirect_to: impl Into<String>,
    ) -> SubmissionResponse {
        (
            status,
            Json(Self {
                success: false,
                notice: Notice {
                    level: NoticeLevel::Error,
                    message: message.into(),
                },
                errors,
                id: None,
                redirect_to: redirect_to.into(),
            }),
        )
    }

    /// Map a failed write to its response. Store failures get the generic
    /// `message`; the detail stays in the server log.
    pub fn from_error(
        err: CatalogError,
        message: impl Into<String>,
        redirect_to: impl Into<String>,
    ) -> SubmissionResponse {
        match err {
            CatalogError::Invalid(errors) => {
                tracing::warn!(%errors, "submission rejected");
                Self::rejected(StatusCode::UNPROCESSABLE_ENTITY, errors, message, redirect_to)
            }
            CatalogError::NotFound { entity, id } => {
                tracing::warn!(entity, id, "submission for missing record");
                Self::rejected(StatusCode::NOT_FOUND, FieldErrors::new(), message, redirect_to)
            }
            other => {
                tracing::error!(error = %other, "submission could not be saved");
                Self::rejected(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    FieldErrors::new(),
                    message,
                    redirect_to,
                )
            }
        }
    }
}

/// Error key for problems with the submission as a whole.
pub const BODY_FIELD: &str = "form";
pub const UNREADABLE_BODY: &str = "The submission could not be read.";

/// Unwrap a create/edit body. A body that cannot be decoded into the form
/// is answered with a rejected `Submission`; the decoder's message is
/// logged, not returned.
pub fn read_form<T>(
    payload: Result<Json<T>, JsonRejection>,
    message: &str,
    redirect_to: &str,
) -> Result<T, SubmissionResponse> {
    match payload {
        Ok(Json(form)) => Ok(form),
        Err(rejection) => {
            tracing::warn!(
                status = %rejection.status(),
                detail = %rejection.body_text(),
                "unreadable submission body"
            );
            let mut errors = FieldErrors::new();
            errors.add(BODY_FIELD, UNREADABLE_BODY);
            Err(Submission::rejected(rejection.status(), errors, message, redirect_to))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeleteOutcome {
    Ok,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteStatus {
    pub status: DeleteOutcome,
}

pub type DeleteResponse = (StatusCode, Json<DeleteStatus>);

pub fn delete_ok() -> DeleteResponse {
    (
        StatusCode::OK,
        Json(DeleteStatus {
            status: DeleteOutcome::Ok,
        }),
    )
}

pub fn delete_failed(status: StatusCode) -> DeleteResponse {
    (
        status,
        Json(DeleteStatus {
            status: DeleteOutcome::Error,
        }),
    )
}

/// Body of `POST /venues/search` and `POST /artists/search`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchForm {
    pub search_term: String,
}

#[derive(Debug, Serialize)]
pub struct SearchPage {
    pub search_term: String,
    pub results: crate::catalog::SearchResults,
}
