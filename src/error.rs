// src/error.rs
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::{link::LinkError, page::Locale, render};

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Link(#[from] LinkError),

    /// Every rejected landing request, whatever the cause.
    #[error("not found")]
    NotFound(Locale),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Link(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
            AppError::NotFound(locale) => {
                (StatusCode::NOT_FOUND, Html(render::not_found(locale))).into_response()
            }
        }
    }
}
