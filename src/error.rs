use axum::{
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};
use std::io;

/// Everything that can stop a request short of a rendered page.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// The raw request path failed the character or traversal checks.
    #[error("invalid path: {0}")]
    InvalidPath(&'static str),

    /// The resolved file path lies outside the content root.
    #[error("path escapes the content root: {0}")]
    UnsafePath(String),

    #[error("no page for {0}")]
    NotFound(String),

    /// The file existed but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to render page: {0}")]
    Render(#[from] askama::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl SiteError {
    pub fn status(&self) -> StatusCode {
        match self {
            SiteError::InvalidPath(_) | SiteError::UnsafePath(_) => StatusCode::BAD_REQUEST,
            SiteError::NotFound(_) => StatusCode::NOT_FOUND,
            SiteError::Read { .. } | SiteError::Render(_) | SiteError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> &'static str {
        match self {
            SiteError::InvalidPath(_) | SiteError::UnsafePath(_) => "Invalid path",
            SiteError::NotFound(_) => "404 page not found",
            SiteError::Read { .. } => "Error reading file",
            SiteError::Render(_) => "Template error",
            SiteError::Internal(_) => "Internal error",
        }
    }
}

impl IntoResponse for SiteError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        (
            status,
            [(CONTENT_TYPE, mime::TEXT_PLAIN_UTF_8.as_ref())],
            self.body(),
        )
            .into_response()
    }
}
