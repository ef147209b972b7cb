use std::convert::Infallible;

use bytes::Bytes;
use campus_club_hub_config::ConfigError;
use campus_club_hub_database::StoreError;
use http::{Response, StatusCode};
use http_body_util::Full;
use serde::Serialize;

use crate::session::{ResponseSessionExt as _, Session};
use crate::templates;
use crate::ResponseTypedHeaderExt as _;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("form error: {0}")]
    Form(#[from] serde_urlencoded::de::Error),
    #[error("webserver error: {0}")]
    Hyper(#[from] hyper::Error),
    #[error("http error: {0}")]
    Http(#[from] http::Error),
    #[error("template error: {0}")]
    Template(#[from] handlebars::RenderError),
    #[error("database error: {0}")]
    Store(#[from] StoreError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("wrong csrf token")]
    WrongCsrfToken,
}

impl From<Infallible> for AppError {
    fn from(value: Infallible) -> Self {
        match value {}
    }
}

#[derive(Serialize)]
struct ErrorPage {
    message: String,
}

impl AppError {
    /// Renders the error page; falls back to bare markup so a broken
    /// template cannot take this path down with it.
    pub fn build_error_page(&self, session: &mut Session) -> Response<Full<Bytes>> {
        let status = match self {
            Self::WrongCsrfToken => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = templates::render(
            "error",
            session,
            &ErrorPage {
                message: self.to_string(),
            },
        )
        .unwrap_or_else(|_| format!("<h1>Internal Server Error</h1><p>{self}</p>"));
        Response::builder()
            .status(status)
            .typed_header(headers::ContentType::html())
            .with_session(session)
            .body(Full::from(body))
            .unwrap_or_else(|_| Response::new(Full::from(String::new())))
    }
}
