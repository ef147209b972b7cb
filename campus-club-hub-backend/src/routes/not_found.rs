use bytes::Bytes;
use http::{Response, StatusCode};
use http_body_util::Full;
use serde::Serialize;

use crate::error::AppError;
use crate::session::{ResponseSessionExt as _, Session};
use crate::templates;
use crate::ResponseTypedHeaderExt as _;

#[derive(Serialize)]
struct NotFoundPage {}

pub fn not_found(session: &mut Session) -> Result<Response<Full<Bytes>>, AppError> {
    let body = templates::render("not_found", session, &NotFoundPage {})?;
    Ok(Response::builder()
        .status(StatusCode::NOT_FOUND)
        .typed_header(headers::ContentType::html())
        .with_session(session)
        .body(Full::from(body))?)
}
