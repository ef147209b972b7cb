pub mod auth;
pub mod clubs;
pub mod events;
pub mod index;
pub mod indexcss;
pub mod not_found;

use bytes::Bytes;
use http::header::LOCATION;
use http::{Response, StatusCode};
use http_body_util::Full;

use crate::error::AppError;
use crate::session::{FlashCategory, ResponseSessionExt as _, Session};
use crate::ResponseTypedHeaderExt as _;

pub(crate) fn html_page(
    session: &Session,
    body: String,
) -> Result<Response<Full<Bytes>>, AppError> {
    Ok(Response::builder()
        .status(StatusCode::OK)
        .typed_header(headers::ContentType::html())
        .with_session(session)
        .body(Full::from(body))?)
}

pub(crate) fn see_other(
    location: &str,
    session: &Session,
) -> Result<Response<Full<Bytes>>, AppError> {
    Ok(Response::builder()
        .status(StatusCode::SEE_OTHER)
        .header(LOCATION, location)
        .with_session(session)
        .body(Full::from(String::new()))?)
}

/// The guard in front of every mutating action: flashes and bounces to the
/// login page when nobody is logged in.
pub(crate) fn login_required(session: &mut Session) -> Result<Response<Full<Bytes>>, AppError> {
    session.flash(FlashCategory::Error, "You must be logged in to do that.");
    see_other("/login", session)
}
