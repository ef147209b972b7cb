//! Form wrapper that refuses to hand out the payload unless the token in
//! the body matches the session cookie. Every mutating form embeds the
//! token as a hidden input.

use http_body_util::BodyExt as _;
use hyper::body::Incoming;
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::session::Session;

pub trait CsrfToken {
    fn csrf_token(&self) -> &str;
}

#[must_use]
pub struct CsrfSafeForm<T: CsrfToken> {
    pub value: T,
}

impl<T> CsrfSafeForm<T>
where
    T: DeserializeOwned + CsrfToken,
{
    pub async fn from_request(
        request: http::Request<Incoming>,
        session: &Session,
    ) -> Result<Self, AppError> {
        let body = request.into_body().collect().await?.to_bytes();
        let value: T = serde_urlencoded::from_bytes(&body)?;
        if value.csrf_token() != session.csrf_token() {
            return Err(AppError::WrongCsrfToken);
        }
        Ok(Self { value })
    }
}
