use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Full;
use hyper::body::Incoming;
use serde::{Deserialize, Serialize};

use crate::accounts::SignUpError;
use crate::csrf_protection::{CsrfSafeForm, CsrfToken};
use crate::error::AppError;
use crate::routes::{html_page, see_other};
use crate::session::{FlashCategory, Session};
use crate::templates;
use crate::AppState;

#[derive(Deserialize)]
pub struct SignUpPayload {
    csrf_token: String,
    username: String,
    password: String,
}

impl CsrfToken for SignUpPayload {
    fn csrf_token(&self) -> &str {
        &self.csrf_token
    }
}

#[derive(Serialize)]
struct SignUpPage {}

pub fn form(session: &mut Session) -> Result<Response<Full<Bytes>>, AppError> {
    let body = templates::render("signup", session, &SignUpPage {})?;
    html_page(session, body)
}

pub async fn submit(
    request: Request<Incoming>,
    session: &mut Session,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, AppError> {
    let form = CsrfSafeForm::<SignUpPayload>::from_request(request, session).await?;
    match state
        .accounts
        .sign_up(&form.value.username, &form.value.password)
        .await
    {
        Ok(()) => {
            session.flash(FlashCategory::Success, "Account created! Please log in.");
            see_other("/login", session)
        }
        Err(SignUpError::UsernameTaken) => {
            session.flash(FlashCategory::Error, "Username already exists");
            self::form(session)
        }
        Err(SignUpError::Invalid(validation_error)) => {
            session.flash(FlashCategory::Error, validation_error.to_string());
            self::form(session)
        }
        Err(SignUpError::Store(store_error)) => Err(store_error.into()),
    }
}
