use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Full;
use hyper::body::Incoming;
use serde::{Deserialize, Serialize};

use crate::csrf_protection::{CsrfSafeForm, CsrfToken};
use crate::error::AppError;
use crate::routes::{html_page, see_other};
use crate::session::{FlashCategory, Session};
use crate::templates;
use crate::AppState;

#[derive(Deserialize)]
pub struct LoginPayload {
    csrf_token: String,
    username: String,
    password: String,
}

impl CsrfToken for LoginPayload {
    fn csrf_token(&self) -> &str {
        &self.csrf_token
    }
}

#[derive(Serialize)]
struct LoginPage {}

pub fn form(session: &mut Session) -> Result<Response<Full<Bytes>>, AppError> {
    let body = templates::render("login", session, &LoginPage {})?;
    html_page(session, body)
}

pub async fn submit(
    request: Request<Incoming>,
    session: &mut Session,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, AppError> {
    let form = CsrfSafeForm::<LoginPayload>::from_request(request, session).await?;
    match state
        .accounts
        .verify(&form.value.username, &form.value.password)
        .await?
    {
        Some(identity) => {
            session.flash(
                FlashCategory::Success,
                format!("Welcome back, {}!", identity.username),
            );
            session.log_in(identity.username);
            see_other("/", session)
        }
        None => {
            session.flash(FlashCategory::Error, "Invalid username or password");
            self::form(session)
        }
    }
}
