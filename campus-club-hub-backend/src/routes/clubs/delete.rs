use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Full;
use hyper::body::Incoming;
use serde::Deserialize;

use crate::csrf_protection::{CsrfSafeForm, CsrfToken};
use crate::error::AppError;
use crate::registry::RegistryError;
use crate::routes::{login_required, see_other};
use crate::session::{FlashCategory, Session};
use crate::AppState;

#[derive(Deserialize)]
pub struct DeleteClubPayload {
    csrf_token: String,
    name: String,
}

impl CsrfToken for DeleteClubPayload {
    fn csrf_token(&self) -> &str {
        &self.csrf_token
    }
}

pub async fn submit(
    request: Request<Incoming>,
    session: &mut Session,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, AppError> {
    let Some(identity) = state.current_identity(session).await? else {
        return login_required(session);
    };
    let form = CsrfSafeForm::<DeleteClubPayload>::from_request(request, session).await?;
    let name = form.value.name;

    match state.registry.delete_club(&name, &identity).await {
        Ok(()) => {
            session.flash(FlashCategory::Success, format!("Club \"{name}\" deleted."));
        }
        Err(RegistryError::Forbidden | RegistryError::DuplicateName) => {
            session.flash(FlashCategory::Error, "Authorization failed.");
        }
        Err(RegistryError::Store(store_error)) => return Err(store_error.into()),
    }
    see_other("/clubs", session)
}
