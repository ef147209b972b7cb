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
pub struct DeleteEventPayload {
    csrf_token: String,
}

impl CsrfToken for DeleteEventPayload {
    fn csrf_token(&self) -> &str {
        &self.csrf_token
    }
}

pub async fn submit(
    request: Request<Incoming>,
    event_id: &str,
    session: &mut Session,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, AppError> {
    let Some(identity) = state.current_identity(session).await? else {
        return login_required(session);
    };
    let _form = CsrfSafeForm::<DeleteEventPayload>::from_request(request, session).await?;

    match state.registry.delete_event(event_id, &identity).await {
        Ok(()) => {
            session.flash(FlashCategory::Success, "Event deleted successfully.");
        }
        Err(RegistryError::Forbidden | RegistryError::DuplicateName) => {
            session.flash(
                FlashCategory::Error,
                "Authorization failed or event not found.",
            );
        }
        Err(RegistryError::Store(store_error)) => return Err(store_error.into()),
    }
    see_other("/", session)
}
