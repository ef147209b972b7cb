use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Full;
use hyper::body::Incoming;
use serde::Deserialize;

use crate::csrf_protection::{CsrfSafeForm, CsrfToken};
use crate::error::AppError;
use crate::ledger::RegisterOutcome;
use crate::routes::{login_required, see_other};
use crate::session::{FlashCategory, Session};
use crate::AppState;

#[derive(Deserialize)]
pub struct RegisterPayload {
    csrf_token: String,
}

impl CsrfToken for RegisterPayload {
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
    let _form = CsrfSafeForm::<RegisterPayload>::from_request(request, session).await?;

    match state.ledger.register(event_id, &identity.username).await? {
        RegisterOutcome::Created => {
            session.flash(
                FlashCategory::Success,
                "Successfully registered for the event!",
            );
        }
        RegisterOutcome::AlreadyRegistered => {
            session.flash(
                FlashCategory::Info,
                "You are already registered for this event.",
            );
        }
    }
    see_other("/", session)
}
