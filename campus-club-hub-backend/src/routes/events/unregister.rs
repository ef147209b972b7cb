use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Full;
use hyper::body::Incoming;
use serde::Deserialize;

use crate::csrf_protection::{CsrfSafeForm, CsrfToken};
use crate::error::AppError;
use crate::routes::{login_required, see_other};
use crate::session::{FlashCategory, Session};
use crate::AppState;

#[derive(Deserialize)]
pub struct UnregisterPayload {
    csrf_token: String,
}

impl CsrfToken for UnregisterPayload {
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
    let _form = CsrfSafeForm::<UnregisterPayload>::from_request(request, session).await?;

    state.ledger.unregister(event_id, &identity.username).await?;
    session.flash(FlashCategory::Info, "Successfully unregistered from event.");
    see_other("/", session)
}
