use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Full;
use hyper::body::Incoming;
use serde::{Deserialize, Serialize};

use crate::csrf_protection::{CsrfSafeForm, CsrfToken};
use crate::entities::NewClub;
use crate::error::AppError;
use crate::registry::RegistryError;
use crate::routes::{html_page, login_required, see_other};
use crate::session::{FlashCategory, Session};
use crate::templates;
use crate::AppState;

#[derive(Deserialize)]
pub struct CreateClubPayload {
    csrf_token: String,
    name: String,
    description: String,
    leader: String,
}

impl CsrfToken for CreateClubPayload {
    fn csrf_token(&self) -> &str {
        &self.csrf_token
    }
}

#[derive(Serialize)]
struct CreateClubPage {}

pub async fn form(
    session: &mut Session,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, AppError> {
    if state.current_identity(session).await?.is_none() {
        return login_required(session);
    }
    render(session)
}

fn render(session: &mut Session) -> Result<Response<Full<Bytes>>, AppError> {
    let body = templates::render("create_club", session, &CreateClubPage {})?;
    html_page(session, body)
}

pub async fn submit(
    request: Request<Incoming>,
    session: &mut Session,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, AppError> {
    let Some(identity) = state.current_identity(session).await? else {
        return login_required(session);
    };
    let form = CsrfSafeForm::<CreateClubPayload>::from_request(request, session).await?;

    let new_club = match NewClub::new(form.value.name, form.value.description, form.value.leader) {
        Ok(new_club) => new_club,
        Err(validation_error) => {
            session.flash(FlashCategory::Error, validation_error.to_string());
            return render(session);
        }
    };

    match state.registry.create_club(new_club, &identity).await {
        Ok(_club) => {
            session.flash(FlashCategory::Success, "Club registered!");
            see_other("/clubs", session)
        }
        Err(RegistryError::DuplicateName) => {
            session.flash(FlashCategory::Error, "Club name already exists!");
            render(session)
        }
        Err(RegistryError::Forbidden) => {
            session.flash(FlashCategory::Error, "Authorization failed.");
            see_other("/clubs", session)
        }
        Err(RegistryError::Store(store_error)) => Err(store_error.into()),
    }
}
