use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Full;
use hyper::body::Incoming;
use serde::{Deserialize, Serialize};

use crate::csrf_protection::{CsrfSafeForm, CsrfToken};
use crate::entities::NewEvent;
use crate::error::AppError;
use crate::registry::RegistryError;
use crate::routes::{html_page, login_required, see_other};
use crate::session::{FlashCategory, Session};
use crate::templates;
use crate::AppState;

#[derive(Deserialize)]
pub struct CreateEventPayload {
    csrf_token: String,
    title: String,
    club_name: String,
    #[serde(rename = "type")]
    kind: String,
    date: String,
    location: String,
    description: String,
}

impl CsrfToken for CreateEventPayload {
    fn csrf_token(&self) -> &str {
        &self.csrf_token
    }
}

#[derive(Serialize)]
struct ClubOption {
    name: String,
}

#[derive(Serialize)]
struct CreateEventPage {
    clubs: Vec<ClubOption>,
}

pub async fn form(
    session: &mut Session,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, AppError> {
    if state.current_identity(session).await?.is_none() {
        return login_required(session);
    }
    render(session, state).await
}

async fn render(
    session: &mut Session,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, AppError> {
    let clubs = state
        .registry
        .list_clubs()
        .await?
        .into_iter()
        .map(|club| ClubOption { name: club.name })
        .collect();
    let body = templates::render("create_event", session, &CreateEventPage { clubs })?;
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
    let form = CsrfSafeForm::<CreateEventPayload>::from_request(request, session).await?;

    let new_event = match NewEvent::new(
        form.value.title,
        form.value.club_name,
        form.value.kind,
        form.value.date,
        form.value.location,
        form.value.description,
    ) {
        Ok(new_event) => new_event,
        Err(validation_error) => {
            session.flash(FlashCategory::Error, validation_error.to_string());
            return render(session, state).await;
        }
    };

    match state.registry.create_event(new_event, &identity).await {
        Ok(_event) => {
            session.flash(FlashCategory::Success, "Event created!");
            see_other("/", session)
        }
        Err(RegistryError::Store(store_error)) => Err(store_error.into()),
        Err(RegistryError::DuplicateName | RegistryError::Forbidden) => {
            session.flash(FlashCategory::Error, "Authorization failed.");
            see_other("/", session)
        }
    }
}
