use std::collections::HashSet;

use bytes::Bytes;
use http::Response;
use http_body_util::Full;
use serde::Serialize;

use crate::error::AppError;
use crate::routes::html_page;
use crate::session::Session;
use crate::templates;
use crate::AppState;

#[derive(Serialize)]
struct EventCard {
    id: String,
    title: String,
    kind: String,
    tag_class: String,
    club_name: String,
    description: String,
    date: String,
    location: String,
    attending: usize,
    registered: bool,
    can_delete: bool,
}

#[derive(Serialize)]
struct IndexPage {
    hero_title: &'static str,
    hero_text: &'static str,
    events: Vec<EventCard>,
}

fn tag_class(kind: &str) -> String {
    match kind.split_whitespace().next() {
        Some(first) => format!("tag-{first}"),
        None => "tag-Other".to_owned(),
    }
}

pub async fn index(
    session: &mut Session,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, AppError> {
    let events = state.registry.list_events().await?;
    let counts = state.ledger.counts_by_event().await?;
    let identity = state.current_identity(session).await?;
    let my_event_ids = match &identity {
        Some(identity) => state.ledger.event_ids_for_user(&identity.username).await?,
        None => HashSet::new(),
    };

    let events = events
        .into_iter()
        .map(|event| EventCard {
            tag_class: tag_class(&event.kind),
            attending: counts.get(&event.id).copied().unwrap_or(0),
            registered: my_event_ids.contains(&event.id),
            can_delete: identity
                .as_ref()
                .is_some_and(|identity| state.registry.can_modify(identity, &event.created_by)),
            id: event.id,
            title: event.title,
            kind: event.kind,
            club_name: event.club_name,
            description: event.description,
            date: event.date,
            location: event.location,
        })
        .collect();

    let body = templates::render(
        "index",
        session,
        &IndexPage {
            hero_title: "Campus Life, Elevated.",
            hero_text: "Your one-stop destination for university events, clubs, and \
                        competitions. Don't miss out on what's happening today.",
            events,
        },
    )?;
    html_page(session, body)
}
