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
struct ClubCard {
    name: String,
    description: String,
    leader: String,
    founded: String,
    can_delete: bool,
}

#[derive(Serialize)]
struct ClubsPage {
    hero_title: &'static str,
    hero_text: &'static str,
    hero_compact: bool,
    clubs: Vec<ClubCard>,
}

pub async fn list(
    session: &mut Session,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, AppError> {
    let clubs = state.registry.list_clubs().await?;
    let identity = state.current_identity(session).await?;

    let clubs = clubs
        .into_iter()
        .map(|club| ClubCard {
            can_delete: identity
                .as_ref()
                .is_some_and(|identity| state.registry.can_modify(identity, &club.created_by)),
            name: club.name,
            description: club.description,
            leader: club.leader,
            founded: club.founded,
        })
        .collect();

    let body = templates::render(
        "clubs",
        session,
        &ClubsPage {
            hero_title: "Communities",
            hero_text: "Find your tribe. Join a club.",
            hero_compact: true,
            clubs,
        },
    )?;
    html_page(session, body)
}
