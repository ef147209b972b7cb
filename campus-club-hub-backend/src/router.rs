//! Hand-rolled dispatch: exact paths first, then the routes that carry an
//! event id as their last segment. Anything else is the rendered 404.

use std::sync::Arc;

use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Full;
use hyper::body::Incoming;
use tracing::{error, info};

use crate::error::AppError;
use crate::routes;
use crate::session::Session;
use crate::AppState;

pub async fn handle(request: Request<Incoming>, state: Arc<AppState>) -> Response<Full<Bytes>> {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let mut session = Session::new(&request);
    let response = match dispatch(request, &mut session, &state).await {
        Ok(response) => response,
        Err(app_error) => {
            error!("request failed: {app_error}");
            app_error.build_error_page(&mut session)
        }
    };
    info!(%method, %path, status = %response.status().as_u16(), "handled request");
    response
}

async fn dispatch(
    request: Request<Incoming>,
    session: &mut Session,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, AppError> {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => routes::index::index(session, state).await,
        ("GET", "/index.css") => routes::indexcss::indexcss(&request),
        ("GET", "/signup") => routes::auth::signup::form(session),
        ("POST", "/signup") => routes::auth::signup::submit(request, session, state).await,
        ("GET", "/login") => routes::auth::login::form(session),
        ("POST", "/login") => routes::auth::login::submit(request, session, state).await,
        ("GET", "/logout") => routes::auth::logout::logout(session),
        ("GET", "/clubs") => routes::clubs::list::list(session, state).await,
        ("GET", "/register_club") => routes::clubs::create::form(session, state).await,
        ("POST", "/register_club") => routes::clubs::create::submit(request, session, state).await,
        ("POST", "/delete_club") => routes::clubs::delete::submit(request, session, state).await,
        ("GET", "/create_event") => routes::events::create::form(session, state).await,
        ("POST", "/create_event") => routes::events::create::submit(request, session, state).await,
        ("POST", rest) => {
            if let Some(id) = rest.strip_prefix("/delete_event/") {
                let id = id.to_owned();
                routes::events::delete::submit(request, &id, session, state).await
            } else if let Some(id) = rest.strip_prefix("/register_for_event/") {
                let id = id.to_owned();
                routes::events::register::submit(request, &id, session, state).await
            } else if let Some(id) = rest.strip_prefix("/unregister_from_event/") {
                let id = id.to_owned();
                routes::events::unregister::submit(request, &id, session, state).await
            } else {
                routes::not_found::not_found(session)
            }
        }
        _ => routes::not_found::not_found(session),
    }
}
