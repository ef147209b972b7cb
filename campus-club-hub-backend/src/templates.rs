//! Handlebars registry and the wrapper that every page is rendered
//! through. The wrapper flattens the page's own data over the fields the
//! layout always needs: the CSRF token for forms, the logged-in username
//! for the navbar, and the pending flash message.

use handlebars::Handlebars;
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::session::{Flash, FlashCategory, Session};

pub static HANDLEBARS: Lazy<Handlebars<'static>> = Lazy::new(|| {
    let mut registry = Handlebars::new();
    for (name, source) in [
        ("page", include_str!("../templates/page.hbs")),
        ("index", include_str!("../templates/index.hbs")),
        ("clubs", include_str!("../templates/clubs.hbs")),
        ("signup", include_str!("../templates/signup.hbs")),
        ("login", include_str!("../templates/login.hbs")),
        ("create_club", include_str!("../templates/create_club.hbs")),
        ("create_event", include_str!("../templates/create_event.hbs")),
        ("error", include_str!("../templates/error.hbs")),
        ("not_found", include_str!("../templates/not_found.hbs")),
    ] {
        registry
            .register_template_string(name, source)
            .expect("built-in template must parse");
    }
    registry
});

#[derive(Serialize)]
struct FlashView {
    class: &'static str,
    message: String,
}

impl From<Flash> for FlashView {
    fn from(flash: Flash) -> Self {
        Self {
            class: match flash.category {
                FlashCategory::Success => "alert-success",
                FlashCategory::Error => "alert-danger",
                FlashCategory::Info => "alert-info",
            },
            message: flash.message,
        }
    }
}

#[derive(Serialize)]
struct PageWrapper<'a, T> {
    csrf_token: &'a str,
    username: Option<String>,
    flash: Option<FlashView>,
    #[serde(flatten)]
    inner: &'a T,
}

/// Renders `name` and consumes the session's pending flash message.
pub fn render<T: Serialize>(
    name: &str,
    session: &mut Session,
    inner: &T,
) -> Result<String, handlebars::RenderError> {
    let flash = session.take_flash().map(FlashView::from);
    let username = session.username().map(std::borrow::ToOwned::to_owned);
    let csrf_token = session.csrf_token();
    HANDLEBARS.render(
        name,
        &PageWrapper {
            csrf_token: &csrf_token,
            username,
            flash,
            inner,
        },
    )
}
