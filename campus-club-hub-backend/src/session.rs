//! Cookie-backed request session: a CSRF token minted on first contact,
//! the logged-in username and a one-shot flash message. Each value is kept
//! as a `(value, changed)` pair so `Set-Cookie` headers are only emitted
//! for values this request actually touched. Cookie values are urlencoded,
//! which keeps them inside the cookie-octet alphabet.

use cookie::time::Duration;
use cookie::{Cookie, SameSite};
use http::header::{COOKIE, SET_COOKIE};
use http::{HeaderValue, Request};
use rand::{thread_rng, Rng as _};
use serde::{Deserialize, Serialize};
use tracing::debug;

const COOKIE_NAME_CSRF_TOKEN: &str = "__Host_csrf_token";
const COOKIE_NAME_USER: &str = "__Host_user";
const COOKIE_NAME_FLASH: &str = "__Host_flash";

const CSRF_TOKEN_LENGTH: usize = 30;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Success,
    Error,
    Info,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Flash {
    pub category: FlashCategory,
    pub message: String,
}

#[derive(Serialize, Deserialize)]
struct UserCookie {
    username: String,
}

#[derive(Clone)]
#[must_use]
pub struct Session {
    csrf_token: (String, bool),
    username: (Option<String>, bool),
    flash: (Option<Flash>, bool),
}

impl Session {
    pub fn new<T>(request: &Request<T>) -> Self {
        let mut csrf_token = None;
        let mut username = None;
        let mut flash = None;
        request
            .headers()
            .get_all(COOKIE)
            .into_iter()
            .filter_map(|value| value.to_str().ok())
            .map(std::borrow::ToOwned::to_owned)
            .flat_map(Cookie::split_parse)
            .filter_map(std::result::Result::ok)
            .for_each(|cookie| match cookie.name() {
                COOKIE_NAME_CSRF_TOKEN => csrf_token = Some((cookie.value().to_owned(), false)),
                COOKIE_NAME_USER => {
                    if let Ok(user) = serde_urlencoded::from_str::<UserCookie>(cookie.value()) {
                        username = Some(user.username);
                    } else {
                        debug!("ignoring unparsable user cookie");
                    }
                }
                COOKIE_NAME_FLASH => {
                    if let Ok(value) = serde_urlencoded::from_str::<Flash>(cookie.value()) {
                        flash = Some(value);
                    }
                }
                _ => {
                    // cookies that are not ours
                }
            });
        let csrf_token = csrf_token.unwrap_or_else(|| (random_token(), true));
        Self {
            csrf_token,
            username: (username, false),
            flash: (flash, false),
        }
    }

    pub fn csrf_token(&self) -> String {
        self.csrf_token.0.clone()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.0.as_deref()
    }

    pub fn log_in(&mut self, username: String) {
        self.username = (Some(username), true);
    }

    pub fn log_out(&mut self) {
        if self.username.0.is_some() {
            self.username = (None, true);
        }
    }

    pub fn flash(&mut self, category: FlashCategory, message: impl Into<String>) {
        self.flash = (
            Some(Flash {
                category,
                message: message.into(),
            }),
            true,
        );
    }

    /// Hands the pending flash to the page being rendered and schedules
    /// the cookie for removal.
    pub fn take_flash(&mut self) -> Option<Flash> {
        let (flash, _) = std::mem::replace(&mut self.flash, (None, true));
        if flash.is_none() {
            self.flash = (None, false);
        }
        flash
    }
}

fn random_token() -> String {
    thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(CSRF_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

fn session_cookie(name: &'static str, value: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, value);
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Strict);
    cookie.set_path("/");
    cookie
}

fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = session_cookie(name, String::new());
    cookie.set_max_age(Duration::ZERO);
    cookie
}

pub trait ResponseSessionExt {
    #[must_use]
    fn with_session(self, session: &Session) -> Self;
}

impl ResponseSessionExt for http::response::Builder {
    fn with_session(self, session: &Session) -> Self {
        let mut this = self;
        if let (value, true) = &session.csrf_token {
            this = this.header(
                SET_COOKIE,
                header_value(session_cookie(COOKIE_NAME_CSRF_TOKEN, value.clone())),
            );
        }
        if let (value, true) = &session.username {
            let cookie = match value {
                Some(username) => session_cookie(
                    COOKIE_NAME_USER,
                    serde_urlencoded::to_string(UserCookie {
                        username: username.clone(),
                    })
                    .unwrap_or_default(),
                ),
                None => removal_cookie(COOKIE_NAME_USER),
            };
            this = this.header(SET_COOKIE, header_value(cookie));
        }
        if let (value, true) = &session.flash {
            let cookie = match value {
                Some(flash) => session_cookie(
                    COOKIE_NAME_FLASH,
                    serde_urlencoded::to_string(flash).unwrap_or_default(),
                ),
                None => removal_cookie(COOKIE_NAME_FLASH),
            };
            this = this.header(SET_COOKIE, header_value(cookie));
        }
        this
    }
}

fn header_value(cookie: Cookie<'static>) -> HeaderValue {
    // urlencoded values and static attributes only, so this cannot carry
    // characters a header rejects
    HeaderValue::try_from(cookie.to_string())
        .unwrap_or_else(|_| HeaderValue::from_static(""))
}
