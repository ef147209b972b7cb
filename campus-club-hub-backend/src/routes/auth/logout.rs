use bytes::Bytes;
use http::Response;
use http_body_util::Full;

use crate::error::AppError;
use crate::routes::see_other;
use crate::session::{FlashCategory, Session};

pub fn logout(session: &mut Session) -> Result<Response<Full<Bytes>>, AppError> {
    session.log_out();
    session.flash(FlashCategory::Success, "You have been logged out.");
    see_other("/login", session)
}
