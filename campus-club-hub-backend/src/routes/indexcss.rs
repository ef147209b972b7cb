use std::time::Duration;

use bytes::Bytes;
use headers::{CacheControl, ContentType, ETag, HeaderMapExt as _, IfNoneMatch};
use http::{Response, StatusCode};
use http_body_util::Full;

use crate::error::AppError;
use crate::ResponseTypedHeaderExt as _;

const INDEX_CSS: &str = include_str!("../../assets/index.css");
const INDEX_CSS_ETAG: &str = "\"club-hub-css-1\"";

pub fn indexcss<T>(request: &http::Request<T>) -> Result<Response<Full<Bytes>>, AppError> {
    let if_none_match: Option<IfNoneMatch> = request.headers().typed_get();
    #[allow(clippy::unwrap_used)]
    let etag = INDEX_CSS_ETAG.parse::<ETag>().unwrap();
    if if_none_match
        .map(|header| header.precondition_passes(&etag))
        .unwrap_or(true)
    {
        Ok(Response::builder()
            .status(StatusCode::OK)
            .typed_header(ContentType::from(mime::TEXT_CSS_UTF_8))
            .typed_header(etag)
            .typed_header(
                CacheControl::new()
                    .with_immutable()
                    .with_public()
                    .with_max_age(Duration::from_secs(31_536_000)),
            )
            .body(Full::from(Bytes::from_static(INDEX_CSS.as_bytes())))?)
    } else {
        Ok(Response::builder()
            .status(StatusCode::NOT_MODIFIED)
            .body(Full::from(String::new()))?)
    }
}
