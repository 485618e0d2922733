// CORS configuration: browsers may only call the API from one origin

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

pub fn cors_layer(allowed_origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    match allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(AllowOrigin::exact(origin)),
        Err(e) => {
            warn!(origin = allowed_origin, error = %e, "Invalid ALLOWED_ORIGIN, cross-origin requests disabled");
            layer
        }
    }
}
