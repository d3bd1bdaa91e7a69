//! city-rights/crates/cr-api/src/middleware.rs Middleware
//!
//! Custom middleware for security, logging, and URL handling.

use actix_web::middleware::{DefaultHeaders, Logger, NormalizePath};

// Returns a standard set of middleware for the city-rights site.
pub fn standard_middleware() -> Logger {
    // We use the 'default' logger which outputs:
    // remote-ip "request-line" status-code response-size "referrer" "user-agent"
    Logger::default()
}

/// Routes are declared without a trailing slash; `/cities/` reaches `/cities`.
pub fn normalize_path() -> NormalizePath {
    NormalizePath::trim()
}

/// Security headers on every response. Portraits may come from other hosts.
pub fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("Referrer-Policy", "strict-origin-when-cross-origin"))
        .add((
            "Content-Security-Policy",
            "default-src 'self'; img-src 'self' https: data:",
        ))
}
