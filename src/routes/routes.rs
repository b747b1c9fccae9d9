//! Defines routes for all catalog record views.
//!
//! ## Structure
//! - **Record views**
//!   - `GET /editions/{olid}` — derived edition view
//!   - `PUT /editions/{olid}` — apply an edition edit
//!   - `GET /authors/{olid}`  — derived author view
//!   - `GET /works/{olid}`    — derived work view
//!
//! - **Search-backed and account views**
//!   - `GET /subjects/{name}` — subject page (supports offset, limit)
//!   - `GET /users/{username}` — edit history (supports admin, offset, limit)

use crate::{
    handlers::{
        health_handlers::{healthz, readyz},
        record_handlers::{
            get_author, get_edition, get_subject, get_user, get_work, update_edition,
        },
    },
    services::Catalog,
};
use axum::{Router, routing::get};

/// Build and return the router for all catalog routes.
///
/// The router carries shared state (`Catalog`) to all handlers: the
/// registry, coverstore, and search clients plus the overlay registry.
pub fn routes() -> Router<Catalog> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // record views
        .route("/editions/{olid}", get(get_edition).put(update_edition))
        .route("/authors/{olid}", get(get_author))
        .route("/works/{olid}", get(get_work))
        // search-backed and account views
        .route("/subjects/{name}", get(get_subject))
        .route("/users/{username}", get(get_user))
}
