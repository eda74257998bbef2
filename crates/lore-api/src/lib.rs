//! Lore API - HTTP server
//!
//! Thin request/response mapping over the retriever and the LLM client.
//! Query-time retrieval failures degrade to "no context" responses; a
//! missing index never fails the serving path.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
