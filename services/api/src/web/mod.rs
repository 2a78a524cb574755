pub mod admin;
pub mod auth;
pub mod middleware;
pub mod protocol;
pub mod rest;
pub mod state;
pub mod ws_handler;

// Re-export the main WebSocket handler and middleware to make them easily
// accessible to the binary that will build the web server router.
pub use middleware::{require_admin, require_auth};
pub use ws_handler::ws_handler;
