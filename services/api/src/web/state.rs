//! services/api/src/web/state.rs
//!
//! Defines the application's shared state. Per-connection wizard state lives
//! in the core crate (`scholarmind_core::session::SessionState`) and is owned
//! by each WebSocket handler.

use crate::config::Config;
use scholarmind_core::generation::ResearchGenerator;
use scholarmind_core::ports::{CredentialStore, ResearchArchive};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub credentials: Arc<dyn CredentialStore>,
    pub archive: Arc<dyn ResearchArchive>,
    pub generator: Arc<ResearchGenerator>,
}
