use std::sync::Arc;

use agora_auth::TokenService;
use agora_authz::Engine;
use agora_db::{JsonMessageStore, SocialDb};
use agora_messenger::MessengerService;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Arc<SocialDb>,
    pub tokens: TokenService,
    pub engine: Engine,
    pub messenger: MessengerService,
}

impl AppStateInner {
    /// Wires both stores into the authorization engine and the messenger
    /// service once at startup; everything downstream shares these handles.
    pub fn new(db: Arc<SocialDb>, docs: Arc<JsonMessageStore>, tokens: TokenService) -> AppState {
        let engine = Engine::new(db.clone(), docs.clone());
        let messenger = MessengerService::new(db.clone(), docs, db.clone());
        Arc::new(Self {
            db,
            tokens,
            engine,
            messenger,
        })
    }
}
