use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use agora_api::AppStateInner;
use agora_auth::{TokenKey, TokenService};
use agora_db::{JsonMessageStore, SocialDb};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agora=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let host = std::env::var("AGORA_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("AGORA_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let db_path = std::env::var("AGORA_DB_PATH").unwrap_or_else(|_| "agora.db".into());
    let msg_path = std::env::var("AGORA_MSG_PATH").unwrap_or_else(|_| "agora-messages".into());
    let ttl_secs: u64 = std::env::var("AGORA_TOKEN_TTL_SECS")
        .unwrap_or_else(|_| "86400".into())
        .parse()?;

    // Signing key: taken from the environment, or ephemeral for dev runs
    // (every restart then invalidates all outstanding tokens).
    let key = match std::env::var("AGORA_TOKEN_KEY") {
        Ok(encoded) => TokenKey::from_base64(&encoded)?,
        Err(_) => {
            info!("AGORA_TOKEN_KEY not set, using an ephemeral key");
            TokenKey::generate()
        }
    };
    info!("token key fingerprint {}", key.fingerprint());
    let tokens = TokenService::new(&key, Duration::from_secs(ttl_secs));

    // Init stores
    let db = Arc::new(SocialDb::open(&PathBuf::from(&db_path))?);
    let docs = Arc::new(JsonMessageStore::open(&msg_path)?);

    // Optional admin bootstrap
    if let Ok(username) = std::env::var("AGORA_ADMIN") {
        if db.promote_admin(&username)? {
            info!("promoted {} to administrator", username);
        }
    }

    // Shared state and routes
    let state = AppStateInner::new(db, docs, tokens);
    let app = agora_api::router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Agora server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
