//! makemyad REST API Server
//!
//! Run with: cargo run --features server --bin makemyad-server
//!
//! Endpoints:
//!   GET    /health                 - Health check
//!   GET    /categories             - Browse taxonomy
//!   GET    /roles/hierarchy        - Role levels
//!   GET    /ads                    - Filtered ad listing
//!   GET    /ads/:id                - Ad details
//!   POST   /ads                    - Post an ad (ads:create)
//!   PUT    /ads/:id                - Edit an ad (owner or ads:update)
//!   DELETE /ads/:id                - Delete an ad (owner or ads:delete)
//!   GET    /me                     - Current user
//!   PUT    /me                     - Edit own profile (not role/active)
//!   GET    /me/permissions         - Current user's capabilities
//!   GET    /admin/dashboard        - Admin statistics (role admin)
//!   GET    /admin/users            - Filtered users (users:manage)
//!   POST   /admin/users            - Create user
//!   PUT    /admin/users/:id        - Edit user
//!   DELETE /admin/users/:id        - Delete user
//!   GET    /admin/roles            - Filtered roles (roles:manage)
//!   POST   /admin/roles            - Create role
//!   PUT    /admin/roles/:id        - Edit role
//!   DELETE /admin/roles/:id        - Delete role
//!   GET    /admin/permissions      - Permission catalog

use clap::Parser;
use tracing_subscriber::EnvFilter;

use makemyad::config::ServerConfig;
use makemyad::server::{router, AppState};
use makemyad::{seed, Marketplace};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = ServerConfig::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let market = if config.no_seed {
        tracing::info!("starting with an empty marketplace");
        Marketplace::new()
    } else {
        seed::marketplace()
    };

    let app = router(AppState::new(market));

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("makemyad-server v{} listening on {}", env!("CARGO_PKG_VERSION"), addr);
    axum::serve(listener, app).await?;
    Ok(())
}
