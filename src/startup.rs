//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;

use crate::application::services::{AuthService, ChatService, SessionGate, TokenService};
use crate::config::Settings;
use crate::infrastructure::database;
use crate::infrastructure::repositories::{
    PgChatRepository, PgMessageRepository, PgUserRepository,
};
use crate::presentation::http::routes;
use crate::presentation::websocket::RoomRegistry;
use crate::shared::snowflake::SnowflakeGenerator;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub snowflake: Arc<SnowflakeGenerator>,
    pub registry: Arc<RoomRegistry>,
    pub gate: SessionGate,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Authentication service over the live database.
    pub fn auth_service(&self) -> AuthService<PgUserRepository> {
        AuthService::new(
            Arc::new(PgUserRepository::new(self.db.clone())),
            self.gate.token_service().clone(),
            self.snowflake.clone(),
        )
    }

    /// Chat directory service over the live database.
    pub fn chat_service(
        &self,
    ) -> ChatService<PgUserRepository, PgChatRepository, PgMessageRepository> {
        ChatService::new(
            Arc::new(PgUserRepository::new(self.db.clone())),
            Arc::new(PgChatRepository::new(self.db.clone())),
            Arc::new(PgMessageRepository::new(self.db.clone())),
            self.snowflake.clone(),
        )
    }
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        let db = database::create_pool(&settings.database).await?;
        tracing::info!("Database connection pool created");

        database::run_migrations(&db).await?;
        tracing::info!("Database migrations applied");

        let snowflake = Arc::new(SnowflakeGenerator::new(settings.snowflake.machine_id as u64));
        let gate = SessionGate::new(TokenService::new(settings.jwt.clone()));
        let registry = Arc::new(RoomRegistry::new());

        let state = AppState {
            db,
            snowflake,
            registry,
            gate,
            settings: Arc::new(settings.clone()),
        };

        let router = routes::create_router(state);

        let addr: SocketAddr = settings.server_addr().parse()?;
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", addr);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}
