use std::{
    future::Future,
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{extract::DefaultBodyLimit, Router};
use relay_core_contact_contracts::ContactFeatureService;
use relay_core_health_contracts::HealthFeatureService;
use relay_shared_contracts::rate_limit::RateLimitService;
use relay_utils::Apply;
use tokio::net::TcpListener;
use tracing::info;

pub use crate::middlewares::origin::{is_allowed_origin, AllowedOrigins};

mod errors;
mod middlewares;
mod models;
mod routes;

/// Maximum accepted size of a request body in bytes.
const BODY_LIMIT: usize = 100 * 1024;

#[derive(Debug, Clone)]
pub struct RestServer<Health, Contact, RateLimit> {
    health: Health,
    contact: Contact,
    rate_limit: RateLimit,
    config: RestServerConfig,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    pub addr: SocketAddr,
    pub allowed_origins: Arc<AllowedOrigins>,
    pub real_ip_config: Option<Arc<RestServerRealIpConfig>>,
}

/// Trust the client address found in `header`, but only for requests coming
/// from `set_from` (usually a reverse proxy).
#[derive(Debug)]
pub struct RestServerRealIpConfig {
    pub header: String,
    pub set_from: IpAddr,
}

impl<Health, Contact, RateLimit> RestServer<Health, Contact, RateLimit>
where
    Health: HealthFeatureService,
    Contact: ContactFeatureService,
    RateLimit: RateLimitService,
{
    pub fn new(
        health: Health,
        contact: Contact,
        rate_limit: RateLimit,
        config: RestServerConfig,
    ) -> Self {
        Self {
            health,
            contact,
            rate_limit,
            config,
        }
    }

    /// Serve the api until `shutdown` resolves.
    pub async fn serve(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let addr = self.config.addr;
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind to {addr}"))?;
        info!("Listening on {}", listener.local_addr()?);

        let router = self.router();
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(Into::into)
    }

    pub fn router(self) -> Router<()> {
        let RestServerConfig {
            allowed_origins,
            real_ip_config,
            ..
        } = self.config;

        Router::new()
            .merge(routes::health::router(self.health.into()))
            .merge(routes::contact::router(
                self.contact.into(),
                self.rate_limit.into(),
            ))
            .layer(DefaultBodyLimit::max(BODY_LIMIT))
            .apply(middlewares::panic_handler::add)
            .apply(middlewares::origin::add(allowed_origins))
            .apply(middlewares::trace::add)
            .apply(middlewares::request_id::add)
            .apply(middlewares::client_ip::add(real_ip_config))
    }
}
