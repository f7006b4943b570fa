use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use relay_api_rest::{AllowedOrigins, RestServerConfig, RestServerRealIpConfig};
use relay_config::{Config, HttpConfig};
use relay_core_contact_impl::ContactFeatureConfig;
use relay_core_health_impl::HealthFeatureConfig;
use relay_shared_impl::rate_limit::RateLimitServiceConfig;
use tracing::{info, warn};
use types::{ContactFeature, Email, HealthFeature, RateLimit, RestServer, Template, Time};

pub mod types;

/// Wire all services of the api around the given email client.
pub fn build_rest_server(config: &Config, email: Email) -> anyhow::Result<RestServer> {
    let time = Time::default();
    let template = Template::new().context("Failed to load email templates")?;

    let rate_limit = RateLimit::new(
        time,
        RateLimitServiceConfig {
            window: config.rate_limit.window(),
            max_requests: config.rate_limit.max,
        },
    );

    let health = HealthFeature::new(
        time,
        email.clone(),
        HealthFeatureConfig {
            cache_ttl: config.health.cache_ttl(),
        },
    );

    let contact = ContactFeature::new(
        template,
        email,
        ContactFeatureConfig {
            recipient: config.email.user.clone().into(),
        },
    );

    Ok(RestServer::new(
        health,
        contact,
        rate_limit,
        rest_server_config(&config.http),
    ))
}

fn rest_server_config(config: &HttpConfig) -> RestServerConfig {
    let allowed_origins = AllowedOrigins::parse(&config.cors_origin);
    if allowed_origins == AllowedOrigins::default() {
        warn!("No allowed origins configured, browsers will not be able to submit messages");
    } else {
        info!(origins = %config.cors_origin, "Accepting requests from allowed origins");
    }

    RestServerConfig {
        addr: SocketAddr::new(config.host, config.port),
        allowed_origins: Arc::new(allowed_origins),
        real_ip_config: config.real_ip.as_ref().map(|real_ip| {
            Arc::new(RestServerRealIpConfig {
                header: real_ip.header.clone(),
                set_from: real_ip.set_from,
            })
        }),
    }
}
