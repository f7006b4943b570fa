use relay_core_contact_impl::ContactFeatureServiceImpl;
use relay_core_health_impl::HealthFeatureServiceImpl;
use relay_email_impl::EmailServiceImpl;
use relay_shared_impl::{rate_limit::RateLimitServiceImpl, time::TimeServiceImpl};
use relay_templates_impl::TemplateServiceImpl;

// API
pub type RestServer = relay_api_rest::RestServer<HealthFeature, ContactFeature, RateLimit>;

// Email
pub type Email = EmailServiceImpl;

// Templates
pub type Template = TemplateServiceImpl;

// Shared
pub type Time = TimeServiceImpl;
pub type RateLimit = RateLimitServiceImpl<Time>;

// Core
pub type HealthFeature = HealthFeatureServiceImpl<Time, Email>;
pub type ContactFeature = ContactFeatureServiceImpl<Template, Email>;
