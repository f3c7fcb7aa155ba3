//! Application configuration
//!
//! This module provides centralized configuration management using the `config` crate.
//! Configuration can be loaded from environment variables and config files.
//!
//! The gateway endpoint and shared token are required: loading fails when
//! either is absent, so a misconfigured deployment dies at startup instead of
//! discovering the problem mid-request.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::models::{DiscountPolicy, PricingTable};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
    pub promo: PromoConfig,
    pub pricing: PricingTable,
    pub discount: DiscountPolicy,
}

/// HTTP server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of worker threads
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_workers() -> usize {
    num_cpus::get()
}

/// Calendar gateway configuration
///
/// `base_url` and `token` have no defaults on purpose: both come from the
/// external configuration collaborator and their absence is a fatal startup
/// error.
#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    /// Base endpoint of the external calendar authority
    pub base_url: String,

    /// Pre-shared token sent with every gateway request
    pub token: String,

    /// Per-call timeout in seconds
    #[serde(default = "default_gateway_timeout")]
    pub timeout_secs: u64,
}

fn default_gateway_timeout() -> u64 {
    7
}

/// Promo state store configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PromoConfig {
    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

impl AppConfig {
    /// Load configuration from environment and optional config file
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.workers", num_cpus::get() as i64)?
            .set_default("gateway.timeout_secs", 7)?
            .set_default("promo.redis_url", "redis://127.0.0.1:6379")?
            // Studio price list defaults (whole currency units)
            .set_default("pricing.session_2h", 250)?
            .set_default("pricing.session_4h", 400)?
            .set_default("pricing.session_8h", 700)?
            .set_default("pricing.session_day", 900)?
            .set_default("pricing.session_week", 3500)?
            .set_default("pricing.per_reel", 50)?
            .set_default("pricing.per_photo", 10)?
            .set_default("pricing.monthly_starter", 1200)?
            .set_default("pricing.monthly_growth", 2000)?
            .set_default("pricing.monthly_pro", 3200)?
            .set_default("pricing.social_management", 400)?
            .set_default("pricing.targeting_setup", 150)?
            .set_default("pricing.currency_symbol", "\u{20ac}")?
            .set_default("discount.enabled", true)?
            .set_default("discount.percent", 10)?
            .set_default("discount.label", "First order discount")?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables with ATELIER_ prefix
            .add_source(
                Environment::with_prefix("ATELIER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("ATELIER").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Get the server bind address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
