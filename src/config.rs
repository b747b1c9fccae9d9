use anyhow::{Context, Result};
use clap::Parser;
use std::env;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Base URL of the record registry (content-object store).
    pub registry_url: String,
    /// Base URL of the coverstore image service.
    pub coverstore_url: String,
    /// Base URL of the search backend.
    pub search_url: String,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Library catalog view API")]
pub struct Args {
    /// Host to bind to (overrides CATALOG_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides CATALOG_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Record registry base URL (overrides CATALOG_REGISTRY_URL)
    #[arg(long)]
    pub registry_url: Option<String>,

    /// Coverstore base URL (overrides CATALOG_COVERSTORE_URL)
    #[arg(long)]
    pub coverstore_url: Option<String>,

    /// Search backend base URL (overrides CATALOG_SEARCH_URL)
    #[arg(long)]
    pub search_url: Option<String>,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        // Parse CLI once
        let args = Args::parse();

        // --- Environment fallback ---
        let env_host = env::var("CATALOG_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match env::var("CATALOG_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing CATALOG_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 3000,
            Err(err) => return Err(err).context("reading CATALOG_PORT"),
        };
        let env_registry = env::var("CATALOG_REGISTRY_URL")
            .unwrap_or_else(|_| "http://localhost:8080".into());
        let env_coverstore = env::var("CATALOG_COVERSTORE_URL")
            .unwrap_or_else(|_| "http://localhost:8081".into());
        let env_search =
            env::var("CATALOG_SEARCH_URL").unwrap_or_else(|_| "http://localhost:8983".into());

        // --- Merge ---
        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            registry_url: args.registry_url.unwrap_or(env_registry),
            coverstore_url: args.coverstore_url.unwrap_or(env_coverstore),
            search_url: args.search_url.unwrap_or(env_search),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
