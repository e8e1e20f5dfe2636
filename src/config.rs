use std::env;
use anyhow::{Context, Result, bail};

/// Which key/value store the proxy forwards to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Cloudflare Workers KV, reached over its REST API.
    Cloudflare {
        account_id: String,
        namespace_id: String,
        api_token: String,
    },
    /// In-process store for local development and tests.
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub proxy_secret: String,
    pub backend: StoreBackend,
    pub service_port: u16,
    pub service_host: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup. `from_env` wires in
    /// the process environment; tests inject a map instead.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let proxy_secret = lookup("PROXY_SECRET")
            .context("PROXY_SECRET environment variable is required")?;

        let backend = match lookup("KV_BACKEND").as_deref() {
            None | Some("cloudflare") => StoreBackend::Cloudflare {
                account_id: lookup("CLOUDFLARE_ACCOUNT_ID")
                    .context("CLOUDFLARE_ACCOUNT_ID environment variable is required")?,
                namespace_id: lookup("CLOUDFLARE_NAMESPACE_ID")
                    .context("CLOUDFLARE_NAMESPACE_ID environment variable is required")?,
                api_token: lookup("CLOUDFLARE_API_TOKEN")
                    .context("CLOUDFLARE_API_TOKEN environment variable is required")?,
            },
            Some("memory") => StoreBackend::Memory,
            Some(other) => bail!("KV_BACKEND must be 'cloudflare' or 'memory', got '{other}'"),
        };

        let service_port = lookup("SERVICE_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = lookup("SERVICE_HOST")
            .unwrap_or_else(|| "0.0.0.0".to_string());

        Ok(Config {
            proxy_secret,
            backend,
            service_port,
            service_host,
        })
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        match &self.backend {
            StoreBackend::Cloudflare { account_id, namespace_id, .. } => {
                tracing::info!("  Store backend: Cloudflare KV");
                tracing::info!("  Cloudflare account: {account_id}");
                tracing::info!("  Cloudflare namespace: {namespace_id}");
            }
            StoreBackend::Memory => {
                tracing::info!("  Store backend: in-memory (non-durable)");
            }
        }
        tracing::info!("  Service listening on: {}:{}", self.service_host, self.service_port);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        move |name| map.get(name).map(|v| (*v).to_string())
    }

    #[test]
    fn test_config_with_all_vars() {
        let config = Config::from_lookup(lookup_from(&[
            ("PROXY_SECRET", "hunter2"),
            ("KV_BACKEND", "cloudflare"),
            ("CLOUDFLARE_ACCOUNT_ID", "acct"),
            ("CLOUDFLARE_NAMESPACE_ID", "ns"),
            ("CLOUDFLARE_API_TOKEN", "token"),
            ("SERVICE_PORT", "8080"),
            ("SERVICE_HOST", "127.0.0.1"),
        ]))
        .unwrap();

        assert_eq!(config.proxy_secret, "hunter2");
        assert_eq!(
            config.backend,
            StoreBackend::Cloudflare {
                account_id: "acct".to_string(),
                namespace_id: "ns".to_string(),
                api_token: "token".to_string(),
            }
        );
        assert_eq!(config.service_port, 8080);
        assert_eq!(config.service_host, "127.0.0.1");
    }

    #[test]
    fn test_config_with_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("PROXY_SECRET", "hunter2"),
            ("CLOUDFLARE_ACCOUNT_ID", "acct"),
            ("CLOUDFLARE_NAMESPACE_ID", "ns"),
            ("CLOUDFLARE_API_TOKEN", "token"),
        ]))
        .unwrap();

        assert!(matches!(config.backend, StoreBackend::Cloudflare { .. }));
        assert_eq!(config.service_port, 3000);
        assert_eq!(config.service_host, "0.0.0.0");
    }

    #[test]
    fn test_memory_backend_needs_no_cloudflare_vars() {
        let config = Config::from_lookup(lookup_from(&[
            ("PROXY_SECRET", "hunter2"),
            ("KV_BACKEND", "memory"),
        ]))
        .unwrap();

        assert_eq!(config.backend, StoreBackend::Memory);
    }

    #[test]
    fn test_missing_secret() {
        let result = Config::from_lookup(lookup_from(&[("KV_BACKEND", "memory")]));
        assert!(result.is_err());
        let error = result.unwrap_err();
        assert!(error.to_string().contains("PROXY_SECRET"));
    }

    #[test]
    fn test_missing_cloudflare_var() {
        let result = Config::from_lookup(lookup_from(&[
            ("PROXY_SECRET", "hunter2"),
            ("CLOUDFLARE_ACCOUNT_ID", "acct"),
            ("CLOUDFLARE_NAMESPACE_ID", "ns"),
        ]));
        assert!(result.is_err());
        let error = result.unwrap_err();
        assert!(error.to_string().contains("CLOUDFLARE_API_TOKEN"));
    }

    #[test]
    fn test_unknown_backend() {
        let result = Config::from_lookup(lookup_from(&[
            ("PROXY_SECRET", "hunter2"),
            ("KV_BACKEND", "redis"),
        ]));
        assert!(result.is_err());
        let error = result.unwrap_err();
        assert!(error.to_string().contains("KV_BACKEND"));
    }

    #[test]
    fn test_invalid_port() {
        let result = Config::from_lookup(lookup_from(&[
            ("PROXY_SECRET", "hunter2"),
            ("KV_BACKEND", "memory"),
            ("SERVICE_PORT", "not-a-number"),
        ]));
        assert!(result.is_err());
        let error = result.unwrap_err();
        assert!(error.to_string().contains("SERVICE_PORT"));
    }

    #[test]
    fn test_port_out_of_range() {
        let result = Config::from_lookup(lookup_from(&[
            ("PROXY_SECRET", "hunter2"),
            ("KV_BACKEND", "memory"),
            ("SERVICE_PORT", "99999"),
        ]));
        assert!(result.is_err());
    }
}
