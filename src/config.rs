use serde::Deserialize;

/// Fixed production host of the remote lead service.
pub const DEFAULT_BASE_URL: &str = "https://backend-ingressar.onrender.com";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub metropole_base_url: String,
    pub tenant_id: i64,
    pub default_product: String,
    pub products_path: String,
    pub signout_redirect_url: String,
    pub signout_clear_keys: Vec<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            metropole_base_url: std::env::var("METROPOLE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            tenant_id: std::env::var("METROPOLE_TENANT_ID")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("METROPOLE_TENANT_ID must be a valid integer"))?,
            default_product: std::env::var("METROPOLE_DEFAULT_PRODUCT")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "shalomconsorcios".to_string()),
            products_path: std::env::var("CRM_PRODUCTS_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "crm-products.json".to_string()),
            signout_redirect_url: std::env::var("SIGNOUT_REDIRECT_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "https://dashboard.levamidia.com.br".to_string()),
            signout_clear_keys: std::env::var("SIGNOUT_CLEAR_KEYS")
                .unwrap_or_else(|_| "crm-products".to_string())
                .split(',')
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect(),
        };

        for (name, value) in [
            ("METROPOLE_BASE_URL", &config.metropole_base_url),
            ("SIGNOUT_REDIRECT_URL", &config.signout_redirect_url),
        ] {
            let parsed = url::Url::parse(value)
                .map_err(|e| anyhow::anyhow!("{} is not a valid URL: {}", name, e))?;
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                anyhow::bail!("{} must start with http:// or https://", name);
            }
        }

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Metropole base URL: {}", config.metropole_base_url);
        tracing::debug!("Tenant: {}", config.tenant_id);
        tracing::debug!("Default product: {}", config.default_product);
        tracing::debug!("Products path: {}", config.products_path);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}
