use std::env;
use std::time::Duration;

use crate::error::{ProvisionError, Result};

/// bcrypt work factor used by the CRM backend when it creates users
pub const DEFAULT_BCRYPT_COST: u32 = 10;
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

#[derive(Debug, Clone)]
pub struct Config {
    pub default_email: String,
    pub first_name: String,
    pub last_name: String,
    pub container_runtime: String,
    pub db_container: String,
    pub db_user: String,
    pub db_name: String,
    pub bcrypt_cost: u32,
    pub login_url: String,
    pub client_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_email: "admin@phdstudio.com.br".to_string(),
            first_name: "Admin".to_string(),
            last_name: "PHD Studio".to_string(),
            container_runtime: "docker".to_string(),
            db_container: "phd-crm-db".to_string(),
            db_user: "phd_crm_user".to_string(),
            db_name: "phd_crm".to_string(),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            login_url: "https://phdstudio.com.br/admin".to_string(),
            client_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let bcrypt_cost: u32 = env::var("BCRYPT_COST")
            .unwrap_or_else(|_| defaults.bcrypt_cost.to_string())
            .parse()
            .map_err(|_| ProvisionError::Config("BCRYPT_COST must be a valid number".to_string()))?;
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&bcrypt_cost) {
            return Err(ProvisionError::Config(format!(
                "BCRYPT_COST must be between {} and {}",
                MIN_BCRYPT_COST, MAX_BCRYPT_COST
            )));
        }

        let client_timeout_secs: u64 = env::var("DB_CLIENT_TIMEOUT_SECS")
            .unwrap_or_else(|_| defaults.client_timeout.as_secs().to_string())
            .parse()
            .map_err(|_| {
                ProvisionError::Config("DB_CLIENT_TIMEOUT_SECS must be a valid number".to_string())
            })?;
        if client_timeout_secs == 0 {
            return Err(ProvisionError::Config(
                "DB_CLIENT_TIMEOUT_SECS must be at least 1".to_string(),
            ));
        }

        Ok(Config {
            default_email: env::var("ADMIN_DEFAULT_EMAIL").unwrap_or(defaults.default_email),
            first_name: env::var("ADMIN_FIRST_NAME").unwrap_or(defaults.first_name),
            last_name: env::var("ADMIN_LAST_NAME").unwrap_or(defaults.last_name),
            container_runtime: env::var("CONTAINER_RUNTIME")
                .unwrap_or(defaults.container_runtime),
            db_container: env::var("DB_CONTAINER").unwrap_or(defaults.db_container),
            db_user: env::var("DB_USER").unwrap_or(defaults.db_user),
            db_name: env::var("DB_NAME").unwrap_or(defaults.db_name),
            bcrypt_cost,
            login_url: env::var("ADMIN_LOGIN_URL").unwrap_or(defaults.login_url),
            client_timeout: Duration::from_secs(client_timeout_secs),
        })
    }
}
