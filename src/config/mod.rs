use std::collections::HashMap;
use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },

    #[error("Unknown credential type: {0}")]
    UnknownCredentialType(String),

    #[error("Credential source is 'vault' but no secret store is configured")]
    VaultUnavailable,

    #[error("Invalid table name: {0}")]
    InvalidTableName(String),

    #[error("Secret store error for '{name}': {message}")]
    SecretStore { name: String, message: String },
}

/// Where configuration values come from, selected by the CREDENTIAL_TYPE
/// environment variable. An unrecognized value is a validation error rather
/// than a silent fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Env,
    Vault,
}

impl CredentialSource {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_value(env::var("CREDENTIAL_TYPE").ok().as_deref())
    }

    fn from_value(value: Option<&str>) -> Result<Self, ConfigError> {
        match value {
            None | Some("env") => Ok(Self::Env),
            Some("vault") | Some("cloud") => Ok(Self::Vault),
            Some(other) => Err(ConfigError::UnknownCredentialType(other.to_string())),
        }
    }
}

/// Seam for external secret vaults. The vault client itself is an external
/// collaborator; only this trait is modeled here.
pub trait SecretStore {
    fn get_secret(&self, name: &str) -> Result<String, ConfigError>;
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub table_name: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: String,
    pub expiration_secs: i64,
}

/// Every key the settings read, lowercase. Env vars use the uppercase form;
/// vault secret names map onto these with `-` replaced by `_`.
const SETTING_KEYS: [&str; 9] = [
    "db_user",
    "db_password",
    "db_host",
    "db_port",
    "db_name",
    "db_table_name",
    "jwt_secret",
    "jwt_algorithm",
    "jwt_token_expiration",
];

impl Settings {
    /// Load settings from the source selected by CREDENTIAL_TYPE.
    ///
    /// `store` is the vault seam; requesting the vault source without one
    /// wired is a configuration error.
    pub fn load(store: Option<&dyn SecretStore>) -> Result<Self, ConfigError> {
        match CredentialSource::from_env()? {
            CredentialSource::Env => Self::from_env(),
            CredentialSource::Vault => {
                let store = store.ok_or(ConfigError::VaultUnavailable)?;
                Self::from_secret_store(store)
            }
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        for key in SETTING_KEYS {
            if let Ok(value) = env::var(key.to_uppercase()) {
                values.insert(key.to_string(), value);
            }
        }
        Self::from_map(&values)
    }

    /// Fetch the secrets named in the VAULT_SECRETS env var (a JSON list)
    /// and build settings from them. Secret names use `-` where setting
    /// keys use `_`.
    pub fn from_secret_store(store: &dyn SecretStore) -> Result<Self, ConfigError> {
        let raw = env::var("VAULT_SECRETS").map_err(|_| ConfigError::MissingVar("VAULT_SECRETS"))?;
        let names: Vec<String> =
            serde_json::from_str(&raw).map_err(|_| ConfigError::InvalidValue {
                var: "VAULT_SECRETS",
                value: raw.clone(),
            })?;

        let mut values = HashMap::new();
        for name in names {
            let value = store.get_secret(&name)?;
            values.insert(name.replace('-', "_"), value);
        }
        Self::from_map(&values)
    }

    fn from_map(values: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            values.get(key).cloned().ok_or(ConfigError::MissingVar(key))
        };

        let port_raw = required("db_port")?;
        let port: u16 = port_raw.parse().map_err(|_| ConfigError::InvalidValue {
            var: "db_port",
            value: port_raw.clone(),
        })?;

        let table_name = values
            .get("db_table_name")
            .cloned()
            .unwrap_or_else(|| "items".to_string());
        validate_table_name(&table_name)?;

        let expiration_secs = match values.get("jwt_token_expiration") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                var: "jwt_token_expiration",
                value: raw.clone(),
            })?,
            None => 600,
        };

        Ok(Self {
            database: DatabaseConfig {
                user: required("db_user")?,
                password: required("db_password")?,
                host: required("db_host")?,
                port,
                name: required("db_name")?,
                table_name,
            },
            jwt: JwtConfig {
                secret: required("jwt_secret")?,
                algorithm: values
                    .get("jwt_algorithm")
                    .cloned()
                    .unwrap_or_else(|| "HS256".to_string()),
                expiration_secs,
            },
        })
    }
}

/// Table names end up interpolated into SQL, so restrict them to plain
/// identifiers at load time.
fn validate_table_name(name: &str) -> Result<(), ConfigError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidTableName(name.to_string()))
    }
}
