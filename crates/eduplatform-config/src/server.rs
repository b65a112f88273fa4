use crate::{ConfigError, env_lookup, non_empty};

pub const DEFAULT_PORT: u16 = 5001;

#[derive(Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub database_url: String,
}

// Connection strings carry credentials.
impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("port", &self.port)
            .field("database_url", &"<redacted>")
            .finish()
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match non_empty(&lookup, "PORT") {
            None => DEFAULT_PORT,
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value: raw })?,
        };

        let database_url =
            non_empty(&lookup, "DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self { port, database_url })
    }
}
