use crate::{env_lookup, non_empty};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<String>),
}

#[derive(Clone, Debug)]
pub struct CorsConfig {
    pub allowed_origins: AllowedOrigins,
}

impl CorsConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    /// `CORS_ALLOWED_ORIGINS` is either `*` or a comma separated list.
    /// Unset means any origin.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let allowed_origins = match non_empty(&lookup, "CORS_ALLOWED_ORIGINS") {
            None => AllowedOrigins::Any,
            Some(raw) if raw == "*" => AllowedOrigins::Any,
            Some(raw) => {
                let origins: Vec<String> = raw
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                if origins.is_empty() {
                    AllowedOrigins::Any
                } else {
                    AllowedOrigins::List(origins)
                }
            }
        };

        Self { allowed_origins }
    }
}
