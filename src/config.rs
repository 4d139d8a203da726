use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub tasks: TasksConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared secret of the identity provider that signs user tokens (HS256).
    pub jwt_secret: String,
    #[serde(default = "default_jwt_audience")]
    pub jwt_audience: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Master switch for the background sweeps.
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_meeting_sweep_interval")]
    pub meeting_sweep_interval: u64, // seconds
    #[serde(default = "default_membership_sweep_interval")]
    pub membership_sweep_interval: u64, // seconds
    #[serde(default = "default_expiry_warning_days")]
    pub expiry_warning_days: i64,
}

fn default_jwt_audience() -> String {
    "authenticated".to_string()
}

fn default_meeting_sweep_interval() -> u64 {
    3600
}

fn default_membership_sweep_interval() -> u64 {
    86_400
}

fn default_expiry_warning_days() -> i64 {
    7
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            meeting_sweep_interval: default_meeting_sweep_interval(),
            membership_sweep_interval: default_membership_sweep_interval(),
            expiry_warning_days: default_expiry_warning_days(),
        }
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // Try the config file first; fall back to environment-only config.
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                // File present: parse it, then let env vars override below.
                toml::from_str(&config_str).map_err(|e| format!("failed to parse config: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // No file: build from env vars and defaults.
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                // The database URL has no sensible default.
                let database_url = get_env("DATABASE_URL")
                    .ok_or("DATABASE_URL is not set and no config.toml was found")?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    auth: AuthConfig {
                        jwt_secret: get_env("SUPABASE_JWT_SECRET")
                            .unwrap_or_else(|| "change-me-in-production".to_string()),
                        jwt_audience: get_env("SUPABASE_JWT_AUDIENCE")
                            .unwrap_or_else(default_jwt_audience),
                    },
                    tasks: TasksConfig {
                        enabled: get_env_parse("TASKS_ENABLED", false),
                        meeting_sweep_interval: get_env_parse(
                            "MEETING_SWEEP_INTERVAL",
                            default_meeting_sweep_interval(),
                        ),
                        membership_sweep_interval: get_env_parse(
                            "MEMBERSHIP_SWEEP_INTERVAL",
                            default_membership_sweep_interval(),
                        ),
                        expiry_warning_days: get_env_parse(
                            "MEMBERSHIP_EXPIRY_WARNING_DAYS",
                            default_expiry_warning_days(),
                        ),
                    },
                }
            }
            Err(e) => {
                return Err(format!("failed to read config file {config_path}: {e}").into());
            }
        };

        // Env vars override file values when both are present.
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            config.database.max_connections = mc;
        }
        if let Ok(v) = env::var("SUPABASE_JWT_SECRET") {
            config.auth.jwt_secret = v;
        }
        if let Ok(v) = env::var("SUPABASE_JWT_AUDIENCE") {
            config.auth.jwt_audience = v;
        }
        if let Ok(v) = env::var("TASKS_ENABLED")
            && let Ok(b) = v.parse()
        {
            config.tasks.enabled = b;
        }
        if let Ok(v) = env::var("MEETING_SWEEP_INTERVAL")
            && let Ok(n) = v.parse()
        {
            config.tasks.meeting_sweep_interval = n;
        }
        if let Ok(v) = env::var("MEMBERSHIP_SWEEP_INTERVAL")
            && let Ok(n) = v.parse()
        {
            config.tasks.membership_sweep_interval = n;
        }
        if let Ok(v) = env::var("MEMBERSHIP_EXPIRY_WARNING_DAYS")
            && let Ok(n) = v.parse()
        {
            config.tasks.expiry_warning_days = n;
        }

        Ok(config)
    }
}
