//! Server configuration from environment variables, with logged fallbacks

use std::env;
use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP listener binds to
    pub listen_addr: SocketAddr,
    /// Snapshot file; `None` keeps everything in memory
    pub data_path: Option<PathBuf>,
    /// Origin allowed by CORS; permissive when unset
    pub allowed_origin: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        Self {
            listen_addr: try_load("CHAPTER_LISTEN", SocketAddr::from(([0, 0, 0, 0], 8000))),
            data_path: Some(PathBuf::from(try_load(
                "CHAPTER_DATA",
                "data/chapter.json".to_string(),
            ))),
            allowed_origin: env::var("CHAPTER_ALLOWED_ORIGIN").ok(),
        }
    }
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Ok(raw) = env::var(key) else {
        info!("{key} not set, using default: {default}");
        return default;
    };
    match raw.parse() {
        Ok(value) => value,
        Err(e) => {
            warn!("Invalid {key} value {raw:?}: {e}; using default: {default}");
            default
        }
    }
}
