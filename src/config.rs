use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::AppError;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub seed_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        Self::from_values(env::var("BIND_ADDR").ok(), env::var("SEED_PATH").ok())
    }

    fn from_values(bind_addr: Option<String>, seed_path: Option<String>) -> Result<Self, AppError> {
        let raw_addr = bind_addr.unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("BIND_ADDR {} is not a socket address: {}", raw_addr, e)))?;

        let seed_path = seed_path.filter(|p| !p.trim().is_empty()).map(PathBuf::from);

        Ok(Self { bind_addr, seed_path })
    }
}
