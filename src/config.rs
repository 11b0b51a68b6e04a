use std::env;
use std::path::PathBuf;

/// Runtime configuration, resolved from the environment. Each server binary
/// supplies its own defaults for the artifact path and port; `HOST`, `PORT`,
/// `WORKERS` and `MODEL_PATH` override them.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub model_path: PathBuf,
}

impl ServerConfig {
    pub fn from_env(default_model_path: &str, default_port: u16) -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(default_port);
        let workers = env::var("WORKERS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_else(num_cpus::get);
        let model_path = env::var("MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(default_model_path));

        ServerConfig {
            host,
            port,
            workers,
            model_path,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_address_joins_host_and_port() {
        let config = ServerConfig {
            host: "127.0.0.1".into(),
            port: 5001,
            workers: 2,
            model_path: PathBuf::from("model/salary_trees.json"),
        };
        assert_eq!(config.bind_address(), "127.0.0.1:5001");
    }
}
