use salary_backend::config::ServerConfig;
use salary_backend::server;

const DEFAULT_MODEL_PATH: &str = "model/salary_trees.json";
const DEFAULT_PORT: u16 = 5001;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    server::run(ServerConfig::from_env(DEFAULT_MODEL_PATH, DEFAULT_PORT)).await
}
