use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use log::{error, info};

use crate::config::ServerConfig;
use crate::handlers;
use crate::model::SalaryModel;

/// Load the model and serve until shutdown. The artifact is loaded before
/// the port is bound, so a bad artifact means no listener ever comes up.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let model = match SalaryModel::load(&config.model_path) {
        Ok(model) => {
            info!(
                "model loaded from {} ({}, features: {})",
                config.model_path.display(),
                model.kind(),
                model.features().join(", ")
            );
            model
        }
        Err(err) => {
            error!(
                "failed to load model artifact {}: {err}",
                config.model_path.display()
            );
            return Err(err.into());
        }
    };

    let model = web::Data::new(model);
    let workers = config.workers;
    let address = config.bind_address();
    info!("listening on http://{address} with {workers} workers");

    HttpServer::new(move || {
        // The dashboard calls /predict from a browser context.
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(model.clone())
            .app_data(handlers::json_config())
            .configure(handlers::routes)
    })
    .workers(workers)
    .bind(address)?
    .run()
    .await?;

    Ok(())
}
