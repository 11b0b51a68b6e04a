use std::collections::HashMap;

use actix_web::{web, HttpResponse};
use log::debug;
use serde_json::Value;

use crate::error::ServiceError;
use crate::model::SalaryModel;
use crate::models::{HealthStatus, ModelDescription, SalaryEstimate};

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/predict").route(web::post().to(predict)))
        .service(web::resource("/health").route(web::get().to(health)))
        .service(web::resource("/model").route(web::get().to(model_info)));
}

/// JSON extractor tuned so payload problems surface through
/// [`ServiceError`] instead of actix's default error body.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| ServiceError::Inference(err.to_string()).into())
}

pub async fn predict(
    model: web::Data<SalaryModel>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ServiceError> {
    let row = validate(&model, &payload)?;
    let point = model.point_estimate(&row);
    debug!("point estimate {point:.2}");
    Ok(HttpResponse::Ok().json(SalaryEstimate::from_point(point)))
}

/// Check that every field the model requires is present and string-valued.
/// The model is only invoked on a fully validated row.
fn validate<'a>(
    model: &'a SalaryModel,
    payload: &'a Value,
) -> Result<HashMap<&'a str, &'a str>, ServiceError> {
    let object = payload
        .as_object()
        .ok_or_else(|| ServiceError::Inference("request body must be a JSON object".into()))?;

    let mut row = HashMap::with_capacity(model.features().len());
    for name in model.features() {
        let value = object.get(name).ok_or(ServiceError::MissingFields)?;
        let value = value
            .as_str()
            .ok_or_else(|| ServiceError::Inference(format!("field `{name}` must be a string")))?;
        row.insert(name.as_str(), value);
    }
    Ok(row)
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthStatus {
        status: "healthy".to_string(),
    })
}

pub async fn model_info(model: web::Data<SalaryModel>) -> HttpResponse {
    HttpResponse::Ok().json(ModelDescription {
        kind: model.kind().to_string(),
        features: model.features().to_vec(),
        target_transform: model.target_transform().name().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MODEL: &str = r#"{
        "schema_version": 1,
        "kind": "tree_ensemble",
        "features": ["category", "type"],
        "encoders": {
            "category": {"values": {}, "default": 3500.0},
            "type": {"values": {}, "default": 3300.0}
        },
        "bias": 3000.0,
        "trees": [{"splits": [{"feature": 0, "border": 0.0}], "leaves": [0.0, 500.0]}]
    }"#;

    fn model() -> SalaryModel {
        SalaryModel::from_json(MODEL).unwrap()
    }

    #[test]
    fn validation_rejects_missing_fields_before_inference() {
        let payload = json!({"category": "Accounting"});
        let err = validate(&model(), &payload).unwrap_err();
        assert!(matches!(err, ServiceError::MissingFields));
    }

    #[test]
    fn validation_rejects_non_string_values() {
        let payload = json!({"category": "Accounting", "type": 7});
        let err = validate(&model(), &payload).unwrap_err();
        assert!(matches!(err, ServiceError::Inference(_)));
        assert!(err.to_string().contains("type"));
    }

    #[test]
    fn validation_rejects_non_object_payloads() {
        let payload = json!(["category", "type"]);
        assert!(validate(&model(), &payload).is_err());
    }

    #[test]
    fn extra_fields_are_ignored() {
        let model = model();
        let payload = json!({"category": "Accounting", "type": "Full time", "note": "hi"});
        let row = validate(&model, &payload).unwrap();
        assert_eq!(row.len(), 2);
        assert_eq!(row["category"], "Accounting");
    }
}
