use serde::{Deserialize, Serialize};

/// Three-point salary estimate derived from a single model prediction.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SalaryEstimate {
    pub min_salary: f64,
    pub mean_salary: f64,
    pub max_salary: f64,
}

impl SalaryEstimate {
    /// Spread a point estimate into a displayable range: the mean is the
    /// prediction itself, min and max sit 15% below and above it. Every
    /// value is rounded to two decimals.
    pub fn from_point(point: f64) -> Self {
        let mean = round2(point);
        SalaryEstimate {
            min_salary: round2(mean * 0.85),
            mean_salary: mean,
            max_salary: round2(mean * 1.15),
        }
    }
}

/// Half-away-from-zero rounding to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
}

/// Shape of the loaded artifact, reported by `GET /model` so clients can
/// discover which fields to send.
#[derive(Debug, Serialize)]
pub struct ModelDescription {
    pub kind: String,
    pub features: Vec<String>,
    pub target_transform: String,
}
