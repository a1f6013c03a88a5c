// measure.rs

use serde_json::Value;

pub const FIELD_TEMPERATURE: &str = "temperature";
pub const FIELD_HUMIDITY: &str = "humidity";
pub const FIELD_THRESHOLD: &str = "threshold";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    pub temperature: f64,
    pub humidity: f64,
}

impl Measurement {
    pub fn new(temperature: f64, humidity: f64) -> Self {
        Measurement {
            temperature,
            humidity,
        }
    }

    /// Both fields must be present before either one is converted, so a
    /// missing field is reported even when the other one is malformed.
    pub fn from_json(body: &Value) -> Result<Self, MeasurementError> {
        let obj = body
            .as_object()
            .ok_or_else(|| MeasurementError::Body(describe(body)))?;

        let temperature = obj
            .get(FIELD_TEMPERATURE)
            .ok_or(MeasurementError::Missing(FIELD_TEMPERATURE))?;
        let humidity = obj
            .get(FIELD_HUMIDITY)
            .ok_or(MeasurementError::Missing(FIELD_HUMIDITY))?;

        Ok(Measurement {
            temperature: parse_number(FIELD_TEMPERATURE, temperature)?,
            humidity: parse_number(FIELD_HUMIDITY, humidity)?,
        })
    }
}

pub fn parse_threshold(body: &Value) -> Result<f64, MeasurementError> {
    let obj = body
        .as_object()
        .ok_or_else(|| MeasurementError::Body(describe(body)))?;
    let value = obj
        .get(FIELD_THRESHOLD)
        .ok_or(MeasurementError::Missing(FIELD_THRESHOLD))?;
    parse_number(FIELD_THRESHOLD, value)
}

/// Accepts JSON numbers, numeric strings and booleans (as 1.0 / 0.0).
pub fn parse_number(field: &'static str, value: &Value) -> Result<f64, MeasurementError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(MeasurementError::Parse {
            field,
            value: value.to_string(),
        }),
    }
}

fn describe(body: &Value) -> String {
    match body {
        Value::Null => "null".into(),
        Value::Bool(_) => "boolean".into(),
        Value::Number(_) => "number".into(),
        Value::String(_) => "string".into(),
        Value::Array(_) => "array".into(),
        Value::Object(_) => "object".into(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MeasurementError {
    /// Required field not present in the request body.
    #[error("missing field {0:?}")]
    Missing(&'static str),

    #[error("could not convert {field} value {value} to a number")]
    Parse { field: &'static str, value: String },

    #[error("expected a JSON object, got {0}")]
    Body(String),
}

impl MeasurementError {
    pub fn is_missing(&self) -> bool {
        matches!(self, MeasurementError::Missing(_))
    }
}


// EOF
