use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A scalar as the service sent it.
///
/// The service has been seen sending temperatures both as numbers and as
/// numeric strings, and labels both as dates and as integers. The raw form is
/// kept so the chart shows exactly what the service sent. Deserializing a
/// `Datum` never fails: `null` and any other JSON value are kept as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Datum {
    Number(serde_json::Number),
    Text(String),
    Null,
    Other(serde_json::Value),
}

impl Datum {
    /// Numeric value, parsing string-encoded numbers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Null | Self::Other(_) => None,
        }
    }

    /// Text usable as a label. Only numbers and strings qualify.
    pub fn into_label(self) -> Option<String> {
        match self {
            Self::Number(n) => Some(n.to_string()),
            Self::Text(s) => Some(s),
            Self::Null | Self::Other(_) => None,
        }
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
            Self::Null => Ok(()),
            Self::Other(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for Datum {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for Datum {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

/// One temperature + timestamp sample.
///
/// The service does not guarantee either field (it answers `{}` before its
/// first upstream fetch), so both are optional. The body is not validated:
/// a field of the wrong type decodes as absent instead of failing the call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Reading {
    #[serde(default, deserialize_with = "lenient_temperature")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient_label")]
    pub timestamp: Option<String>,
}

fn lenient_temperature<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let datum = Datum::deserialize(deserializer)?;
    Ok(datum.as_f64())
}

fn lenient_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let datum = Datum::deserialize(deserializer)?;
    Ok(datum.into_label())
}

impl Reading {
    pub fn new(temperature: f64, timestamp: impl Into<String>) -> Self {
        Self {
            temperature: Some(temperature),
            timestamp: Some(timestamp.into()),
        }
    }
}

/// Daily history as parallel arrays aligned by index.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistorySeries {
    #[serde(default)]
    pub temperature: Vec<Datum>,
    #[serde(default)]
    pub timestamp: Vec<Datum>,
}

impl HistorySeries {
    /// `(label, value)` pairs in service order, up to the shorter array.
    pub fn points(&self) -> impl Iterator<Item = (&Datum, &Datum)> {
        self.timestamp.iter().zip(self.temperature.iter())
    }

    pub fn is_aligned(&self) -> bool {
        self.temperature.len() == self.timestamp.len()
    }
}

/// Body of `POST /save`. Unset fields are left out of the JSON entirely.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SavePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl From<&Reading> for SavePayload {
    fn from(reading: &Reading) -> Self {
        Self {
            temperature: reading.temperature,
            timestamp: reading.timestamp.clone(),
        }
    }
}
