use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four sensor quantities read off the serial monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    BodyTemp,
    Gsr,
    EnvTemp,
    Humidity,
}

impl Field {
    /// All fields in display order.
    pub const ALL: [Field; 4] = [Field::BodyTemp, Field::Gsr, Field::EnvTemp, Field::Humidity];

    /// Lower-case lookup key used when a field is requested by name.
    pub fn key(self) -> &'static str {
        match self {
            Field::BodyTemp => "body temp",
            Field::Gsr => "gsr",
            Field::EnvTemp => "env temp",
            Field::Humidity => "humidity",
        }
    }

    /// Label aliases recognized in OCR text, in match-priority order.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::BodyTemp => &["body temp", "temp", "temperature"],
            Field::Gsr => &["gsr"],
            Field::EnvTemp => &["env temp", "environment temp", "envtemperature"],
            Field::Humidity => &["humidity"],
        }
    }

    /// Name of the HTML form input / JSON key carrying this field.
    pub fn form_name(self) -> &'static str {
        match self {
            Field::BodyTemp => "body_temp",
            Field::Gsr => "gsr",
            Field::EnvTemp => "env_temp",
            Field::Humidity => "humidity",
        }
    }

    /// Axis label with unit, as shown under a chart bar.
    pub fn chart_label(self) -> &'static str {
        match self {
            Field::BodyTemp => "Body Temp (°C)",
            Field::Gsr => "GSR",
            Field::EnvTemp => "Env Temp (°C)",
            Field::Humidity => "Humidity (%)",
        }
    }

    /// Resolve a case-insensitive lookup key (`"Body Temp"`, `"gsr"`, ...).
    pub fn from_key(name: &str) -> Option<Field> {
        let name = name.trim().to_lowercase();
        Field::ALL.into_iter().find(|f| f.key() == name)
    }

    /// Resolve a form input name (`"body_temp"`, ...).
    pub fn from_form_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.form_name() == name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::BodyTemp => write!(f, "Body Temp"),
            Field::Gsr => write!(f, "GSR"),
            Field::EnvTemp => write!(f, "Env Temp"),
            Field::Humidity => write!(f, "Humidity"),
        }
    }
}

impl std::str::FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::from_key(s)
            .or_else(|| Field::from_form_name(s))
            .ok_or_else(|| format!("Unknown sensor field: '{s}'"))
    }
}
