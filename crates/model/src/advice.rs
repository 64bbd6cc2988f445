use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A short recommendation shown next to a predicted label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Advice {
    pub severity: Severity,
    pub message: &'static str,
}

impl Advice {
    const fn info(message: &'static str) -> Self {
        Self { severity: Severity::Info, message }
    }

    const fn warning(message: &'static str) -> Self {
        Self { severity: Severity::Warning, message }
    }
}

pub fn hydration_advice(label: &str) -> Advice {
    if label.to_lowercase().contains("dehydrated") {
        Advice::warning("Drink plenty of water and rest.")
    } else {
        Advice::info("Keep drinking water!")
    }
}

pub fn season_advice(label: &str) -> Advice {
    let label = label.to_lowercase();
    if label.contains("summer") {
        Advice::warning("It's hot! Stay cool and drink extra fluids.")
    } else if label.contains("winter") {
        Advice::info("Keep warm and monitor your hydration subtly.")
    } else {
        Advice::info("Moderate weather conditions. Stay balanced!")
    }
}
