//! Shared pipeline data types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A named quantitative metric extracted from a document.
///
/// The value segment always contains a digit, `$`, or `%`. `grounded` records
/// whether the name or one of the value's numbers was found in the source
/// text; metrics from the non-AI pattern sweep are exempt from grounding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metric {
    pub name: String,
    pub value: String,
    pub grounded: bool,
}

impl Metric {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            grounded: false,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

/// Chart type for a plot spec. Unrecognized input coerces to `Bar`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
    Pie,
}

impl ChartType {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "line" => Self::Line,
            "pie" => Self::Pie,
            _ => Self::Bar,
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bar => write!(f, "bar"),
            Self::Line => write!(f, "line"),
            Self::Pie => write!(f, "pie"),
        }
    }
}

/// A validated, renderable chart description.
///
/// `labels` and `values` are always equal in length, with 2 to 6 entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotSpec {
    pub title: String,
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub labels: Vec<String>,
    pub values: Vec<i64>,
}
