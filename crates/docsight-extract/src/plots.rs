//! Plot data synthesis — pipe-delimited chart specs parsed defensively,
//! with deterministic keyword charts as the fallback.
//!
//! The model is asked for `Title|type|label1,label2,...|value1,value2,...`
//! rows. The grammar is tiny but the upstream is unreliable, so every field
//! is validated before a spec is accepted.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::gateway::GenerationGateway;
use crate::types::{ChartType, PlotSpec};

const MAX_PLOTS: usize = 2;

/// Weights for the fallback bar chart of top keywords.
const BAR_WEIGHTS: [i64; 5] = [20, 15, 12, 10, 8];
/// Weights for the fallback pie chart of top keywords.
const PIE_WEIGHTS: [i64; 4] = [30, 25, 25, 20];

static FIRST_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());

/// Produce up to 2 chart specs for the analysis results.
pub async fn generate_plot_data(
    gateway: &GenerationGateway,
    keywords: &[String],
    metrics: &[String],
) -> Vec<PlotSpec> {
    let topics = if keywords.is_empty() {
        "General business data".to_string()
    } else {
        keywords.iter().take(5).cloned().collect::<Vec<_>>().join(", ")
    };
    let metrics_context = if metrics.is_empty() {
        "Basic metrics available".to_string()
    } else {
        metrics.iter().take(3).cloned().collect::<Vec<_>>().join(", ")
    };

    let prompt = format!(
        "You are a data visualization expert. Create 2 meaningful charts based on \
         the business analysis results.\n\n\
         AVAILABLE DATA:\n\
         Key Topics: {}\n\
         Business Metrics: {}\n\n\
         TASK: Suggest 2 charts that would best represent this business data.\n\n\
         OUTPUT FORMAT (exactly):\n\
         Chart1Title|chart_type|label1,label2,label3|value1,value2,value3\n\
         Chart2Title|chart_type|label1,label2,label3|value1,value2,value3\n\n\
         CHART TYPES: bar, line, pie\n\
         VALUES: Use realistic business numbers\n\n\
         EXAMPLE:\n\
         Revenue by Quarter|bar|Q1,Q2,Q3,Q4|120,135,150,180\n\
         Market Share|pie|Product A,Product B,Product C|45,35,20\n\n\
         VISUALIZATION SUGGESTIONS:",
        topics, metrics_context
    );

    let response = gateway.generate(&prompt, 120, 0.4).await;
    let plots = parse_plot_response(&response);
    if !plots.is_empty() {
        return plots;
    }

    basic_plots(keywords)
}

/// Parse pipe-delimited chart rows. A row is accepted only when it has at
/// least 4 fields, label count equals value count and lies in [2,6], and the
/// title is non-empty and under 50 characters. Values take the first numeric
/// token of each field, defaulting to 10.
pub fn parse_plot_response(response: &str) -> Vec<PlotSpec> {
    let mut plots = Vec::new();

    for line in response.lines() {
        let line = line.trim();
        let parts: Vec<&str> = line.split('|').map(str::trim).collect();
        if parts.len() < 4 {
            continue;
        }

        let title = parts[0];
        let chart_type = ChartType::parse(parts[1]);
        let labels: Vec<String> = parts[2]
            .split(',')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect();
        let values: Vec<i64> = parts[3]
            .split(',')
            .map(|v| {
                FIRST_NUMBER_RE
                    .find(v)
                    .and_then(|m| m.as_str().parse::<f64>().ok())
                    .unwrap_or(10.0) as i64
            })
            .collect();

        if labels.len() == values.len()
            && (2..=6).contains(&labels.len())
            && !title.is_empty()
            && title.chars().count() < 50
        {
            plots.push(PlotSpec {
                title: title.to_string(),
                chart_type,
                labels,
                values,
            });
        }
    }

    plots.truncate(MAX_PLOTS);
    plots
}

/// Deterministic charts built from the keyword list alone. Weights are
/// truncated to the label count so short lists keep labels and values aligned.
pub fn basic_plots(keywords: &[String]) -> Vec<PlotSpec> {
    let mut plots = Vec::new();

    let bar_labels: Vec<String> = keywords.iter().take(5).cloned().collect();
    if bar_labels.len() >= 2 {
        let values = BAR_WEIGHTS[..bar_labels.len()].to_vec();
        plots.push(PlotSpec {
            title: "Key Topics Analysis".to_string(),
            chart_type: ChartType::Bar,
            labels: bar_labels,
            values,
        });
    }

    if keywords.len() > 3 {
        plots.push(PlotSpec {
            title: "Business Focus Areas".to_string(),
            chart_type: ChartType::Pie,
            labels: keywords.iter().take(4).cloned().collect(),
            values: PIE_WEIGHTS.to_vec(),
        });
    }

    plots.truncate(MAX_PLOTS);
    plots
}
