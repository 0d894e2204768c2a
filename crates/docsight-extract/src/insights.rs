//! Insight synthesis — combines keywords, metrics, and summary into
//! strategic statements, with rule-based and emergency fallbacks.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::gateway::GenerationGateway;
use crate::normalize::truncate_chars;

/// Provenance tag appended to every synthesized insight.
pub const LOCAL_PROCESSING_TAG: &str = " [AI-powered analysis with local processing]";

static NUMBERING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s*").unwrap());
static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-\u{2022}*]\s*").unwrap());

/// Synthesize 2-3 connected, actionable insights from the extracted data.
/// Always returns a non-empty string, whatever the generation backend does.
pub async fn generate_insights(
    gateway: &GenerationGateway,
    keywords: &[String],
    metrics: &[String],
    summary: &str,
) -> String {
    let keywords_context = if keywords.is_empty() {
        "business operations".to_string()
    } else {
        keywords.iter().take(5).cloned().collect::<Vec<_>>().join(", ")
    };
    let metrics_context = if metrics.is_empty() {
        "No specific metrics extracted".to_string()
    } else {
        metrics
            .iter()
            .take(4)
            .map(|m| format!("- {}", m))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let prompt = format!(
        "You are a senior business consultant analyzing a company document. \
         Your task is to provide strategic insights based on the extracted data.\n\n\
         ANALYSIS DATA:\n\
         Key Focus Areas: {}\n\
         Business Metrics:\n\
         {}\n\n\
         Document Summary: {}\n\n\
         TASK: Provide 2-3 strategic business insights that:\n\
         1. Connect the metrics to business performance\n\
         2. Identify potential opportunities or concerns\n\
         3. Suggest areas for further investigation\n\
         4. Are specific and actionable\n\n\
         EXAMPLE INSIGHT FORMAT:\n\
         \"The [metric/trend] suggests [business implication], which indicates \
         [opportunity/risk]. This could be leveraged by [suggested action].\"\n\n\
         STRATEGIC INSIGHTS:\n\
         1.",
        keywords_context,
        metrics_context,
        truncate_chars(summary, 300)
    );

    let raw = gateway.generate(&prompt, 180, 0.7).await;
    let mut insights = clean_and_structure(&raw);

    if insights.chars().count() < 30 {
        insights = fallback_insights(keywords, metrics, summary);
    }
    if insights.is_empty() {
        return emergency_insights(keywords.len(), metrics.len());
    }

    format!("{}{}", insights, LOCAL_PROCESSING_TAG)
}

/// Keep meaningful lines, strip numbering and bullets, drop meta-commentary,
/// and join at most three statements.
pub fn clean_and_structure(insights_text: &str) -> String {
    let mut cleaned: Vec<String> = Vec::new();

    for line in insights_text.lines() {
        let line = line.trim();
        if line.chars().count() <= 20 {
            continue;
        }
        let without_numbering = NUMBERING_RE.replace(line, "");
        let clean_line = BULLET_RE.replace(&without_numbering, "").to_string();

        if !clean_line.is_empty() && !clean_line.to_lowercase().starts_with("insight") {
            cleaned.push(clean_line);
        }
    }

    cleaned.truncate(3);
    cleaned.join(" ")
}

/// Rule-based insights derived from the same three inputs.
pub fn fallback_insights(keywords: &[String], metrics: &[String], summary: &str) -> String {
    let mut insights: Vec<String> = Vec::new();

    if let Some(primary_focus) = keywords.first() {
        insights.push(format!(
            "Document analysis indicates primary focus on {} and related strategic initiatives.",
            primary_focus
        ));
    }

    if !metrics.is_empty() {
        let count = metrics.len();
        let financial = metrics.iter().any(|m| {
            let lower = m.to_lowercase();
            lower.contains("revenue") || lower.contains("sales") || m.contains('$')
        });
        if financial {
            insights.push(format!(
                "Financial performance tracking evidenced through {} quantitative metric(s), \
                 suggesting data-driven management approach.",
                count
            ));
        } else {
            insights.push(format!(
                "Operational metrics tracking with {} key performance indicator(s) identified.",
                count
            ));
        }
    }

    if summary.chars().count() > 100 {
        let lower = summary.to_lowercase();
        if ["growth", "increase", "expansion"].iter().any(|w| lower.contains(w)) {
            insights.push("Business trajectory shows growth-oriented strategic direction.".into());
        } else if ["efficiency", "optimization", "improvement"]
            .iter()
            .any(|w| lower.contains(w))
        {
            insights
                .push("Operational focus emphasizes efficiency and process optimization.".into());
        }
    }

    if insights.is_empty() {
        "Business document contains structured analytical content suitable for strategic review."
            .to_string()
    } else {
        insights.join(" ")
    }
}

/// Last resort: report only what was counted. Used when insight construction
/// itself fails.
pub fn emergency_insights(keyword_count: usize, metric_count: usize) -> String {
    format!(
        "Document analysis completed: {} key topics and {} metrics identified. \
         Secure local processing maintained throughout analysis.",
        keyword_count, metric_count
    )
}
