//! Evaluation payloads returned by the scoring services

use serde::Serialize;

/// Ordered label → magnitude pairs
pub type Metrics = Vec<(String, f64)>;

/// Clamp a score into `[0, 100]`; NaN becomes 0
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}

/// Common surface of the per-variant evaluation payloads
pub trait Evaluation: Clone + Send + Sync + 'static {
    /// Entity the evaluation belongs to
    fn entity_id(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub category: String,
    pub advice: String,
}

impl Recommendation {
    pub fn new(category: impl Into<String>, advice: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            advice: advice.into(),
        }
    }
}

/// Scored portfolio evaluation
///
/// `final_score` is clamped on the way in, so every reader sees a value in
/// `[0, 100]` regardless of what the service sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationResult {
    pub entity_id: String,
    pub currency: Option<String>,
    /// Weighted exposure per category; non-negative, not normalized
    pub category_exposure: Metrics,
    /// Pairwise overlap per label, e.g. `F1 vs F2`
    pub overlap_metric: Metrics,
    pub overlap_score: Option<f64>,
    pub sector_score: Option<f64>,
    final_score: f64,
    pub narrative_summary: String,
    pub recommendations: Vec<Recommendation>,
}

impl EvaluationResult {
    pub fn new(entity_id: impl Into<String>, final_score: f64) -> Self {
        Self {
            entity_id: entity_id.into(),
            currency: None,
            category_exposure: Vec::new(),
            overlap_metric: Vec::new(),
            overlap_score: None,
            sector_score: None,
            final_score: clamp_score(final_score),
            narrative_summary: String::new(),
            recommendations: Vec::new(),
        }
    }

    pub fn final_score(&self) -> f64 {
        self.final_score
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Negative exposures are floored at zero
    pub fn with_category_exposure(mut self, exposure: Metrics) -> Self {
        self.category_exposure = exposure
            .into_iter()
            .map(|(label, value)| (label, value.max(0.0)))
            .collect();
        self
    }

    pub fn with_overlap_metric(mut self, overlap: Metrics) -> Self {
        self.overlap_metric = overlap;
        self
    }

    pub fn with_sub_scores(mut self, overlap_score: Option<f64>, sector_score: Option<f64>) -> Self {
        self.overlap_score = overlap_score;
        self.sector_score = sector_score;
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.narrative_summary = summary.into();
        self
    }

    pub fn add_recommendation(mut self, recommendation: Recommendation) -> Self {
        self.recommendations.push(recommendation);
        self
    }
}

impl Evaluation for EvaluationResult {
    fn entity_id(&self) -> &str {
        &self.entity_id
    }
}

/// Per-metric textual feedback for one stock
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockEvaluation {
    pub symbol: String,
    /// Metric key (camel case) → feedback sentence, in service order
    pub feedback: Vec<(String, String)>,
    pub summary: String,
}

impl StockEvaluation {
    pub fn new(symbol: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            feedback: Vec::new(),
            summary: summary.into(),
        }
    }

    pub fn with_feedback(mut self, metric: impl Into<String>, text: impl Into<String>) -> Self {
        self.feedback.push((metric.into(), text.into()));
        self
    }
}

impl Evaluation for StockEvaluation {
    fn entity_id(&self) -> &str {
        &self.symbol
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(150.0), 100.0);
        assert_eq!(clamp_score(-3.5), 0.0);
        assert_eq!(clamp_score(42.25), 42.25);
        assert_eq!(clamp_score(f64::NAN), 0.0);
        assert_eq!(clamp_score(f64::INFINITY), 100.0);
    }

    #[test]
    fn test_final_score_clamped_on_construction() {
        let result = EvaluationResult::new("C1", 150.0);
        assert_eq!(result.final_score(), 100.0);
        assert_eq!(result.entity_id(), "C1");
    }

    #[test]
    fn test_negative_exposure_floored() {
        let result = EvaluationResult::new("C1", 50.0).with_category_exposure(vec![
            ("Technology".to_string(), 0.6),
            ("Energy".to_string(), -0.1),
        ]);
        assert_eq!(
            result.category_exposure,
            vec![("Technology".to_string(), 0.6), ("Energy".to_string(), 0.0)]
        );
    }

    #[test]
    fn test_stock_evaluation_keeps_feedback_order() {
        let evaluation = StockEvaluation::new("ACME", "Stable.")
            .with_feedback("priceEarningsRatio", "Reasonably priced.")
            .with_feedback("dividendYield", "Attractive.");

        assert_eq!(evaluation.entity_id(), "ACME");
        assert_eq!(evaluation.feedback[0].0, "priceEarningsRatio");
        assert_eq!(evaluation.feedback[1].0, "dividendYield");
    }
}
