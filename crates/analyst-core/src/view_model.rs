//! Chart-ready view models
//!
//! Pure functions from evaluation payloads to the series a chart renderer
//! draws. Nothing here touches the network or the session.

use crate::evaluation::{EvaluationResult, Recommendation, StockEvaluation, clamp_score};
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

/// A CSS color string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Color(Cow<'static, str>);

impl Color {
    pub const fn from_static(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }

    pub fn new(value: impl Into<String>) -> Self {
        Self(Cow::Owned(value.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Used when a palette is empty
pub const NEUTRAL_COLOR: Color = Color::from_static("#d1d5db");

pub const SECTOR_PALETTE: [Color; 6] = [
    Color::from_static("#4ade80"),
    Color::from_static("#60a5fa"),
    Color::from_static("#f87171"),
    Color::from_static("#fbbf24"),
    Color::from_static("#a78bfa"),
    Color::from_static("#f472b6"),
];

pub const OVERLAP_PALETTE: [Color; 5] = [
    Color::from_static("#60a5fa"),
    Color::from_static("#f87171"),
    Color::from_static("#fbbf24"),
    Color::from_static("#4ade80"),
    Color::from_static("#a78bfa"),
];

pub const BAR_COLOR: Color = Color::from_static("#60a5fa");

const GAUGE_FILL: Color = Color::from_static("#10b981");
const GAUGE_REMAINDER: Color = NEUTRAL_COLOR;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartKind {
    /// Proportional slices
    Distribution,
    /// Half doughnut: score and remainder
    Gauge,
    Bars(Orientation),
}

/// Normalized `{labels, values, colors}` series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<Color>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(label, value)` pairs in series order
    pub fn points(&self) -> impl Iterator<Item = (&str, f64)> {
        self.labels.iter().map(String::as_str).zip(self.values.iter().copied())
    }
}

/// Palette entry for position `index`, wrapping around short palettes
pub fn palette_color(palette: &[Color], index: usize) -> Color {
    if palette.is_empty() {
        NEUTRAL_COLOR
    } else {
        palette[index % palette.len()].clone()
    }
}

/// One slice per entry, colors assigned by position
pub fn to_distribution_series(entries: &[(String, f64)], palette: &[Color]) -> ChartSeries {
    ChartSeries {
        kind: ChartKind::Distribution,
        labels: entries.iter().map(|(label, _)| label.clone()).collect(),
        values: entries.iter().map(|(_, value)| *value).collect(),
        colors: (0..entries.len()).map(|i| palette_color(palette, i)).collect(),
    }
}

/// `[score, 100 - score]`, clamping out-of-range scores first
pub fn to_gauge_series(score: f64) -> ChartSeries {
    let score = clamp_score(score);
    ChartSeries {
        kind: ChartKind::Gauge,
        labels: vec!["Score".to_string(), "Remaining".to_string()],
        values: vec![score, 100.0 - score],
        colors: vec![GAUGE_FILL, GAUGE_REMAINDER],
    }
}

/// Horizontal bars in input order
pub fn to_ranked_bars(entries: &[(String, f64)]) -> ChartSeries {
    ChartSeries {
        kind: ChartKind::Bars(Orientation::Horizontal),
        labels: entries.iter().map(|(label, _)| label.clone()).collect(),
        values: entries.iter().map(|(_, value)| *value).collect(),
        colors: vec![BAR_COLOR; entries.len()],
    }
}

/// `priceEarningsRatio` → `price Earnings Ratio`
///
/// Inserts a space before every ASCII capital and trims the result.
pub fn humanize_label(key: &str) -> String {
    let mut label = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            label.push(' ');
        }
        label.push(ch);
    }
    label.trim().to_string()
}

/// Score with two decimals, as shown under the gauge
pub fn format_score(score: f64) -> String {
    format!("{:.2}", clamp_score(score))
}

/// Everything the portfolio result view draws
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioView {
    pub client_id: String,
    pub currency: Option<String>,
    pub sector_distribution: ChartSeries,
    pub overlap_distribution: ChartSeries,
    pub overlap_bars: ChartSeries,
    pub gauge: ChartSeries,
    pub score_label: String,
    pub overlap_score: Option<f64>,
    pub sector_score: Option<f64>,
    /// Absent when the service sent no summary
    pub summary: Option<String>,
    pub recommendations: Vec<Recommendation>,
}

impl PortfolioView {
    pub fn from_result(result: &EvaluationResult) -> Self {
        let summary = Some(result.narrative_summary.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Self {
            client_id: result.entity_id.clone(),
            currency: result.currency.clone(),
            sector_distribution: to_distribution_series(&result.category_exposure, &SECTOR_PALETTE),
            overlap_distribution: to_distribution_series(&result.overlap_metric, &OVERLAP_PALETTE),
            overlap_bars: to_ranked_bars(&result.overlap_metric),
            gauge: to_gauge_series(result.final_score()),
            score_label: format_score(result.final_score()),
            overlap_score: result.overlap_score,
            sector_score: result.sector_score,
            summary,
            recommendations: result.recommendations.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackRow {
    pub metric: String,
    pub feedback: String,
}

/// Everything the stock evaluation popup draws
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockView {
    pub title: String,
    pub rows: Vec<FeedbackRow>,
    pub summary: String,
}

impl StockView {
    pub fn from_evaluation(evaluation: &StockEvaluation) -> Self {
        Self {
            title: format!("Evaluation: {}", evaluation.symbol),
            rows: evaluation
                .feedback
                .iter()
                .map(|(metric, text)| FeedbackRow {
                    metric: humanize_label(metric),
                    feedback: text.clone(),
                })
                .collect(),
            summary: evaluation.summary.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(pairs: &[(&str, f64)]) -> Vec<(String, f64)> {
        pairs.iter().map(|(l, v)| ((*l).to_string(), *v)).collect()
    }

    #[test]
    fn test_palette_wraps_around() {
        let palette = [Color::from_static("#111111"), Color::from_static("#222222")];
        assert_eq!(palette_color(&palette, 0).as_str(), "#111111");
        assert_eq!(palette_color(&palette, 1).as_str(), "#222222");
        assert_eq!(palette_color(&palette, 2).as_str(), "#111111");
        assert_eq!(palette_color(&palette, 7).as_str(), "#222222");
        assert_eq!(palette_color(&[], 3), NEUTRAL_COLOR);
    }

    #[test]
    fn test_distribution_series() {
        let exposure = entries(&[
            ("Technology", 0.42),
            ("Healthcare", 0.18),
            ("Energy", 0.1),
            ("Utilities", 0.05),
            ("Financials", 0.2),
            ("Materials", 0.03),
            ("Real Estate", 0.02),
        ]);
        let series = to_distribution_series(&exposure, &OVERLAP_PALETTE);

        assert_eq!(series.kind, ChartKind::Distribution);
        assert_eq!(series.len(), 7);
        assert_eq!(series.labels[0], "Technology");
        assert_eq!(series.labels[6], "Real Estate");
        assert_eq!(series.values[1], 0.18);
        // Seven slices over a five-color palette
        assert_eq!(series.colors[5], OVERLAP_PALETTE[0]);
        assert_eq!(series.colors[6], OVERLAP_PALETTE[1]);
    }

    #[test]
    fn test_distribution_series_empty() {
        let series = to_distribution_series(&[], &SECTOR_PALETTE);
        assert!(series.is_empty());
        assert!(series.labels.is_empty());
        assert!(series.colors.is_empty());
    }

    #[test]
    fn test_gauge_series() {
        for (input, expected) in [(37.5, 37.5), (150.0, 100.0), (-20.0, 0.0), (0.0, 0.0), (100.0, 100.0)] {
            let series = to_gauge_series(input);
            assert_eq!(series.kind, ChartKind::Gauge);
            assert_eq!(series.len(), 2);
            assert_eq!(series.values[0], expected);
            assert_eq!(series.values[0] + series.values[1], 100.0);
        }
        assert_eq!(to_gauge_series(f64::NAN).values, vec![0.0, 100.0]);
        assert_eq!(to_gauge_series(12.0).labels, vec!["Score", "Remaining"]);
    }

    #[test]
    fn test_ranked_bars_keep_input_order() {
        let overlap = entries(&[("F1 vs F2", 0.05), ("F1 vs F3", 0.31), ("F2 vs F3", 0.12)]);
        let bars = to_ranked_bars(&overlap);

        assert_eq!(bars.kind, ChartKind::Bars(Orientation::Horizontal));
        assert_eq!(
            bars.points().collect::<Vec<_>>(),
            vec![("F1 vs F2", 0.05), ("F1 vs F3", 0.31), ("F2 vs F3", 0.12)]
        );
        assert!(bars.colors.iter().all(|c| *c == BAR_COLOR));
    }

    #[test]
    fn test_humanize_label() {
        assert_eq!(humanize_label("priceEarningsRatio"), "price Earnings Ratio");
        assert_eq!(humanize_label("marketCap"), "market Cap");
        assert_eq!(humanize_label("BookValue"), "Book Value");
        assert_eq!(humanize_label("ROE"), "R O E");
        assert_eq!(humanize_label("summary"), "summary");
        assert_eq!(humanize_label(""), "");
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(72.456), "72.46");
        assert_eq!(format_score(150.0), "100.00");
    }

    #[test]
    fn test_portfolio_view() {
        let result = EvaluationResult::new("C1", 150.0)
            .with_currency("USD")
            .with_category_exposure(entries(&[("Technology", 0.6), ("Energy", 0.4)]))
            .with_overlap_metric(entries(&[("F1 vs F2", 0.2)]))
            .with_summary("Concentrated in technology.")
            .add_recommendation(Recommendation::new("Healthcare", "Add a healthcare fund."));

        let view = PortfolioView::from_result(&result);
        assert_eq!(view.client_id, "C1");
        assert_eq!(view.gauge.values, vec![100.0, 0.0]);
        assert_eq!(view.score_label, "100.00");
        assert_eq!(view.sector_distribution.colors, SECTOR_PALETTE[..2].to_vec());
        assert_eq!(view.overlap_distribution.colors, vec![OVERLAP_PALETTE[0].clone()]);
        assert_eq!(view.overlap_bars.len(), 1);
        assert_eq!(view.summary.as_deref(), Some("Concentrated in technology."));
        assert_eq!(view.recommendations[0].category, "Healthcare");
    }

    #[test]
    fn test_portfolio_view_without_summary() {
        let view = PortfolioView::from_result(&EvaluationResult::new("C2", 40.0).with_summary("  "));
        assert!(view.summary.is_none());
        assert!(view.sector_distribution.is_empty());
    }

    #[test]
    fn test_stock_view() {
        let evaluation = StockEvaluation::new("ACME", "Stable.")
            .with_feedback("debtToEquityRatio", "A moderate level of leverage.")
            .with_feedback("currentRatio", "Good liquidity.");

        let view = StockView::from_evaluation(&evaluation);
        assert_eq!(view.title, "Evaluation: ACME");
        assert_eq!(view.rows[0].metric, "debt To Equity Ratio");
        assert_eq!(view.rows[1].feedback, "Good liquidity.");
        assert_eq!(view.summary, "Stable.");
    }
}
