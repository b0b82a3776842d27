//! JSON payloads exchanged with the scoring services

use analyst_core::{EntityRecord, EvaluationResult, Metrics, Recommendation, StockEvaluation};
use serde::Deserialize;
use serde_json::{Map, Value};

/// `GET /evaluate/{symbol}` response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StockEvaluationWire {
    stock_symbol: String,
    #[serde(default)]
    feedback: Map<String, Value>,
    #[serde(default)]
    summary: String,
}

impl From<StockEvaluationWire> for StockEvaluation {
    fn from(wire: StockEvaluationWire) -> Self {
        wire.feedback.into_iter().fold(
            StockEvaluation::new(wire.stock_symbol, wire.summary),
            |evaluation, (metric, text)| {
                let text = match text {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                evaluation.with_feedback(metric, text)
            },
        )
    }
}

/// `POST /upload-json` response
#[derive(Debug, Deserialize)]
pub(crate) struct CustomerListWire {
    #[serde(default)]
    customers: Vec<Map<String, Value>>,
}

impl CustomerListWire {
    pub(crate) fn into_records(self) -> Vec<EntityRecord> {
        listing_records(&self.customers, "clientId")
    }
}

#[derive(Debug, Deserialize)]
struct RecommendationWire {
    sector: String,
    recommendation: String,
}

/// `POST /evaluate-customer` response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PortfolioEvaluationWire {
    client_id: String,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    fund_overlap: Map<String, Value>,
    #[serde(default)]
    overlap_score: Option<f64>,
    #[serde(default)]
    sector_score: Option<f64>,
    final_score: f64,
    #[serde(default)]
    weighted_sector_exposure: Map<String, Value>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    possible_diversification: Vec<RecommendationWire>,
}

impl TryFrom<PortfolioEvaluationWire> for EvaluationResult {
    type Error = String;

    fn try_from(wire: PortfolioEvaluationWire) -> Result<Self, Self::Error> {
        let exposure = numeric_entries(wire.weighted_sector_exposure, "weightedSectorExposure")?;
        let overlap = numeric_entries(wire.fund_overlap, "fundOverlap")?;

        let mut result = EvaluationResult::new(wire.client_id, wire.final_score)
            .with_category_exposure(exposure)
            .with_overlap_metric(overlap)
            .with_sub_scores(wire.overlap_score, wire.sector_score)
            .with_summary(wire.summary.unwrap_or_default());

        if let Some(currency) = wire.currency {
            result = result.with_currency(currency);
        }

        Ok(wire
            .possible_diversification
            .into_iter()
            .fold(result, |result, rec| {
                result.add_recommendation(Recommendation::new(rec.sector, rec.recommendation))
            }))
    }
}

/// Entity records from listing objects, skipping those without a string id
pub(crate) fn listing_records(
    objects: &[Map<String, Value>],
    id_field: &str,
) -> Vec<EntityRecord> {
    objects
        .iter()
        .filter_map(|object| EntityRecord::from_object(object, id_field))
        .collect()
}

fn numeric_entries(map: Map<String, Value>, field: &str) -> Result<Metrics, String> {
    map.into_iter()
        .map(|(label, value)| match value.as_f64() {
            Some(number) => Ok((label, number)),
            None => Err(format!("{field}.{label} is not a number")),
        })
        .collect()
}
