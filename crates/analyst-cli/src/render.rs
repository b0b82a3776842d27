//! Terminal rendering of listings, results and notices

use analyst_core::view_model::format_score;
use analyst_core::{
    ChartSeries, DatasetSchema, Entity, EntityStatus, EvaluationResult, Notice, PortfolioView,
    SessionState, StockEvaluation, StockView, ViewStage, humanize_label,
};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};

const GAUGE_WIDTH: usize = 20;

/// How results are written to stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    #[default]
    Table,
    /// Chart series and views as pretty JSON
    Json,
}

/// An evaluation payload the terminal knows how to show
pub trait Presentable {
    fn render(&self, mode: OutputMode) -> serde_json::Result<String>;
}

impl Presentable for StockEvaluation {
    fn render(&self, mode: OutputMode) -> serde_json::Result<String> {
        let view = StockView::from_evaluation(self);
        match mode {
            OutputMode::Table => Ok(stock_view(&view)),
            OutputMode::Json => serde_json::to_string_pretty(&view),
        }
    }
}

impl Presentable for EvaluationResult {
    fn render(&self, mode: OutputMode) -> serde_json::Result<String> {
        let view = PortfolioView::from_result(self);
        match mode {
            OutputMode::Table => Ok(portfolio_view(&view)),
            OutputMode::Json => serde_json::to_string_pretty(&view),
        }
    }
}

fn table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// `priceEarningsRatio` -> `Price Earnings Ratio`
pub fn title_case(key: &str) -> String {
    humanize_label(key)
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn entity_noun(schema: DatasetSchema) -> &'static str {
    match schema {
        DatasetSchema::Stock => "companies",
        DatasetSchema::Portfolio => "clients",
    }
}

/// Entity listing with one column per display field, then the count
pub fn entity_table(entities: &[Entity], schema: DatasetSchema) -> String {
    if entities.is_empty() {
        return "No entities listed. Use `upload <path>` first.".to_string();
    }

    let mut fields: Vec<&str> = Vec::new();
    for entity in entities {
        for key in entity.display_fields.keys() {
            if !fields.contains(&key.as_str()) {
                fields.push(key);
            }
        }
    }

    let mut header = vec![title_case(schema.id_field())];
    header.extend(fields.iter().map(|key| title_case(key)));
    header.push("Status".to_string());

    let mut table = table();
    table.set_header(header);
    for entity in entities {
        let mut row = vec![Cell::new(&entity.id)];
        row.extend(
            fields
                .iter()
                .map(|key| Cell::new(entity.field(key).unwrap_or_default())),
        );
        row.push(Cell::new(entity.status));
        table.add_row(row);
    }
    format!(
        "{table}\nLoaded {} count: {}",
        entity_noun(schema),
        entities.len()
    )
}

pub fn stock_view(view: &StockView) -> String {
    let mut out = format!("{}\n", view.title);

    if view.rows.is_empty() {
        out.push_str("No metric feedback returned.\n");
    } else {
        let mut table = table();
        table.set_header(vec!["Metric", "Feedback"]);
        for row in &view.rows {
            table.add_row(vec![title_case(&row.metric), row.feedback.clone()]);
        }
        out.push_str(&format!("{table}\n"));
    }

    if !view.summary.trim().is_empty() {
        out.push_str(&format!("\nSummary: {}\n", view.summary.trim()));
    }
    out
}

pub fn portfolio_view(view: &PortfolioView) -> String {
    let mut out = match &view.currency {
        Some(currency) => format!("Client {} ({currency})\n", view.client_id),
        None => format!("Client {}\n", view.client_id),
    };
    out.push_str(&format!(
        "Final score: {} / 100  {}\n",
        view.score_label,
        gauge_bar(&view.gauge)
    ));

    let sub_scores: Vec<String> = [
        ("Overlap score", view.overlap_score),
        ("Sector score", view.sector_score),
    ]
    .into_iter()
    .filter_map(|(label, score)| score.map(|s| format!("{label}: {}", format_score(s))))
    .collect();
    if !sub_scores.is_empty() {
        out.push_str(&format!("{}\n", sub_scores.join("   ")));
    }

    out.push_str("\nSector exposure\n");
    out.push_str(&series_table(&view.sector_distribution, "Sector", "Exposure"));

    out.push_str("\nFund overlap share\n");
    out.push_str(&series_table(&view.overlap_distribution, "Funds", "Share"));

    out.push_str("\nFund overlap\n");
    out.push_str(&series_table(&view.overlap_bars, "Funds", "Overlap"));

    if let Some(summary) = &view.summary {
        out.push_str(&format!("\nSummary: {summary}\n"));
    }

    if !view.recommendations.is_empty() {
        let mut table = table();
        table.set_header(vec!["Sector", "Recommendation"]);
        for recommendation in &view.recommendations {
            table.add_row(vec![&recommendation.category, &recommendation.advice]);
        }
        out.push_str(&format!("\nDiversification ideas\n{table}\n"));
    }
    out
}

/// One row per point, with its color
pub fn series_table(series: &ChartSeries, label_header: &str, value_header: &str) -> String {
    if series.is_empty() {
        return "(none reported)\n".to_string();
    }

    let mut table = table();
    table.set_header(vec![label_header, value_header, "Color"]);
    for ((label, value), color) in series.points().zip(&series.colors) {
        table.add_row(vec![label.to_string(), format!("{value:.2}"), color.to_string()]);
    }
    format!("{table}\n")
}

/// Text rendering of a gauge series, `[#####---------------]`
pub fn gauge_bar(gauge: &ChartSeries) -> String {
    let score = gauge.values.first().copied().unwrap_or(0.0).clamp(0.0, 100.0);
    let filled = ((score / 100.0) * GAUGE_WIDTH as f64).round() as usize;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(GAUGE_WIDTH.saturating_sub(filled))
    )
}

pub fn notice(notice: &Notice) -> String {
    format!("! {notice}\n  (press Enter to continue)")
}

pub fn stage_name(stage: ViewStage) -> &'static str {
    match stage {
        ViewStage::AwaitingUpload => "awaiting upload",
        ViewStage::Listing => "listing",
        ViewStage::ShowingResult => "showing result",
    }
}

pub fn status<E>(state: &SessionState<E>, busy: bool) -> String {
    let evaluated = state
        .registry
        .iter()
        .filter(|entity| entity.status == EntityStatus::Evaluated)
        .count();

    let mut out = format!("Stage: {}\n", stage_name(state.stage()));
    match &state.dataset {
        Some(dataset) => out.push_str(&format!(
            "Dataset: {} ({} records)\n",
            dataset.file_name(),
            dataset.len()
        )),
        None => out.push_str("Dataset: none\n"),
    }
    out.push_str(&format!(
        "Entities: {} listed, {evaluated} evaluated\n",
        state.registry.len()
    ));
    out.push_str(&format!("Busy: {}\n", if busy { "yes" } else { "no" }));
    out.push_str(&format!(
        "Session started: {}",
        state.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out
}
