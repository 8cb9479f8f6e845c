use crate::StreakSummary;
use analytics::{DayTypeBreakdown, LabeledSequence, WinLossReport};
use comfy_table::{Cell, CellAlignment, Table};
use core_types::DayType;

/// One row per headline metric.
pub fn metrics_table(report: &WinLossReport, dp: u32) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    for (name, value) in report.metrics() {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(value.display(dp)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// Day counts and percentage shares for each day type.
pub fn breakdown_table(breakdown: &DayTypeBreakdown, dp: u32) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Day type", "Days", "Share"]);
    for kind in [DayType::Win, DayType::Loss, DayType::Neutral] {
        table.add_row(vec![
            Cell::new(kind),
            Cell::new(breakdown.counts.get(kind)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{}%", breakdown.pct(kind).round_dp(dp)))
                .set_alignment(CellAlignment::Right),
        ]);
    }
    table.add_row(vec![
        Cell::new("total"),
        Cell::new(breakdown.counts.total()).set_alignment(CellAlignment::Right),
        Cell::new(""),
    ]);
    table
}

/// Period number and label, in chronological order.
pub fn labels_table(labels: &LabeledSequence) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Period", "Day type"]);
    for (period, label) in labels.iter().enumerate() {
        table.add_row(vec![Cell::new(period + 1), Cell::new(label)]);
    }
    table
}

pub fn streaks_table(summary: &StreakSummary<'_>, dp: u32) -> Table {
    let runs = if summary.runs.is_empty() {
        "-".to_string()
    } else {
        summary
            .runs
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut table = Table::new();
    table.set_header(vec![format!("{} streaks", summary.kind), String::new()]);
    table.add_row(vec!["count".to_string(), summary.runs.len().to_string()]);
    table.add_row(vec!["max".to_string(), summary.max.to_string()]);
    table.add_row(vec!["average".to_string(), summary.average.round_dp(dp).to_string()]);
    table.add_row(vec!["runs".to_string(), runs]);
    table
}
