mod analyze;
mod config;
mod model;
mod report;
mod utils;

use crate::analyze::aggregator::Aggregator;
use crate::analyze::ranker::Ranker;
use crate::config::{ANALYSIS_PATH, CHART_PATH, TOP_REPOS};
use crate::report::chart::ChartReport;
use crate::report::markdown::MarkdownReport;
use crate::utils::{MultiProgressNew, ProgressStyleTemplate};
use clap::Parser;
use indicatif::MultiProgress;
use model::{AnalysisDocument, Result};
use std::borrow::Cow;
use std::process::ExitCode;

/// Rank repositories by total macro usage and chart the top of the list
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
struct Args {}

fn main() -> ExitCode {
    let _args = Args::parse();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let multi_progress = MultiProgress::new();

    let document = stage(
        &multi_progress,
        format!("Read file `{ANALYSIS_PATH}` ..."),
        || AnalysisDocument::from_file(ANALYSIS_PATH),
        |doc| {
            format!(
                "✅ Completed parsing file `{ANALYSIS_PATH}` (find {} repos)",
                doc.repos.len()
            )
        },
    )?;

    let totals = stage(
        &multi_progress,
        "Aggregate macro usage ...",
        || document.aggregate_totals(),
        |totals| {
            format!(
                "✅ Completed aggregation (find {} repos with macro usage)",
                totals.len()
            )
        },
    )?;

    let ranking = totals.rank_top(TOP_REPOS);

    stage(
        &multi_progress,
        format!("Render chart `{CHART_PATH}` ..."),
        || ranking.chart_create(CHART_PATH),
        |_| {
            format!(
                "✅ Completed chart `{CHART_PATH}` (top {} repos)",
                ranking.len()
            )
        },
    )?;

    print!("{}", ranking.report_render()?);
    Ok(())
}

fn stage<T, F, M>(
    multi_progress: &MultiProgress,
    message: impl Into<Cow<'static, str>>,
    action: F,
    completed: M,
) -> Result<T>
where
    F: FnOnce() -> Result<T>,
    M: FnOnce(&T) -> String,
{
    let pb = multi_progress.add_stage(message);
    match action() {
        Ok(value) => {
            pb.finish_with_message(completed(&value));
            Ok(value)
        }
        Err(e) => {
            pb.set_style(ProgressStyleTemplate::failed());
            pb.abandon_with_message(e.to_string());
            Err(e)
        }
    }
}
