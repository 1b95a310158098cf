use std::path::Path;

use anyhow::{bail, Result};
use tracing::info;

use super::{configure_color, emit, highlight_headings, OutputFormat};
use crate::analysis::{run_report, AnalysisConfig, Outcome};
use crate::error::Failure;
use crate::importer::load_table;
use crate::prompt::build_prompt;
use crate::settings::load_settings;

fn config_for(top_n: Option<usize>) -> AnalysisConfig {
    let mut config = load_settings().analysis_config();
    if let Some(n) = top_n {
        config.top_n = n;
    }
    config
}

/// Load and analyze; loader failures come back as structured failures too.
fn outcome_for(file: &str, config: &AnalysisConfig) -> Outcome {
    info!(file, top_n = config.top_n, "loading ledger");
    match load_table(Path::new(file)) {
        Ok(table) => run_report(&table, config),
        Err(e) => Outcome::Failure(Failure::from(&e)),
    }
}

pub fn run(
    file: &str,
    top_n: Option<usize>,
    format: OutputFormat,
    output: Option<&str>,
) -> Result<()> {
    configure_color(output);
    let config = config_for(top_n);
    let outcome = outcome_for(file, &config);

    if format == OutputFormat::Json {
        emit(&serde_json::to_string_pretty(&outcome)?, output)?;
        if let Outcome::Failure(f) = outcome {
            bail!("Error analyzing transactions: {}: {}", f.kind, f.message);
        }
        return Ok(());
    }

    match outcome {
        Outcome::Success { rendered, .. } => emit(&highlight_headings(&rendered), output)?,
        Outcome::Failure(f) => bail!("Error analyzing transactions: {}: {}", f.kind, f.message),
    }
    Ok(())
}

pub fn prompt(file: &str, top_n: Option<usize>, output: Option<&str>) -> Result<()> {
    let config = config_for(top_n);
    match outcome_for(file, &config) {
        Outcome::Success { rendered, .. } => emit(&build_prompt(&rendered), output)?,
        Outcome::Failure(f) => bail!("Error analyzing transactions: {}: {}", f.kind, f.message),
    }
    Ok(())
}
