use anyhow::{Context, Result};

use crate::prompt::Verdict;

pub fn run(file: &str) -> Result<()> {
    let reply = std::fs::read_to_string(file)
        .with_context(|| format!("reading classifier reply from {file}"))?;
    let verdict = Verdict::parse(&reply);
    println!("{}", serde_json::to_string_pretty(&verdict)?);
    Ok(())
}
