use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use crate::settings::{load_settings, save_settings, settings_path, Settings};

fn format_settings(settings: &Settings) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Setting", "Value"]);
    table.add_row(vec![Cell::new("top_n"), Cell::new(settings.top_n)]);
    table.add_row(vec![
        Cell::new("date_format"),
        Cell::new(settings.date_format.as_deref().unwrap_or("(built-in)")),
    ]);
    table.to_string()
}

pub fn show() -> Result<()> {
    let settings = load_settings();
    println!("Settings file: {}", settings_path().display());
    println!("{}", format_settings(&settings));
    Ok(())
}

pub fn set(top_n: Option<usize>, date_format: Option<String>, clear_date_format: bool) -> Result<()> {
    let mut settings = load_settings();
    if let Some(n) = top_n {
        settings.top_n = n;
    }
    if let Some(fmt) = date_format {
        settings.date_format = Some(fmt);
    }
    if clear_date_format {
        settings.date_format = None;
    }
    save_settings(&settings)
        .with_context(|| format!("saving {}", settings_path().display()))?;
    println!("{}", format_settings(&settings));
    Ok(())
}
