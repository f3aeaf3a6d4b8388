// panorama/src/commands/metrics.rs
//
// USE CASE: List eligible gate metrics for a set of languages.

use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use std::path::{Path, PathBuf};

use panorama_core::domain::catalog::resolve_eligible_metrics;

use super::{metric_catalog, settings};

pub fn execute(
    project_dir: &Path,
    languages: Vec<String>,
    catalog: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = settings(project_dir)?;
    let catalog = metric_catalog(project_dir, &config, catalog)?;

    let languages = if languages.is_empty() {
        config.default_language.clone().into_iter().collect()
    } else {
        languages
    };
    if languages.is_empty() {
        println!("ℹ️  No language given; showing language-independent metrics only.");
    }

    let options = resolve_eligible_metrics(&catalog, &languages);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Title", "Category", "Metrics", "Threshold"]);

    for option in &options {
        let threshold = if option.category.uses_grades() {
            "grade"
        } else if option.integer_valued {
            "integer"
        } else {
            "number"
        };
        table.add_row(vec![
            option.title.clone(),
            option.category.to_string(),
            option.metric.to_string(),
            threshold.to_string(),
        ]);
    }

    println!("{table}");
    println!("{} metrics available.", options.len());
    Ok(())
}
