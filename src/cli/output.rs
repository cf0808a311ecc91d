//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::category::CategoryStore;
use crate::cli::args::{MotifArgs, OutputFormat};
use crate::dataset::PrepareReport;
use crate::error::Result;
use crate::pipeline::PipelineSummary;

/// Result structure for the prepare command.
#[derive(Debug, Serialize, Deserialize)]
pub struct PrepareResult {
    pub input: String,
    pub output: String,
    #[serde(flatten)]
    pub report: PrepareReport,
}

/// One entry of a category listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub name: String,
    pub exemplars: Vec<String>,
}

/// Result structure for the categories command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryListing {
    pub path: String,
    pub categories: Vec<CategoryEntry>,
}

impl CategoryListing {
    pub fn from_store(path: String, store: &CategoryStore) -> Self {
        let categories = store
            .iter()
            .map(|(name, exemplars)| CategoryEntry {
                name: name.to_string(),
                exemplars: exemplars.to_vec(),
            })
            .collect();
        CategoryListing { path, categories }
    }
}

/// Human-readable rendering of a command result.
pub trait HumanOutput {
    fn render_human(&self) -> Vec<String>;
}

impl HumanOutput for PrepareResult {
    fn render_human(&self) -> Vec<String> {
        vec![
            "Preparation:".to_string(),
            "════════════".to_string(),
            format!("Input: {}", self.input),
            format!("Total rows: {}", self.report.total),
            format!("Empty answers: {}", self.report.missing),
            format!("Punctuation-only answers: {}", self.report.noise),
            format!("Rows retained: {}", self.report.retained),
            format!("Output: {}", self.output),
        ]
    }
}

impl HumanOutput for PipelineSummary {
    fn render_human(&self) -> Vec<String> {
        let mut lines = vec![
            "Labeling Summary:".to_string(),
            "═════════════════".to_string(),
            format!("Input: {}", self.input.display()),
            format!("Strategy: {}", format!("{:?}", self.strategy).to_lowercase()),
            format!("Total rows: {}", self.total_rows),
            format!("Invalid rows dropped: {}", self.dropped_rows),
            format!("Rows labeled: {}", self.retained_rows),
            format!("Rows still unlabeled: {}", self.unlabeled_rows),
        ];

        match self.status {
            Some(status) => {
                lines.push(format!(
                    "Refinement: {status} after {} iteration(s), {} exemplar(s) added",
                    self.iterations, self.exemplars_added
                ));
            }
            None => lines.push("Refinement: disabled".to_string()),
        }

        lines.push(String::new());
        lines.push(format!("Categories ({}):", self.category_count));
        lines.push("───────────".to_string());
        for (name, count) in &self.label_counts {
            lines.push(format!("  {name} ({count})"));
        }

        lines.push(String::new());
        lines.push(format!(
            "Labeled output: {} ({} row(s))",
            self.output.display(),
            self.exported_rows
        ));
        lines.push(format!("Categories output: {}", self.categories_output.display()));
        lines
    }
}

impl HumanOutput for CategoryListing {
    fn render_human(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Categories in {}:", self.path),
            "═══════════".to_string(),
        ];
        for entry in &self.categories {
            if entry.exemplars.is_empty() {
                lines.push(entry.name.clone());
            } else {
                lines.push(format!("{}: {}", entry.name, entry.exemplars.join(", ")));
            }
        }
        lines.push(String::new());
        lines.push(format!("Total categories: {}", self.categories.len()));
        lines
    }
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanOutput>(
    message: &str,
    result: &T,
    args: &MotifArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: HumanOutput>(message: &str, result: &T, args: &MotifArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }
    for line in result.render_human() {
        println!("{line}");
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &MotifArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_listing_from_store() {
        let store = CategoryStore::from_pairs([
            ("Costos", vec!["costo", "precio"]),
            ("Confianza", vec![]),
        ]);
        let listing = CategoryListing::from_store("c.csv".to_string(), &store);

        let lines = listing.render_human();
        assert!(lines.contains(&"Costos: costo, precio".to_string()));
        assert!(lines.contains(&"Confianza".to_string()));
        assert_eq!(lines.last().unwrap(), "Total categories: 2");
    }

    #[test]
    fn test_prepare_result_json_is_flat() {
        let result = PrepareResult {
            input: "raw.csv".to_string(),
            output: "data_limpia.csv".to_string(),
            report: PrepareReport {
                total: 3,
                missing: 1,
                noise: 0,
                retained: 2,
            },
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["retained"], 2);
        assert_eq!(value["output"], "data_limpia.csv");
    }
}
