//! Command implementations for the motif CLI.

use log::debug;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::MotifConfig;
use crate::dataset::{PrepareOptions, load_categories, prepare_file};
use crate::error::{MotifError, Result};
use crate::pipeline::{Pipeline, PipelineInputs};

/// Execute a CLI command.
pub fn execute_command(args: MotifArgs) -> Result<()> {
    match &args.command {
        Command::Prepare(prepare_args) => prepare_data(prepare_args, &args),
        Command::Label(label_args) => label_data(label_args, &args),
        Command::Categories(categories_args) => show_categories(categories_args, &args),
    }
}

/// Clean a raw survey export.
fn prepare_data(args: &PrepareArgs, cli_args: &MotifArgs) -> Result<()> {
    if !args.delimiter.is_ascii() {
        return Err(MotifError::invalid_argument(format!(
            "Delimiter must be a single ASCII character, got '{}'",
            args.delimiter
        )));
    }

    let options = PrepareOptions {
        id_column: args.id_column.clone(),
        question_column: args.question_column.clone(),
        delimiter: args.delimiter as u8,
    };
    let report = prepare_file(
        &args.input,
        &args.output,
        &options,
        &MotifConfig::default().columns,
    )?;

    output_result(
        "Survey export prepared",
        &PrepareResult {
            input: args.input.display().to_string(),
            output: args.output.display().to_string(),
            report,
        },
        cli_args,
    )
}

/// Load the configuration for a label run, with command line overrides applied.
fn load_config(args: &LabelArgs) -> Result<MotifConfig> {
    let mut config = match &args.config {
        Some(path) => MotifConfig::from_file(path)?,
        None => MotifConfig::default(),
    };
    args.apply_to(&mut config);
    config.validate()?;
    debug!("Effective configuration: {config:?}");
    Ok(config)
}

/// Label a cleaned response file.
fn label_data(args: &LabelArgs, cli_args: &MotifArgs) -> Result<()> {
    let pipeline = Pipeline::new(load_config(args)?)?;
    let inputs = PipelineInputs {
        data: args.data.clone(),
        categories: args.categories.clone(),
        output: args.output.clone(),
        categories_output: args.categories_output.clone(),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let summary = runtime.block_on(pipeline.run(&inputs))?;

    output_result("Labeling completed", &summary, cli_args)
}

/// Print the contents of a category dictionary.
fn show_categories(args: &CategoriesArgs, cli_args: &MotifArgs) -> Result<()> {
    output_result("Category dictionary", &category_listing(args)?, cli_args)
}

fn category_listing(args: &CategoriesArgs) -> Result<CategoryListing> {
    let config = match &args.config {
        Some(path) => MotifConfig::from_file(path)?,
        None => MotifConfig::default(),
    };
    let store = load_categories(&args.path, &config.columns)?;
    Ok(CategoryListing::from_store(
        args.path.display().to_string(),
        &store,
    ))
}
