//! Command-line interface for generating collections and auditing them for duplicates

use crate::algorithm::duplicates::find_duplicates;
use crate::io::collection::{CollectionBuilder, CollectionOptions, CollectionSummary};
use crate::io::compositor::{ComponentStore, LayeredCompositor};
use crate::io::configuration::{
    DEFAULT_COMPONENTS_DIR, DEFAULT_DELIMITER, DEFAULT_IMAGE_COUNT, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_OUTPUT_DIR, DEFAULT_QUOTE, DEFAULT_REPORT_PATH, DEFAULT_SEED, METADATA_FILE_NAME,
};
use crate::io::error::{CollectionError, Result};
use crate::io::metadata::{MetadataReader, TableFormat};
use crate::io::progress::ProgressManager;
use crate::io::report::{DuplicateSummary, write_report};
use crate::io::schema::load_schema;
use crate::model::MetadataTable;
use clap::{Args, Parser, Subcommand};
use log::{error, info};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "layerforge")]
#[command(
    author,
    version,
    about = "Generate unique layered trait collections and find duplicate combinations"
)]
/// Command-line arguments for the collection tool
pub struct Cli {
    /// Suppress progress output and informational logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Pass to run
    #[command(subcommand)]
    pub command: Command,
}

/// Independent passes over the metadata table
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a collection of unique trait combinations
    Generate(GenerateArgs),
    /// Find records sharing a trait combination in an existing metadata table
    Detect(DetectArgs),
}

/// Delimited text options shared by both passes
#[derive(Args, Debug, Clone, Copy)]
pub struct TableArgs {
    /// Field delimiter of the metadata table
    #[arg(short, long, default_value_t = DEFAULT_DELIMITER)]
    pub delimiter: char,

    /// Quote character used for fields containing the delimiter
    #[arg(long, default_value_t = DEFAULT_QUOTE)]
    pub quote: char,
}

impl TableArgs {
    /// Validated table format
    ///
    /// # Errors
    ///
    /// Returns an error if the characters cannot be used as delimiter and quote
    pub fn format(&self) -> Result<TableFormat> {
        TableFormat::new(self.delimiter, self.quote)
    }
}

/// Arguments of the generate pass
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// JSON trait schema, traits listed bottom layer first
    #[arg(long, value_name = "FILE")]
    pub schema: PathBuf,

    /// Number of unique images to generate
    #[arg(short = 'n', long, default_value_t = DEFAULT_IMAGE_COUNT)]
    pub count: usize,

    /// Directory holding the trait layer images
    #[arg(short, long, default_value = DEFAULT_COMPONENTS_DIR)]
    pub components: PathBuf,

    /// Output directory; replaced on every run
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// Random seed for reproducible generation
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Draws allowed per image before giving up on finding a unique combination
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,

    /// Write only the metadata table, skipping image compositing
    #[arg(short, long)]
    pub metadata_only: bool,

    /// Table format
    #[command(flatten)]
    pub table: TableArgs,
}

/// Arguments of the detect pass
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Metadata table to audit
    #[arg(short, long, value_name = "FILE", default_value_os_t = default_metadata_path())]
    pub metadata: PathBuf,

    /// Where to write the duplicate report
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_REPORT_PATH)]
    pub report: PathBuf,

    /// Table format
    #[command(flatten)]
    pub table: TableArgs,
}

fn default_metadata_path() -> PathBuf {
    Path::new(DEFAULT_OUTPUT_DIR).join(METADATA_FILE_NAME)
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Default log filter for this invocation
    pub const fn log_level(&self) -> &'static str {
        if self.quiet { "warn" } else { "info" }
    }
}

/// Dispatches a parsed command line to the generate or detect pass
pub struct CommandProcessor {
    cli: Cli,
}

impl CommandProcessor {
    /// Create a processor for the given CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the selected pass
    ///
    /// # Errors
    ///
    /// Returns the first configuration, generation, parsing or storage error
    pub fn process(&self) -> Result<()> {
        match &self.cli.command {
            Command::Generate(args) => self.generate(args).map(|summary| {
                report_generation(&summary);
            }),
            Command::Detect(args) => detect(args).map(|(summary, path)| {
                report_detection(summary, &path);
            }),
        }
    }

    /// Run the generate pass
    ///
    /// # Errors
    ///
    /// Returns an error if the schema, components or parameters are invalid,
    /// the combinations cannot be drawn, or the collection cannot be written
    pub fn generate(&self, args: &GenerateArgs) -> Result<CollectionSummary> {
        let format = args.table.format()?;
        let schema = load_schema(&args.schema)?;
        info!(
            "Generating {} images from {} traits ({} combinations available)",
            args.count,
            schema.len(),
            schema.capacity()
        );

        let options = CollectionOptions {
            count: args.count,
            seed: args.seed,
            max_attempts: args.max_attempts,
            output_dir: args.output.clone(),
            format,
        };

        let mut builder = CollectionBuilder::new(&schema, options);
        if !args.metadata_only {
            builder = builder.with_images(ComponentStore::new(&args.components), LayeredCompositor);
        }
        if self.cli.should_show_progress() {
            builder = builder.with_progress(ProgressManager::new());
        }
        builder.build()
    }
}

/// Run the detect pass, returning the summary and the report location
///
/// # Errors
///
/// Returns an error if the table cannot be read, any row is malformed, or the
/// report cannot be written
pub fn detect(args: &DetectArgs) -> Result<(DuplicateSummary, PathBuf)> {
    let format = args.table.format()?;
    let table = read_all_rows(&args.metadata, format)?;
    info!(
        "Scanning {} records from '{}'",
        table.records().len(),
        args.metadata.display()
    );

    let report = find_duplicates(table.records());
    write_report(&report, &table.header(), &args.report, format)?;

    Ok((DuplicateSummary::from(&report), args.report.clone()))
}

/// Read every row, logging each malformed one before failing with the first
fn read_all_rows(path: &Path, format: TableFormat) -> Result<MetadataTable> {
    let mut reader = MetadataReader::open(path, format)?;
    let trait_names = reader.trait_names().to_vec();

    let mut records = Vec::new();
    let mut first_error: Option<CollectionError> = None;
    for row in reader.by_ref() {
        match row {
            Ok(record) => records.push(record),
            Err(e) => {
                error!("{e}");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    first_error.map_or_else(|| Ok(MetadataTable::new(trait_names, records)), Err)
}

// Allow print for the user-facing summary
#[allow(clippy::print_stdout)]
fn report_generation(summary: &CollectionSummary) {
    println!("Are all images unique? {}", summary.all_unique);
    println!(
        "Successfully assembled {} records into {}",
        summary.table.records().len(),
        summary.metadata_path.display()
    );
}

// Allow print for the user-facing summary
#[allow(clippy::print_stdout)]
fn report_detection(summary: DuplicateSummary, report_path: &Path) {
    println!("Done");
    println!("{summary}");
    println!("See {} for specifics", report_path.display());
}
