//! Collection constants and runtime configuration defaults

// Table layout
/// Name of the identifier column that precedes the trait columns
pub const FILE_COLUMN: &str = "File";
/// Extension appended to every positional identifier
pub const IMAGE_EXTENSION: &str = "png";
/// File name of the metadata table inside the output directory
pub const METADATA_FILE_NAME: &str = "metadata.csv";
/// Field delimiter used when none is given
pub const DEFAULT_DELIMITER: char = ',';
/// Quote character used when none is given
pub const DEFAULT_QUOTE: char = '"';

// Generation defaults
/// Fixed seed for reproducible collections
pub const DEFAULT_SEED: u64 = 42;
/// Number of images generated when no count is given
pub const DEFAULT_IMAGE_COUNT: usize = 10;
// Rejection sampling
/// Maximum draws for a single record before generation is reported as stalled
pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;

// Default locations, relative to the working directory
/// Directory holding the per-trait layer images
pub const DEFAULT_COMPONENTS_DIR: &str = "components";
/// Directory receiving the generated images and metadata table
pub const DEFAULT_OUTPUT_DIR: &str = "collection";
/// Path of the duplicate report
pub const DEFAULT_REPORT_PATH: &str = "identified_duplicates.csv";
/// Prefix of the staging directory built next to the output directory
pub const STAGING_PREFIX: &str = ".layerforge-staging-";

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 32;
