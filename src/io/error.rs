//! Error types and context management for collection operations

use std::fmt;
use std::path::{Path, PathBuf};

const UNKNOWN_PATH: &str = "<unknown>";

/// Main error type for all collection operations
#[derive(Debug)]
pub enum CollectionError {
    /// Trait schema violates a structural invariant
    InvalidSchema {
        /// Trait the problem was found in, if it concerns a single trait
        trait_name: Option<String>,
        /// Explanation of the violated invariant
        reason: String,
    },

    /// Schema file could not be decoded
    SchemaParse {
        /// Path to the schema file
        path: PathBuf,
        /// Underlying decoding error
        source: serde_json::Error,
    },

    /// No layer image exists for a trait variant
    MissingAsset {
        /// Trait owning the variant
        trait_name: String,
        /// Variant without an image
        variant: String,
        /// Preferred location that was searched
        path: PathBuf,
    },

    /// Layer image cannot be combined with the others
    InvalidAsset {
        /// Path to the offending layer
        path: PathBuf,
        /// Explanation of the incompatibility
        reason: String,
    },

    /// Command-line or runtime parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// More unique records were requested than the schema can produce
    CapacityExhausted {
        /// Number of records requested
        requested: usize,
        /// Number of distinct assignments the schema allows
        capacity: u128,
    },

    /// Rejection sampling hit the retry ceiling for one record
    GenerationStalled {
        /// 1-based number of the record being drawn
        record: usize,
        /// Draws made for that record before giving up
        attempts: usize,
    },

    /// Table header does not describe a metadata table
    MalformedHeader {
        /// Path to the table
        path: PathBuf,
        /// Description of what's wrong with the header
        reason: String,
    },

    /// Table row has a different column count than the header
    MalformedRecord {
        /// Path to the table
        path: PathBuf,
        /// 1-based line number of the row
        line: u64,
        /// Column count declared by the header
        expected: usize,
        /// Column count found in the row
        found: usize,
    },

    /// Failed to load a layer image
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save a composited image
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// Delimited text could not be read or written
    Csv {
        /// Path to the table
        path: PathBuf,
        /// Underlying CSV error
        source: csv::Error,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl CollectionError {
    /// True for errors caused by the schema, assets or parameters rather than by the run
    ///
    /// These are detected before generation begins and are never retried.
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidSchema { .. }
                | Self::SchemaParse { .. }
                | Self::MissingAsset { .. }
                | Self::InvalidAsset { .. }
                | Self::InvalidParameter { .. }
        )
    }
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSchema {
                trait_name: Some(name),
                reason,
            } => write!(f, "Invalid schema: trait '{name}': {reason}"),
            Self::InvalidSchema {
                trait_name: None,
                reason,
            } => write!(f, "Invalid schema: {reason}"),
            Self::SchemaParse { path, source } => {
                write!(f, "Failed to parse schema '{}': {source}", path.display())
            }
            Self::MissingAsset {
                trait_name,
                variant,
                path,
            } => write!(
                f,
                "Missing component for trait '{trait_name}' variant '{variant}' (expected '{}')",
                path.display()
            ),
            Self::InvalidAsset { path, reason } => {
                write!(f, "Invalid component '{}': {reason}", path.display())
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::CapacityExhausted {
                requested,
                capacity,
            } => write!(
                f,
                "Requested {requested} unique images but the schema only allows {capacity} combinations"
            ),
            Self::GenerationStalled { record, attempts } => write!(
                f,
                "Generation stalled on image {record}: no unique combination after {attempts} attempts"
            ),
            Self::MalformedHeader { path, reason } => {
                write!(f, "Malformed header in '{}': {reason}", path.display())
            }
            Self::MalformedRecord {
                path,
                line,
                expected,
                found,
            } => write!(
                f,
                "Malformed record at line {line} of '{}': expected {expected} columns, found {found}",
                path.display()
            ),
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::Csv { path, source } => {
                write!(f, "Delimited text error in '{}': {source}", path.display())
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for CollectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SchemaParse { source, .. } => Some(source),
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for collection results
pub type Result<T> = std::result::Result<T, CollectionError>;

/// Additional context to enrich error messages
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// File or directory the failing operation touched
    pub path: Option<PathBuf>,
    /// Operation being performed
    pub operation: Option<&'static str>,
}

/// Enriches storage errors with the path and operation that failed
pub trait WithContext<T> {
    /// Add error context to a Result
    ///
    /// # Errors
    ///
    /// Propagates the original error with additional context applied
    fn with_context(self, context: ErrorContext) -> Result<T>;

    /// Add the path and operation context
    ///
    /// # Errors
    ///
    /// Propagates the original error with the path and operation applied
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T>;
}

impl<T, E> WithContext<T> for std::result::Result<T, E>
where
    E: Into<CollectionError>,
{
    fn with_context(self, context: ErrorContext) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            // Only storage errors carry a location worth filling in
            match &mut error {
                CollectionError::FileSystem {
                    path, operation, ..
                } => {
                    if let Some(ctx_path) = &context.path {
                        path.clone_from(ctx_path);
                    }
                    if let Some(op) = context.operation {
                        *operation = op;
                    }
                }
                CollectionError::Csv { path, .. }
                | CollectionError::ImageLoad { path, .. }
                | CollectionError::ImageExport { path, .. } => {
                    if let Some(ctx_path) = &context.path {
                        path.clone_from(ctx_path);
                    }
                }
                _ => {}
            }
            error
        })
    }

    fn with_path(self, path: &Path, operation: &'static str) -> Result<T> {
        self.with_context(ErrorContext {
            path: Some(path.to_path_buf()),
            operation: Some(operation),
        })
    }
}

impl From<image::ImageError> for CollectionError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from(UNKNOWN_PATH),
            source: err,
        }
    }
}

impl From<std::io::Error> for CollectionError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from(UNKNOWN_PATH),
            operation: "unknown",
            source: err,
        }
    }
}

impl From<csv::Error> for CollectionError {
    fn from(err: csv::Error) -> Self {
        Self::Csv {
            path: PathBuf::from(UNKNOWN_PATH),
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> CollectionError {
    CollectionError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a schema validation error
pub fn invalid_schema(trait_name: Option<&str>, reason: &impl ToString) -> CollectionError {
    CollectionError::InvalidSchema {
        trait_name: trait_name.map(str::to_string),
        reason: reason.to_string(),
    }
}
