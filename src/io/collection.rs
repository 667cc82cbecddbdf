//! The generate pass: unique combinations, layered images and the metadata table
//!
//! The whole collection is assembled in a staging directory beside the output
//! directory and only swapped into place once every image and the table have
//! been written. A failed run leaves any previous collection untouched.

use crate::algorithm::generator::{CombinationGenerator, GenerationStats, all_unique};
use crate::io::compositor::{ComponentStore, Compositor};
use crate::io::configuration::{METADATA_FILE_NAME, STAGING_PREFIX};
use crate::io::error::{CollectionError, Result, WithContext, invalid_parameter};
use crate::io::metadata::{TableFormat, write_metadata};
use crate::io::progress::ProgressManager;
use crate::model::{MetadataTable, TraitSchema};
use log::{info, warn};
use rand::{SeedableRng, rngs::StdRng};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Parameters of one generate pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionOptions {
    /// Number of unique images to produce
    pub count: usize,
    /// Seed for the sampling RNG
    pub seed: u64,
    /// Draws allowed per image before generation is reported as stalled
    pub max_attempts: usize,
    /// Directory that will hold the images and the metadata table
    pub output_dir: PathBuf,
    /// Delimiter and quoting of the metadata table
    pub format: TableFormat,
}

/// What a finished generate pass produced
#[derive(Debug, Clone)]
pub struct CollectionSummary {
    /// Generated records with their trait columns
    pub table: MetadataTable,
    /// Result of the post-generation uniqueness check
    pub all_unique: bool,
    /// Rejection sampling counters
    pub stats: GenerationStats,
    /// Number of composited images written
    pub images_written: usize,
    /// Location of the published metadata table
    pub metadata_path: PathBuf,
}

/// Runs the generate pass for one schema
pub struct CollectionBuilder<'a> {
    schema: &'a TraitSchema,
    options: CollectionOptions,
    assets: Option<(ComponentStore, Box<dyn Compositor + 'a>)>,
    progress: Option<ProgressManager>,
}

impl<'a> CollectionBuilder<'a> {
    /// Create a builder producing only the metadata table
    pub const fn new(schema: &'a TraitSchema, options: CollectionOptions) -> Self {
        Self {
            schema,
            options,
            assets: None,
            progress: None,
        }
    }

    /// Also composite an image per record from the given components
    #[must_use]
    pub fn with_images(mut self, store: ComponentStore, compositor: impl Compositor + 'a) -> Self {
        self.assets = Some((store, Box::new(compositor)));
        self
    }

    /// Report stage progress on the terminal
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressManager) -> Self {
        self.progress = Some(progress);
        self
    }

    fn validate(&self) -> Result<()> {
        if self.options.count == 0 {
            return Err(invalid_parameter(
                "count",
                &self.options.count,
                &"at least one image must be requested",
            ));
        }
        if self.options.max_attempts == 0 {
            return Err(invalid_parameter(
                "max_attempts",
                &self.options.max_attempts,
                &"at least one draw per image is required",
            ));
        }
        if self.options.output_dir.file_name().is_none() {
            return Err(invalid_parameter(
                "output",
                &self.options.output_dir.display(),
                &"must name a directory that can be replaced",
            ));
        }
        if let Some((store, _)) = &self.assets {
            store.validate(self.schema)?;
        }
        Ok(())
    }

    /// Generate the collection and publish it to the output directory
    ///
    /// # Errors
    ///
    /// Returns a configuration error before any work if the parameters or
    /// components are invalid, `CapacityExhausted`/`GenerationStalled` if the
    /// combinations cannot be drawn, or a storage error if publishing fails
    pub fn build(mut self) -> Result<CollectionSummary> {
        self.validate()?;

        let rng = StdRng::seed_from_u64(self.options.seed);
        let mut generator = CombinationGenerator::new(self.schema, rng)
            .with_max_attempts(self.options.max_attempts);

        if let Some(pm) = self.progress.as_mut() {
            pm.start_stage("Combining Images", self.options.count);
        }
        let progress = self.progress.as_ref();
        let records = generator.generate_with(self.options.count, |record| {
            if let Some(pm) = progress {
                pm.advance(&record.file);
            }
        })?;

        let unique = all_unique(&records);
        info!("Are all images unique? {unique}");
        if !unique {
            warn!("Generated collection contains repeated trait combinations");
        }

        let table = MetadataTable::from_schema(self.schema, records);
        let parent = parent_dir(&self.options.output_dir);
        fs::create_dir_all(parent).with_path(parent, "create directory")?;
        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(parent)
            .with_path(parent, "create staging directory")?;

        let images_written = self.composite_images(&table, staging.path())?;

        let staged_table = staging.path().join(METADATA_FILE_NAME);
        write_metadata(&table, &staged_table, self.options.format)?;

        publish(&staging, &self.options.output_dir)?;

        if let Some(pm) = self.progress.as_mut() {
            pm.finish();
        }

        let metadata_path = self.options.output_dir.join(METADATA_FILE_NAME);
        info!(
            "Assembled {} records ({} images) into '{}'",
            table.records().len(),
            images_written,
            self.options.output_dir.display()
        );

        Ok(CollectionSummary {
            table,
            all_unique: unique,
            stats: generator.stats,
            images_written,
            metadata_path,
        })
    }

    fn composite_images(&mut self, table: &MetadataTable, staging: &Path) -> Result<usize> {
        let Some((store, compositor)) = &self.assets else {
            return Ok(0);
        };

        if let Some(pm) = self.progress.as_mut() {
            pm.start_stage("Assembling Images", table.records().len());
        }

        for record in table.records() {
            let layers = store.layers_for(self.schema, record)?;
            compositor.composite(&layers, &staging.join(&record.file))?;
            if let Some(pm) = self.progress.as_ref() {
                pm.advance(&record.file);
            }
        }

        Ok(table.records().len())
    }
}

fn parent_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Swap the staged collection into `output`, restoring the old one on failure
fn publish(staging: &TempDir, output: &Path) -> Result<()> {
    let parent = parent_dir(output);
    let retired = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(parent)
        .with_path(parent, "create staging directory")?;
    let previous = retired.path().join("previous");

    let had_previous = output.exists();
    if had_previous {
        fs::rename(output, &previous).with_path(output, "move previous collection")?;
    }

    if let Err(source) = fs::rename(staging.path(), output) {
        if had_previous {
            if let Err(restore) = fs::rename(&previous, output) {
                warn!(
                    "Could not restore previous collection from '{}': {restore}",
                    previous.display()
                );
            }
        }
        return Err(CollectionError::FileSystem {
            path: output.to_path_buf(),
            operation: "publish collection",
            source,
        });
    }

    Ok(())
}
