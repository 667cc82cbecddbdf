//! Trait component lookup and layered PNG compositing

use crate::io::configuration::IMAGE_EXTENSION;
use crate::io::error::{CollectionError, Result};
use crate::model::{Record, TraitSchema};
use image::{DynamicImage, RgbaImage, imageops};
use std::path::{Path, PathBuf};

/// Maps `(trait, variant)` pairs to layer images under a components directory
///
/// Layers are looked up as `<root>/<trait>/<variant>.png` first, then as
/// `<root>/<variant>.png` for flat component directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentStore {
    root: PathBuf,
}

impl ComponentStore {
    /// Create a store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the components
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn nested_path(&self, trait_name: &str, variant: &str) -> PathBuf {
        self.root
            .join(trait_name)
            .join(format!("{variant}.{IMAGE_EXTENSION}"))
    }

    fn flat_path(&self, variant: &str) -> PathBuf {
        self.root.join(format!("{variant}.{IMAGE_EXTENSION}"))
    }

    /// Locate the layer image for a trait variant
    ///
    /// # Errors
    ///
    /// Returns `MissingAsset` if neither layout contains the image
    pub fn resolve(&self, trait_name: &str, variant: &str) -> Result<PathBuf> {
        let nested = self.nested_path(trait_name, variant);
        if nested.is_file() {
            return Ok(nested);
        }

        let flat = self.flat_path(variant);
        if flat.is_file() {
            return Ok(flat);
        }

        Err(CollectionError::MissingAsset {
            trait_name: trait_name.to_string(),
            variant: variant.to_string(),
            path: nested,
        })
    }

    /// Check that every variant of every trait has a layer image
    ///
    /// # Errors
    ///
    /// Returns `MissingAsset` for the first variant without an image
    pub fn validate(&self, schema: &TraitSchema) -> Result<()> {
        for definition in schema.traits() {
            for variant in &definition.variants {
                self.resolve(&definition.name, variant)?;
            }
        }
        Ok(())
    }

    /// Layer paths for a record, bottom layer first
    ///
    /// # Errors
    ///
    /// Returns `MissingAsset` if any layer cannot be found
    pub fn layers_for(&self, schema: &TraitSchema, record: &Record) -> Result<Vec<PathBuf>> {
        schema
            .traits()
            .iter()
            .zip(record.assignment.values())
            .map(|(definition, variant)| self.resolve(&definition.name, variant))
            .collect()
    }
}

/// Flattens an ordered stack of layers into one image file
pub trait Compositor {
    /// Combine `layers` (bottom first) and write the result to `output`
    ///
    /// # Errors
    ///
    /// Returns an error if a layer cannot be loaded or combined, or the
    /// result cannot be saved
    fn composite(&self, layers: &[PathBuf], output: &Path) -> Result<()>;
}

/// Alpha-blends same-sized PNG layers and saves the result as RGB
#[derive(Debug, Clone, Copy, Default)]
pub struct LayeredCompositor;

impl LayeredCompositor {
    fn load_layer(path: &Path) -> Result<RgbaImage> {
        image::open(path)
            .map(|img| img.to_rgba8())
            .map_err(|e| CollectionError::ImageLoad {
                path: path.to_path_buf(),
                source: e,
            })
    }

    /// Blend `layers` in order into a single RGBA image
    ///
    /// # Errors
    ///
    /// Returns an error if there are no layers, a layer cannot be loaded, or a
    /// layer's dimensions differ from the bottom layer
    pub fn flatten(layers: &[PathBuf]) -> Result<RgbaImage> {
        let (bottom, rest) = layers
            .split_first()
            .ok_or_else(|| CollectionError::InvalidAsset {
                path: PathBuf::new(),
                reason: "no layers to composite".to_string(),
            })?;

        let mut canvas = Self::load_layer(bottom)?;
        for path in rest {
            let layer = Self::load_layer(path)?;
            if layer.dimensions() != canvas.dimensions() {
                return Err(CollectionError::InvalidAsset {
                    path: path.clone(),
                    reason: format!(
                        "layer is {}x{} but the bottom layer is {}x{}",
                        layer.width(),
                        layer.height(),
                        canvas.width(),
                        canvas.height()
                    ),
                });
            }
            imageops::overlay(&mut canvas, &layer, 0, 0);
        }

        Ok(canvas)
    }
}

impl Compositor for LayeredCompositor {
    fn composite(&self, layers: &[PathBuf], output: &Path) -> Result<()> {
        let flattened = Self::flatten(layers)?;
        DynamicImage::ImageRgba8(flattened)
            .to_rgb8()
            .save(output)
            .map_err(|e| CollectionError::ImageExport {
                path: output.to_path_buf(),
                source: e,
            })
    }
}
