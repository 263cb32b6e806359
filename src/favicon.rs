use crate::icondir::{IconDir, IconDirEntry};
use crate::sizes::{
    filter_images_by_sizes, png_file_name, ImageInfo, REQUIRED_ICO_IMAGE_SIZES,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

//===========================================================================//

// The default file name stem of the generated ICO file.
const DEFAULT_ICO_NAME: &str = "favicon";

//===========================================================================//

/// Settings for generating a favicon set.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FaviconOptions {
    ico_name: String,
    write_ico: bool,
    write_png: bool,
}

impl Default for FaviconOptions {
    fn default() -> FaviconOptions {
        FaviconOptions {
            ico_name: DEFAULT_ICO_NAME.to_string(),
            write_ico: true,
            write_png: true,
        }
    }
}

impl FaviconOptions {
    /// Returns the file name stem of the ICO file (`"favicon"` by default);
    /// the `.ico` extension is appended when writing.
    pub fn ico_name(&self) -> &str {
        &self.ico_name
    }

    /// Sets the file name stem of the ICO file.
    pub fn with_ico_name<S: Into<String>>(mut self, name: S) -> Self {
        self.ico_name = name.into();
        self
    }

    /// Returns whether the ICO file will be written.
    pub fn write_ico(&self) -> bool {
        self.write_ico
    }

    /// Enables or disables writing the ICO file.
    pub fn with_write_ico(mut self, enabled: bool) -> Self {
        self.write_ico = enabled;
        self
    }

    /// Returns whether the standalone PNG files will be written.
    pub fn write_png(&self) -> bool {
        self.write_png
    }

    /// Enables or disables copying the standalone PNG files.
    pub fn with_write_png(mut self, enabled: bool) -> Self {
        self.write_png = enabled;
        self
    }

    /// Returns true if at least one kind of output is enabled.
    pub fn generates_anything(&self) -> bool {
        self.write_ico || self.write_png
    }

    fn ico_path(&self, dir: &Path) -> io::Result<PathBuf> {
        if self.ico_name.is_empty() {
            invalid_input!("ICO file name must not be empty");
        }
        if self.ico_name.contains(|ch: char| ch == '/' || ch == '\\') {
            invalid_input!(
                "ICO file name must not contain a path separator (was {:?})",
                self.ico_name
            );
        }
        Ok(dir.join(format!("{}.ico", self.ico_name)))
    }
}

//===========================================================================//

/// Generates the complete favicon set into `dir`: the ICO file first, then
/// the standalone PNG files.  Returns the paths of every file written, in
/// that order.
pub fn generate_favicon(
    images: &[ImageInfo],
    dir: &Path,
    options: &FaviconOptions,
) -> io::Result<Vec<PathBuf>> {
    let mut results = Vec::new();
    if !options.generates_anything() {
        return Ok(results);
    }
    info!("Favicon:");
    if options.write_ico() {
        results.extend(generate_ico(images, dir, options)?);
    }
    if options.write_png() {
        results.extend(generate_png(images, dir)?);
    }
    Ok(results)
}

/// Assembles the images whose sizes belong in the ICO file into a single
/// ICO file in `dir`.  Returns the path of the file, or `None` if none of
/// the images has a suitable size.
pub fn generate_ico(
    images: &[ImageInfo],
    dir: &Path,
    options: &FaviconOptions,
) -> io::Result<Option<PathBuf>> {
    let path = options.ico_path(dir)?;
    let targets = filter_images_by_sizes(images, REQUIRED_ICO_IMAGE_SIZES);
    for &size in REQUIRED_ICO_IMAGE_SIZES.iter() {
        if !targets.iter().any(|image| image.size == size) {
            warn!("No {}x{} image for {}", size, size, path.display());
        }
    }
    if targets.is_empty() {
        return Ok(None);
    }
    let mut icondir = IconDir::new();
    let mut seen_sizes = Vec::<u32>::with_capacity(targets.len());
    for image in targets {
        if seen_sizes.contains(&image.size) {
            debug!(
                "Skipping {}; already have a {}x{} image",
                image.path.display(),
                image.size,
                image.size
            );
            continue;
        }
        seen_sizes.push(image.size);
        let entry = IconDirEntry::from_png_data(fs::read(&image.path)?)?;
        if entry.width() != image.size || entry.height() != image.size {
            invalid_input!(
                "Image {} is {}x{}, but was listed as {}x{}",
                image.path.display(),
                entry.width(),
                entry.height(),
                image.size,
                image.size
            );
        }
        icondir.add_entry(entry);
    }
    icondir.sort_entries();
    let mut writer = BufWriter::new(fs::File::create(&path)?);
    icondir.write(&mut writer)?;
    writer.flush()?;
    info!("  Create: {}", path.display());
    Ok(Some(path))
}

/// Copies each image whose size is published as a standalone PNG into
/// `dir` under its favicon file name.  Images of other sizes are ignored.
/// Returns the paths of the copies.
pub fn generate_png(
    images: &[ImageInfo],
    dir: &Path,
) -> io::Result<Vec<PathBuf>> {
    let mut results = Vec::new();
    for image in images {
        let name = match png_file_name(image.size) {
            Some(name) => name,
            None => {
                debug!("Skipping {}", image.path.display());
                continue;
            }
        };
        let dest = dir.join(name);
        fs::copy(&image.path, &dest)?;
        info!("  Create: {}", dest.display());
        results.push(dest);
    }
    Ok(results)
}

//===========================================================================//


//===========================================================================//
