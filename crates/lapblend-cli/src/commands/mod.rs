//! CLI command implementations

pub mod blend;

use anyhow::{Context, Result};
use lapblend_core::Image;
use lapblend_io::ReadMode;
use std::path::Path;

/// Load image from path
pub fn load_image(path: &Path, mode: ReadMode) -> Result<Image> {
    lapblend_io::read_image(path, mode)
        .with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save image to path
pub fn save_image(path: &Path, image: &Image) -> Result<()> {
    lapblend_io::write_image(path, image)
        .with_context(|| format!("Failed to save: {}", path.display()))
}
