//! Blend command
//!
//! Loads A and B in color and the mask in grayscale, runs the pyramid blend
//! and writes the result.

use crate::BlendArgs;
use anyhow::{Context, Result};
use lapblend_io::ReadMode;
use lapblend_ops::{pyramid_blend, BlendConfig, PyramidConfig};
use std::time::Instant;
use tracing::{info, trace};

pub fn run(args: BlendArgs, verbose: u8) -> Result<()> {
    trace!(
        a = %args.image_a.display(),
        b = %args.image_b.display(),
        mask = %args.mask.display(),
        levels = args.levels,
        "blend::run"
    );

    let a = super::load_image(&args.image_a, ReadMode::Color)?;
    let b = super::load_image(&args.image_b, ReadMode::Color)?;
    let mask = super::load_image(&args.mask, ReadMode::Grayscale)?;
    info!(shape = %a.shape(), "inputs loaded");

    let config = BlendConfig::new(args.levels).with_pyramid(PyramidConfig {
        sigma: args.sigma,
        border: args.border.into(),
        ..PyramidConfig::default()
    });

    if verbose > 0 {
        println!(
            "Blending {} and {} through {} ({} levels)",
            args.image_a.display(),
            args.image_b.display(),
            args.mask.display(),
            args.levels
        );
    }

    let start = Instant::now();
    let blended = pyramid_blend(&a, &b, &mask, &config).with_context(|| {
        format!(
            "Failed to blend {} with {}",
            args.image_a.display(),
            args.image_b.display()
        )
    })?;
    info!(elapsed_ms = start.elapsed().as_millis() as u64, "blend finished");

    super::save_image(&args.output, &blended)?;
    info!(output = %args.output.display(), "written");

    if verbose > 0 {
        println!("Wrote {}", args.output.display());
    }

    Ok(())
}
