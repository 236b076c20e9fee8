//! lapblend - blend two images with a Laplacian pyramid
//!
//! Reads images A and B in color and a mask in grayscale, blends them band by
//! band and writes the result as an 8-bit image.

use anyhow::{Context, Result};
use clap::{Args, Parser, ValueEnum};
use lapblend_ops::BorderMode;
use std::path::PathBuf;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "lapblend")]
#[command(author, version, about = "Laplacian pyramid image blending")]
#[command(long_about = "
Blends image A and image B using a mask. White mask pixels select A, black
pixels select B, and each frequency band is mixed with a progressively
smoother copy of the mask so seams vanish.

Examples:
  lapblend -a apple.png -b orange.png -m half.png -l 4
  lapblend -a a.jpg -b b.jpg -m mask.png -l 6 -o out.png --sigma 2.5
  RUST_LOG=lapblend_ops=trace lapblend -a a.png -b b.png -m m.png -l 3
")]
struct Cli {
    #[command(flatten)]
    blend: BlendArgs,

    /// Verbose output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, default_value = "0")]
    threads: usize,
}

#[derive(Args, Debug)]
struct BlendArgs {
    /// Image A (selected where the mask is white)
    #[arg(short = 'a', value_name = "PATH")]
    image_a: PathBuf,

    /// Image B (selected where the mask is black)
    #[arg(short = 'b', value_name = "PATH")]
    image_b: PathBuf,

    /// Mask image, read as grayscale
    #[arg(short = 'm', value_name = "PATH")]
    mask: PathBuf,

    /// Number of pyramid levels
    #[arg(short = 'l', value_name = "N")]
    levels: usize,

    /// Output file
    #[arg(short = 'o', value_name = "PATH", default_value = "blended.png")]
    output: PathBuf,

    /// Gaussian sigma (<= 0 derives it from the kernel size)
    #[arg(long, default_value_t = lapblend_ops::pyramid::DEFAULT_SIGMA, allow_negative_numbers = true)]
    sigma: f32,

    /// Border handling for the blur
    #[arg(long, value_enum, default_value_t = BorderArg::Reflect101)]
    border: BorderArg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum BorderArg {
    /// Mirror without repeating the edge sample
    #[value(name = "reflect101")]
    Reflect101,
    /// Repeat the edge sample
    Replicate,
    /// Mirror including the edge sample
    Reflect,
}

impl From<BorderArg> for BorderMode {
    fn from(arg: BorderArg) -> Self {
        match arg {
            BorderArg::Reflect101 => BorderMode::Reflect101,
            BorderArg::Replicate => BorderMode::Replicate,
            BorderArg::Reflect => BorderMode::Reflect,
        }
    }
}

/// `RUST_LOG` wins; otherwise `-v` raises the default level step by step.
fn init_logging(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    commands::blend::run(cli.blend, cli.verbose)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("lapblend").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["-a", "a.png", "-b", "b.png", "-m", "m.png", "-l", "4"]).unwrap();
        assert_eq!(cli.blend.output, PathBuf::from("blended.png"));
        assert_eq!(cli.blend.levels, 4);
        assert_eq!(cli.blend.sigma, 4.0);
        assert_eq!(cli.blend.border, BorderArg::Reflect101);
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.threads, 0);
    }

    #[test]
    fn test_missing_mask_fails() {
        let err = parse(&["-a", "a.png", "-b", "b.png", "-l", "4"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_negative_levels_fail() {
        assert!(parse(&["-a", "a.png", "-b", "b.png", "-m", "m.png", "-l", "-1"]).is_err());
    }

    #[test]
    fn test_non_integer_levels_fail() {
        let err = parse(&["-a", "a.png", "-b", "b.png", "-m", "m.png", "-l", "two"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_all_flags() {
        let cli = parse(&[
            "-a", "x.jpg", "-b", "y.jpg", "-m", "z.png", "-l", "0", "-o", "out.jpg",
            "--sigma", "1.5", "--border", "replicate", "-vv", "-j", "2",
        ])
        .unwrap();
        assert_eq!(cli.blend.levels, 0);
        assert_eq!(cli.blend.output, PathBuf::from("out.jpg"));
        assert_eq!(cli.blend.sigma, 1.5);
        assert_eq!(BorderMode::from(cli.blend.border), BorderMode::Replicate);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.threads, 2);
    }

    #[test]
    fn test_unknown_border_fails() {
        assert!(parse(&["-a", "a", "-b", "b", "-m", "m", "-l", "1", "--border", "zero"]).is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
