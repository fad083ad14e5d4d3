//! Load a LIBS acquisition directory and summarise the cube.
//!
//! Usage: libs-cube <ROOT> [--schema schema.json] [--export spectra.csv --pixel 0,0]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use libs_cube::view::{self, SpectraSeries};
use libs_cube::{scan_directory, LoaderSchema, SerpentineAxis};

#[derive(Parser, Debug)]
#[command(author, version, about = "Load a hyperspectral LIBS cube from HDF5 files")]
struct Args {
    /// Directory searched recursively for acquisition files
    root: PathBuf,

    /// JSON file overriding the expected file layout
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Serpentine correction applied to even rows (bands, columns, none)
    #[arg(long)]
    serpentine: Option<SerpentineAxis>,

    /// Accept files whose coordinates do not form a dense grid
    #[arg(long)]
    no_dense_check: bool,

    /// Write the mean spectrum (and any --pixel spectra) to this CSV file
    #[arg(long)]
    export: Option<PathBuf>,

    /// Pixel to include in the export, as ROW,COL (repeatable)
    #[arg(long, value_parser = parse_pixel)]
    pixel: Vec<(usize, usize)>,
}

fn parse_pixel(s: &str) -> std::result::Result<(usize, usize), String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got '{s}'"))?;
    let row = row.trim().parse().map_err(|e| format!("bad row '{row}': {e}"))?;
    let col = col.trim().parse().map_err(|e| format!("bad column '{col}': {e}"))?;
    Ok((row, col))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut schema = match &args.schema {
        Some(path) => LoaderSchema::from_json_file(path)?,
        None => LoaderSchema::default(),
    };
    if let Some(axis) = args.serpentine {
        schema.serpentine = axis;
    }
    if args.no_dense_check {
        schema.require_dense_grid = false;
    }

    let (dataset, report) = scan_directory(&args.root, &schema)
        .with_context(|| format!("loading dataset from {}", args.root.display()))?;

    println!("File:        {}", dataset.source.display());
    println!("Dimensions:  {} x {}", dataset.dim[0], dataset.dim[1]);
    println!("Bands:       {}", dataset.cube.bands());
    if let Some((min, max)) = dataset.wavelength_range() {
        println!("Wavelengths: {min:.3} – {max:.3}");
    }
    let intensity = view::intensity_map(&dataset.cube);
    let peak = intensity.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    println!("Peak pixel intensity: {peak:.3}");
    if !report.skipped.is_empty() {
        println!("Skipped {} file(s):", report.skipped.len());
        for skipped in &report.skipped {
            println!("  {}: {}", skipped.path.display(), skipped.reason);
        }
    }

    if let Some(out) = &args.export {
        let mut series = SpectraSeries::mean_of(&dataset);
        for &(row, col) in &args.pixel {
            series.add_pixel(&dataset.cube, row, col)?;
        }
        series
            .write_csv(out)
            .with_context(|| format!("writing {}", out.display()))?;
        println!("Wrote {} spectra to {}", series.spectra.len(), out.display());
    }

    Ok(())
}
