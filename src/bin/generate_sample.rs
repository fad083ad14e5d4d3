//! Write a synthetic LIBS acquisition file the loader accepts.
//!
//! Usage: cargo run --bin generate_sample -- --output sample_data/scan.h5

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate a synthetic LIBS HDF5 acquisition")]
struct Args {
    /// Output file
    #[arg(short, long, default_value = "sample_data/scan.h5")]
    output: PathBuf,

    /// Grid rows
    #[arg(long, default_value = "32")]
    height: usize,

    /// Grid columns
    #[arg(long, default_value = "48")]
    width: usize,

    /// Samples per spectrum
    #[arg(long, default_value = "1024")]
    bands: usize,

    /// PRNG seed
    #[arg(long, default_value = "42")]
    seed: u64,
}

/// Line profile of one emission line at wavelength `wl`.
fn line_intensity(wl: f64, (center, width, amplitude): (f64, f64, f64)) -> f64 {
    amplitude * (-(wl - center).powi(2) / (2.0 * width.powi(2))).exp()
}

/// Sum of `lines` over the calibration axis plus detector noise, clipped at 0.
fn synth_spectrum<R: Rng>(
    wavelengths: &[f64],
    lines: &[(f64, f64, f64)],
    noise: &Normal<f64>,
    rng: &mut R,
) -> Vec<f64> {
    wavelengths
        .iter()
        .map(|&wl| {
            let signal: f64 = lines.iter().map(|&line| line_intensity(wl, line)).sum();
            (signal + noise.sample(&mut *rng)).max(0.0)
        })
        .collect()
}

// Emission lines (nm, width, amplitude) of the two phases in the sample.
const MATRIX_LINES: [(f64, f64, f64); 3] = [
    (393.37, 0.4, 1.0), // Ca II
    (396.85, 0.4, 0.8), // Ca II
    (422.67, 0.5, 0.3), // Ca I
];
const INCLUSION_LINES: [(f64, f64, f64); 3] = [
    (588.99, 0.5, 0.9), // Na I
    (589.59, 0.5, 0.6), // Na I
    (656.28, 0.8, 0.4), // H alpha
];

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = StdRng::seed_from_u64(args.seed);
    let noise = Normal::new(0.0, 0.01).context("building noise distribution")?;

    // Calibration: 350 → 700 nm
    let step = 350.0 / args.bands.max(1) as f64;
    let wavelengths: Vec<f64> = (0..args.bands).map(|i| 350.0 + i as f64 * step).collect();

    let (cy, cx) = (args.height as f64 / 2.0, args.width as f64 / 2.0);
    let radius = args.height.min(args.width) as f64 / 4.0;

    let pixels = args.height * args.width;
    let mut xs = Vec::with_capacity(pixels);
    let mut ys = Vec::with_capacity(pixels);
    let mut data = Array2::<f64>::zeros((pixels, args.bands));

    for row in 0..args.height {
        for col in 0..args.width {
            let dist = ((row as f64 - cy).powi(2) + (col as f64 - cx).powi(2)).sqrt();
            let lines: &[(f64, f64, f64)] = if dist < radius {
                &INCLUSION_LINES
            } else {
                &MATRIX_LINES
            };
            let mut spectrum = synth_spectrum(&wavelengths, lines, &noise, &mut rng);
            // The stage scans even rows backwards; the spectrometer records
            // them mirrored.
            if row % 2 == 0 {
                spectrum.reverse();
            }

            let idx = row * args.width + col;
            data.row_mut(idx).assign(&Array1::from(spectrum));
            xs.push(row as i64);
            ys.push(col as i64);
        }
    }

    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = hdf5::File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let libs = file
        .create_group("sample")?
        .create_group("measurement_000")?
        .create_group("libs")?;
    let metadata = libs.create_group("metadata")?;
    metadata
        .new_dataset_builder()
        .with_data(&Array1::from(xs))
        .create("X")?;
    metadata
        .new_dataset_builder()
        .with_data(&Array1::from(ys))
        .create("Y")?;
    libs.new_dataset_builder().with_data(&data).create("data")?;
    libs.new_dataset_builder()
        .with_data(&Array1::from(wavelengths))
        .create("calibration")?;

    println!(
        "Wrote {}x{} pixels ({} bands each) to {}",
        args.height,
        args.width,
        args.bands,
        args.output.display()
    );
    Ok(())
}
