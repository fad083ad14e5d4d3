use std::io::Write;
use std::path::Path;

use ndarray::{Array1, Array2, Axis};
use thiserror::Error;

use crate::data::model::{Dataset, SpectralCube};

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("band {band} out of range (cube has {bands} bands)")]
    BandOutOfRange { band: usize, bands: usize },

    #[error("pixel ({row}, {col}) out of range for a {height}x{width} grid")]
    PixelOutOfRange {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },

    #[error("spectrum '{name}' has {len} values but the axis has {axis}")]
    LengthMismatch { name: String, len: usize, axis: usize },

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV export failed: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// 2D scalar maps
// ---------------------------------------------------------------------------

/// Total intensity per pixel (sum over bands), shape `[height, width]`.
pub fn intensity_map(cube: &SpectralCube) -> Array2<f64> {
    cube.as_array().sum_axis(Axis(2))
}

/// A single band as a `[height, width]` map.
pub fn band_map(cube: &SpectralCube, band: usize) -> Result<Array2<f64>, ViewError> {
    if band >= cube.bands() {
        return Err(ViewError::BandOutOfRange {
            band,
            bands: cube.bands(),
        });
    }
    Ok(cube.as_array().index_axis(Axis(2), band).to_owned())
}

/// Scale a map by its maximum so a colormap can take it directly.
///
/// A map whose maximum is not a positive finite number comes back as zeros.
pub fn normalize_by_max(map: &Array2<f64>) -> Array2<f64> {
    let max = map.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() || max <= 0.0 {
        return Array2::zeros(map.raw_dim());
    }
    map / max
}

// ---------------------------------------------------------------------------
// SpectraSeries – overlaid line spectra sharing one x axis
// ---------------------------------------------------------------------------

/// Named spectra over a common axis, ready for a line chart.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectraSeries {
    /// Wavelengths, or band indices when no calibration was given.
    pub axis: Vec<f64>,
    pub spectra: Vec<(String, Vec<f64>)>,
}

impl SpectraSeries {
    /// An empty series over `wavelengths`, or over `0..bands` when `None`.
    pub fn new(wavelengths: Option<&Array1<f64>>, bands: usize) -> Self {
        let axis = match wavelengths {
            Some(w) => w.to_vec(),
            None => (0..bands).map(|b| b as f64).collect(),
        };
        Self {
            axis,
            spectra: Vec::new(),
        }
    }

    /// Add a spectrum; it must have one value per axis point.
    pub fn push(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<(), ViewError> {
        let name = name.into();
        if values.len() != self.axis.len() {
            return Err(ViewError::LengthMismatch {
                name,
                len: values.len(),
                axis: self.axis.len(),
            });
        }
        self.spectra.push((name, values));
        Ok(())
    }

    /// The mean spectrum of the whole cube, named `mean`.
    pub fn mean_of(dataset: &Dataset) -> Self {
        let mut series = Self::new(Some(&dataset.wavelengths), dataset.cube.bands());
        series
            .spectra
            .push(("mean".to_string(), dataset.cube.mean_spectrum().to_vec()));
        series
    }

    /// Spectra of the given `(row, col)` pixels, named `pixel r,c`.
    pub fn from_pixels(dataset: &Dataset, pixels: &[(usize, usize)]) -> Result<Self, ViewError> {
        let mut series = Self::new(Some(&dataset.wavelengths), dataset.cube.bands());
        for &(row, col) in pixels {
            series.add_pixel(&dataset.cube, row, col)?;
        }
        Ok(series)
    }

    pub fn add_pixel(
        &mut self,
        cube: &SpectralCube,
        row: usize,
        col: usize,
    ) -> Result<(), ViewError> {
        let spectrum = cube
            .spectrum(row, col)
            .ok_or(ViewError::PixelOutOfRange {
                row,
                col,
                height: cube.height(),
                width: cube.width(),
            })?;
        self.push(format!("pixel {row},{col}"), spectrum.to_vec())
    }

    /// Copy with every spectrum min-max scaled to `[0, 1]`.
    /// Flat spectra become all zeros.
    pub fn minmax_scaled(&self) -> Self {
        let spectra = self
            .spectra
            .iter()
            .map(|(name, y)| {
                let min = y.iter().cloned().fold(f64::INFINITY, f64::min);
                let max = y.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                let range = max - min;
                let scaled = if range.abs() < f64::EPSILON {
                    vec![0.0; y.len()]
                } else {
                    y.iter().map(|&yi| (yi - min) / range).collect()
                };
                (name.clone(), scaled)
            })
            .collect();
        Self {
            axis: self.axis.clone(),
            spectra,
        }
    }

    /// Write as CSV: a `wavelength` column followed by one column per spectrum.
    pub fn write_csv(&self, path: &Path) -> Result<(), ViewError> {
        let file = std::fs::File::create(path)?;
        self.write_csv_to(file)
    }

    pub fn write_csv_to<W: Write>(&self, writer: W) -> Result<(), ViewError> {
        let mut wtr = csv::Writer::from_writer(writer);

        let mut header = vec!["wavelength".to_string()];
        header.extend(self.spectra.iter().map(|(name, _)| name.clone()));
        wtr.write_record(&header)?;

        for (i, x) in self.axis.iter().enumerate() {
            let mut record = vec![x.to_string()];
            record.extend(self.spectra.iter().map(|(_, y)| y[i].to_string()));
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
