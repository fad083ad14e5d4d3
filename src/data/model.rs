use std::path::PathBuf;

use ndarray::{Array1, Array3, ArrayView1, Axis};

// ---------------------------------------------------------------------------
// SpectralCube – [height, width, bands] intensities
// ---------------------------------------------------------------------------

/// A hyperspectral cube: one spectrum of `bands` intensities per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralCube {
    data: Array3<f64>,
}

impl SpectralCube {
    pub fn new(data: Array3<f64>) -> Self {
        Self { data }
    }

    pub fn height(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    pub fn width(&self) -> usize {
        self.data.len_of(Axis(1))
    }

    pub fn bands(&self) -> usize {
        self.data.len_of(Axis(2))
    }

    /// `[height, width, bands]`.
    pub fn shape(&self) -> [usize; 3] {
        [self.height(), self.width(), self.bands()]
    }

    /// The spectrum recorded at pixel (`row`, `col`), if inside the grid.
    pub fn spectrum(&self, row: usize, col: usize) -> Option<ArrayView1<'_, f64>> {
        if row >= self.height() || col >= self.width() {
            return None;
        }
        Some(self.data.slice(ndarray::s![row, col, ..]))
    }

    /// Mean over all pixels, one value per band.
    pub fn mean_spectrum(&self) -> Array1<f64> {
        let pixels = self.height() * self.width();
        if pixels == 0 {
            return Array1::zeros(self.bands());
        }
        self.data.sum_axis(Axis(0)).sum_axis(Axis(0)) / pixels as f64
    }

    pub fn as_array(&self) -> &Array3<f64> {
        &self.data
    }

    pub fn into_array(self) -> Array3<f64> {
        self.data
    }
}

// ---------------------------------------------------------------------------
// Labels – ground truth per pixel
// ---------------------------------------------------------------------------

/// Ground-truth labels for the cube's pixels.
///
/// The acquisition files carry no label information the loader understands
/// yet, so every load produces [`Labels::NotSupported`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum Labels {
    #[default]
    NotSupported,
}

impl Labels {
    /// Per-pixel labels, when available.
    pub fn as_array(&self) -> Option<&ndarray::Array2<u32>> {
        match self {
            Labels::NotSupported => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the result of a successful load
// ---------------------------------------------------------------------------

/// Everything extracted from one acquisition file.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// File the dataset was read from.
    pub source: PathBuf,
    pub cube: SpectralCube,
    pub labels: Labels,
    /// Wavelength of each band, same length as `cube.bands()`.
    pub wavelengths: Array1<f64>,
    /// `[height, width]` of the pixel grid.
    pub dim: [usize; 2],
}

impl Dataset {
    /// Number of pixels in the grid.
    pub fn pixel_count(&self) -> usize {
        self.dim[0] * self.dim[1]
    }

    /// `(min, max)` of the wavelength axis, `None` when it is empty.
    pub fn wavelength_range(&self) -> Option<(f64, f64)> {
        if self.wavelengths.is_empty() {
            return None;
        }
        let min = self.wavelengths.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = self
            .wavelengths
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }
}
