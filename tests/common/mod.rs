#![allow(dead_code)]

use std::path::Path;

use ndarray::{Array1, Array2};

/// Raw contents of one acquisition, as the instrument writes it.
pub struct Acquisition {
    pub xs: Vec<i64>,
    pub ys: Vec<i64>,
    /// `[pixels, bands]` in acquisition order.
    pub data: Array2<f64>,
    pub calibration: Option<Vec<f64>>,
}

impl Acquisition {
    /// A dense `height x width` raster whose sample at (pixel p, band b)
    /// is `p * bands + b`.
    pub fn raster(height: usize, width: usize, bands: usize) -> Self {
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        for row in 0..height {
            for col in 0..width {
                xs.push(row as i64);
                ys.push(col as i64);
            }
        }
        let data = Array2::from_shape_fn((height * width, bands), |(p, b)| (p * bands + b) as f64);
        let calibration = Some((0..bands).map(|b| 200.0 + 0.5 * b as f64).collect());
        Self {
            xs,
            ys,
            data,
            calibration,
        }
    }

    pub fn without_calibration(mut self) -> Self {
        self.calibration = None;
        self
    }

    /// Write under `/sample/measurement_000/libs`.
    pub fn write(&self, path: &Path) -> hdf5::Result<()> {
        let file = hdf5::File::create(path)?;
        let libs = file
            .create_group("sample")?
            .create_group("measurement_000")?
            .create_group("libs")?;
        self.write_into(&libs)
    }

    /// Write the `libs` fields into an existing group.
    pub fn write_into(&self, libs: &hdf5::Group) -> hdf5::Result<()> {
        let metadata = libs.create_group("metadata")?;
        metadata
            .new_dataset_builder()
            .with_data(&Array1::from(self.xs.clone()))
            .create("X")?;
        metadata
            .new_dataset_builder()
            .with_data(&Array1::from(self.ys.clone()))
            .create("Y")?;
        libs.new_dataset_builder().with_data(&self.data).create("data")?;
        if let Some(calibration) = &self.calibration {
            libs.new_dataset_builder()
                .with_data(&Array1::from(calibration.clone()))
                .create("calibration")?;
        }
        Ok(())
    }
}
