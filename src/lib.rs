//! Loader for hyperspectral LIBS acquisitions stored in HDF5 files.
//!
//! [`load_dataset`] scans a directory tree for `.h5` files and returns the
//! first one that matches the expected layout as a [`Dataset`]: a
//! `[height, width, bands]` cube, its wavelength calibration and the grid
//! dimensions. [`view`] turns a loaded cube into the maps and spectra a
//! plotting front-end consumes.

pub mod data;
pub mod view;

pub use data::error::{LoadError, ScanError};
pub use data::loader::{
    load_dataset, load_dataset_with, load_file, scan_directory, CandidateOutcome, ScanReport,
    SkippedFile,
};
pub use data::model::{Dataset, Labels, SpectralCube};
pub use data::schema::{DescentStep, LoaderSchema, SerpentineAxis};
