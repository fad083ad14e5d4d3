use std::path::{Path, PathBuf};

use hdf5::{File, Group};
use log::{debug, info, warn};
use ndarray::{Array1, Axis};

use super::error::{LoadError, ScanError};
use super::model::{Dataset, Labels, SpectralCube};
use super::raster::{check_dense, coordinate_indices, grid_dimensions, reshape, unsnake};
use super::schema::{DescentStep, LoaderSchema};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the first valid acquisition file found under `root`, using the
/// default [`LoaderSchema`].
pub fn load_dataset(root: &Path) -> Result<Dataset, ScanError> {
    load_dataset_with(root, &LoaderSchema::default())
}

/// Like [`load_dataset`] with an explicit schema.
pub fn load_dataset_with(root: &Path, schema: &LoaderSchema) -> Result<Dataset, ScanError> {
    scan_directory(root, schema).map(|(dataset, _)| dataset)
}

/// Try every candidate under `root` in path order and return the first one
/// that loads, together with a report of the candidates skipped before it.
///
/// Fails with [`ScanError::NoValidFile`] when no candidate exists or all of
/// them were skipped.
pub fn scan_directory(
    root: &Path,
    schema: &LoaderSchema,
) -> Result<(Dataset, ScanReport), ScanError> {
    let candidates = find_candidates(root, schema)?;
    info!(
        "Found {} candidate .{} file(s) under {}",
        candidates.len(),
        schema.extension,
        root.display()
    );

    let mut report = ScanReport::default();
    for path in candidates {
        match try_candidate(&path, schema) {
            CandidateOutcome::Loaded(dataset) => {
                info!(
                    "Loaded {} ({}x{} pixels, {} bands)",
                    path.display(),
                    dataset.dim[0],
                    dataset.dim[1],
                    dataset.cube.bands()
                );
                return Ok((*dataset, report));
            }
            CandidateOutcome::Skipped(reason) => {
                warn!(
                    "Failed to load file {} with error message: {}. Skipping!",
                    path.display(),
                    reason
                );
                report.skipped.push(SkippedFile { path, reason });
            }
        }
    }

    Err(ScanError::NoValidFile {
        attempted: report.skipped.len(),
    })
}

// ---------------------------------------------------------------------------
// Per-candidate outcome
// ---------------------------------------------------------------------------

/// Result of attempting one candidate file.
#[derive(Debug)]
pub enum CandidateOutcome {
    Loaded(Box<Dataset>),
    Skipped(LoadError),
}

/// A candidate that was tried and rejected.
#[derive(Debug)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: LoadError,
}

/// What a scan went through before it succeeded.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub skipped: Vec<SkippedFile>,
}

/// Attempt a single candidate, folding any failure into
/// [`CandidateOutcome::Skipped`].
pub fn try_candidate(path: &Path, schema: &LoaderSchema) -> CandidateOutcome {
    match load_file(path, schema) {
        Ok(dataset) => CandidateOutcome::Loaded(Box::new(dataset)),
        Err(reason) => CandidateOutcome::Skipped(reason),
    }
}

// ---------------------------------------------------------------------------
// Candidate discovery
// ---------------------------------------------------------------------------

/// All files under `root` (recursively) with the schema's extension,
/// sorted by path.
pub fn find_candidates(root: &Path, schema: &LoaderSchema) -> Result<Vec<PathBuf>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::RootNotFound(root.to_path_buf()));
    }
    let mut found = Vec::new();
    collect_candidates(root, schema, &mut found);
    found.sort();
    Ok(found)
}

fn collect_candidates(dir: &Path, schema: &LoaderSchema, out: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot read directory {}: {e}. Skipping!", dir.display());
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Cannot read an entry of {}: {e}. Skipping!", dir.display());
                continue;
            }
        };
        // file_type() does not follow symlinks: linked directories are not
        // descended into, so a link back to an ancestor cannot loop.
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(e) => {
                warn!("Cannot stat {}: {e}. Skipping!", entry.path().display());
                continue;
            }
        };
        let path = entry.path();
        if file_type.is_dir() {
            collect_candidates(&path, schema, out);
        } else if path.is_file() && schema.matches_extension(&path) {
            out.push(path);
        }
    }
}

// ---------------------------------------------------------------------------
// Single-file loader
// ---------------------------------------------------------------------------

/// Read one acquisition file into a [`Dataset`].
///
/// The HDF5 handle and every group opened from it are dropped before this
/// returns, whichever way it returns.
pub fn load_file(path: &Path, schema: &LoaderSchema) -> Result<Dataset, LoadError> {
    let file = File::open(path)?;
    let libs = descend(&file, &schema.descent)?;

    debug!("Loading dimensions...");
    let metadata = member_group(&libs, &schema.metadata_group)?;
    let rows = coordinate_indices(&read_flat(&metadata, &schema.x_field)?, &schema.x_field)?;
    let cols = coordinate_indices(&read_flat(&metadata, &schema.y_field)?, &schema.y_field)?;
    let dim = grid_dimensions(&rows, &cols).ok_or_else(|| LoadError::InvalidCoordinates {
        field: format!("{}/{}", schema.x_field, schema.y_field),
        reason: "grid dimensions overflow".into(),
    })?;
    if schema.require_dense_grid {
        check_dense(&rows, &cols, dim)?;
    }

    debug!("Loading spectra...");
    let samples = read_flat(&libs, &schema.data_field)?;

    debug!("Loading wavelengths...");
    let wavelengths = Array1::from(read_flat(&libs, &schema.calibration_field)?);

    debug!("Reshaping spectra...");
    let mut cube = reshape(samples, dim)?;
    let bands = cube.len_of(Axis(2));
    if wavelengths.len() != bands {
        return Err(LoadError::CalibrationMismatch {
            calibration: wavelengths.len(),
            bands,
        });
    }
    unsnake(&mut cube, schema.serpentine);

    debug!("Loading true labels...");
    let labels = Labels::NotSupported;

    Ok(Dataset {
        source: path.to_path_buf(),
        cube: SpectralCube::new(cube),
        labels,
        wavelengths,
        dim,
    })
}

// -- HDF5 helpers --

/// Follow `steps` from `root`, returning the group reached.
fn descend(root: &Group, steps: &[DescentStep]) -> Result<Group, LoadError> {
    let mut current = root.clone();
    for step in steps {
        let member = match step {
            DescentStep::FirstChild => current
                .member_names()?
                .into_iter()
                .next()
                .ok_or_else(|| LoadError::EmptyGroup {
                    group: current.name(),
                })?,
            DescentStep::Named(name) => name.clone(),
        };
        current = member_group(&current, &member)?;
    }
    Ok(current)
}

fn member_group(parent: &Group, name: &str) -> Result<Group, LoadError> {
    require_member(parent, name)?;
    Ok(parent.group(name)?)
}

/// Read a whole dataset as a flat `f64` vector, whatever its rank.
fn read_flat(parent: &Group, name: &str) -> Result<Vec<f64>, LoadError> {
    require_member(parent, name)?;
    Ok(parent.dataset(name)?.read_raw::<f64>()?)
}

fn require_member(parent: &Group, name: &str) -> Result<(), LoadError> {
    if parent.link_exists(name) {
        Ok(())
    } else {
        Err(LoadError::MissingMember {
            group: parent.name(),
            member: name.to_string(),
        })
    }
}
