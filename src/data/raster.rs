//! Turning the flat sample stream of a raster scan into a cube.

use std::collections::HashSet;

use ndarray::{Array3, ArrayViewMut1, Axis};

use super::error::LoadError;
use super::schema::SerpentineAxis;

// ---------------------------------------------------------------------------
// Coordinates → grid dimensions
// ---------------------------------------------------------------------------

/// Largest coordinate accepted along either axis.
pub const MAX_COORDINATE: f64 = u32::MAX as f64;

/// Convert raw coordinate values to zero-based grid indices.
///
/// Values must be finite, non-negative, integral and at most
/// [`MAX_COORDINATE`].
pub fn coordinate_indices(values: &[f64], field: &str) -> Result<Vec<usize>, LoadError> {
    if values.is_empty() {
        return Err(LoadError::InvalidCoordinates {
            field: field.to_string(),
            reason: "no coordinates recorded".into(),
        });
    }
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            if !v.is_finite() || v < 0.0 || v.fract() != 0.0 {
                Err(LoadError::InvalidCoordinates {
                    field: field.to_string(),
                    reason: format!("{field}[{i}] = {v} is not a non-negative integer"),
                })
            } else if v > MAX_COORDINATE {
                Err(LoadError::InvalidCoordinates {
                    field: field.to_string(),
                    reason: format!("{field}[{i}] = {v} exceeds {MAX_COORDINATE}"),
                })
            } else {
                Ok(v as usize)
            }
        })
        .collect()
}

/// `[max(rows) + 1, max(cols) + 1]`, or `None` if either overflows.
pub fn grid_dimensions(rows: &[usize], cols: &[usize]) -> Option<[usize; 2]> {
    let height = rows.iter().max().map_or(Some(0), |m| m.checked_add(1))?;
    let width = cols.iter().max().map_or(Some(0), |m| m.checked_add(1))?;
    Some([height, width])
}

/// Verify that the coordinate pairs visit every cell of `dim` exactly once.
pub fn check_dense(rows: &[usize], cols: &[usize], dim: [usize; 2]) -> Result<(), LoadError> {
    let [height, width] = dim;
    let sparse = |reason: String| LoadError::SparseGrid {
        height,
        width,
        reason,
    };

    if rows.len() != cols.len() {
        return Err(sparse(format!(
            "{} row coordinates but {} column coordinates",
            rows.len(),
            cols.len()
        )));
    }
    let cells = height
        .checked_mul(width)
        .ok_or_else(|| sparse("grid size overflows".into()))?;
    if rows.len() != cells {
        return Err(sparse(format!(
            "{} coordinate pairs for {cells} cells",
            rows.len()
        )));
    }
    let mut seen = HashSet::with_capacity(rows.len());
    for (&r, &c) in rows.iter().zip(cols) {
        if !seen.insert((r, c)) {
            return Err(sparse(format!("pixel ({r}, {c}) recorded twice")));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Reshape
// ---------------------------------------------------------------------------

/// Reshape the flat samples to `[height, width, bands]`, inferring `bands`.
pub fn reshape(samples: Vec<f64>, dim: [usize; 2]) -> Result<Array3<f64>, LoadError> {
    let [height, width] = dim;
    let n = samples.len();
    let mismatch = || LoadError::ShapeMismatch {
        samples: n,
        height,
        width,
    };

    let pixels = height.checked_mul(width).ok_or_else(mismatch)?;
    if pixels == 0 || n == 0 || n % pixels != 0 {
        return Err(mismatch());
    }
    let bands = n / pixels;
    Array3::from_shape_vec((height, width, bands), samples).map_err(|_| mismatch())
}

// ---------------------------------------------------------------------------
// Serpentine correction
// ---------------------------------------------------------------------------

/// Undo the back-and-forth scan pattern: even rows (0, 2, 4, ...) are
/// mirrored along `axis`, odd rows are left as read.
pub fn unsnake(cube: &mut Array3<f64>, axis: SerpentineAxis) {
    // Within a row view of shape [width, bands]:
    //   bands   → reverse each lane along the band axis
    //   columns → reverse each lane along the column axis
    let lane_axis = match axis {
        SerpentineAxis::Bands => Axis(1),
        SerpentineAxis::Columns => Axis(0),
        SerpentineAxis::None => return,
    };

    for (row_idx, mut row) in cube.axis_iter_mut(Axis(0)).enumerate() {
        if row_idx % 2 != 0 {
            continue;
        }
        for lane in row.lanes_mut(lane_axis) {
            reverse_lane(lane);
        }
    }
}

fn reverse_lane(mut lane: ArrayViewMut1<'_, f64>) {
    let n = lane.len();
    for k in 0..n / 2 {
        lane.swap(k, n - 1 - k);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(h: usize, w: usize, b: usize) -> Array3<f64> {
        reshape((0..h * w * b).map(|v| v as f64).collect(), [h, w]).unwrap()
    }

    #[test]
    fn test_coordinate_indices_accepts_integral_values() {
        let idx = coordinate_indices(&[0.0, 1.0, 3.0], "X").unwrap();
        assert_eq!(idx, vec![0, 1, 3]);
    }

    #[test]
    fn test_coordinate_indices_rejects_bad_values() {
        for bad in [-1.0, 0.5, f64::NAN, f64::INFINITY] {
            let err = coordinate_indices(&[0.0, bad], "Y").unwrap_err();
            assert!(matches!(err, LoadError::InvalidCoordinates { ref field, .. } if field == "Y"));
        }
        assert!(coordinate_indices(&[], "X").is_err());
    }

    #[test]
    fn test_coordinate_indices_rejects_huge_values() {
        let err = coordinate_indices(&[0.0, 1e20], "X").unwrap_err();
        assert!(matches!(err, LoadError::InvalidCoordinates { .. }));
        assert!(coordinate_indices(&[4294967296.0], "Y").is_err());
        assert_eq!(
            coordinate_indices(&[MAX_COORDINATE], "Y").unwrap(),
            vec![u32::MAX as usize]
        );
    }

    #[test]
    fn test_grid_dimensions_is_max_plus_one() {
        assert_eq!(grid_dimensions(&[0, 0, 1, 1], &[0, 1, 0, 1]), Some([2, 2]));
        assert_eq!(grid_dimensions(&[0, 4], &[2, 0]), Some([5, 3]));
        assert_eq!(grid_dimensions(&[usize::MAX], &[0]), None);
    }

    #[test]
    fn test_oversized_grid_is_an_error_not_a_panic() {
        let dim = [usize::MAX, 2];
        assert!(matches!(
            check_dense(&[0], &[0], dim),
            Err(LoadError::SparseGrid { .. })
        ));
        assert!(matches!(
            reshape(vec![0.0; 4], dim),
            Err(LoadError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_check_dense() {
        assert!(check_dense(&[0, 0, 1, 1], &[0, 1, 1, 0], [2, 2]).is_ok());
        // a gap: cell (1, 0) missing
        assert!(matches!(
            check_dense(&[0, 0, 1], &[0, 1, 1], [2, 2]),
            Err(LoadError::SparseGrid { .. })
        ));
        // duplicate pixel
        assert!(matches!(
            check_dense(&[0, 0, 1, 1], &[0, 0, 1, 0], [2, 2]),
            Err(LoadError::SparseGrid { .. })
        ));
        // mismatched lengths
        assert!(check_dense(&[0, 1], &[0], [2, 1]).is_err());
    }

    #[test]
    fn test_reshape_infers_bands() {
        let cube = ramp(2, 3, 4);
        assert_eq!(cube.shape(), &[2, 3, 4]);
        assert_eq!(cube[[1, 2, 3]], 23.0);
    }

    #[test]
    fn test_reshape_rejects_indivisible_length() {
        let err = reshape(vec![0.0; 10], [2, 2]).unwrap_err();
        assert!(matches!(
            err,
            LoadError::ShapeMismatch {
                samples: 10,
                height: 2,
                width: 2
            }
        ));
        assert!(reshape(vec![], [2, 2]).is_err());
        assert!(reshape(vec![1.0], [0, 1]).is_err());
    }

    #[test]
    fn test_unsnake_bands_reverses_even_rows_only() {
        let raw = ramp(3, 2, 3);
        let mut cube = raw.clone();
        unsnake(&mut cube, SerpentineAxis::Bands);

        for row in 0..3 {
            for col in 0..2 {
                for band in 0..3 {
                    let expected = if row % 2 == 0 {
                        raw[[row, col, 2 - band]]
                    } else {
                        raw[[row, col, band]]
                    };
                    assert_eq!(cube[[row, col, band]], expected);
                }
            }
        }
    }

    #[test]
    fn test_unsnake_columns_mirrors_pixel_order() {
        let raw = ramp(2, 3, 2);
        let mut cube = raw.clone();
        unsnake(&mut cube, SerpentineAxis::Columns);

        for col in 0..3 {
            for band in 0..2 {
                assert_eq!(cube[[0, col, band]], raw[[0, 2 - col, band]]);
                assert_eq!(cube[[1, col, band]], raw[[1, col, band]]);
            }
        }
    }

    #[test]
    fn test_unsnake_none_is_identity() {
        let raw = ramp(2, 2, 2);
        let mut cube = raw.clone();
        unsnake(&mut cube, SerpentineAxis::None);
        assert_eq!(cube, raw);
    }
}
