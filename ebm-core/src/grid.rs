//! Spatial grids in $x = \sin\phi$ over one hemisphere, $x \in [0, 1]$.
//!
//! Two samplings are used:
//!
//! - [`AnalyticGrid`]: equally spaced points including both end points, for
//!   evaluating the spectral solution and its diagnostics.
//! - [`CellGrid`]: $N$ equal-width finite-volume cells, the grid the
//!   time-stepping solver works on.

use crate::errors::{EBMError, EBMResult};
use crate::FloatValue;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Equally spaced sample points covering $[0, 1]$ inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticGrid {
    points: Array1<FloatValue>,
}

impl AnalyticGrid {
    /// `n_points` samples from the equator to the pole.
    pub fn uniform(n_points: usize) -> EBMResult<Self> {
        if n_points < 2 {
            return Err(EBMError::Configuration(format!(
                "an analytic grid needs at least two points, got {}",
                n_points
            )));
        }
        Ok(Self {
            points: Array1::linspace(0.0, 1.0, n_points),
        })
    }

    /// Samples spaced by `step`, starting at zero and never exceeding one.
    pub fn with_spacing(step: FloatValue) -> EBMResult<Self> {
        if !(step > 0.0 && step <= 1.0) {
            return Err(EBMError::Configuration(format!(
                "grid spacing must lie in (0, 1], got {}",
                step
            )));
        }
        // Small slack so that 1/step landing just under an integer keeps the pole
        let n_points = (1.0 / step + 1e-9).floor() as usize + 1;
        Ok(Self {
            points: Array1::from_iter((0..n_points).map(|k| k as FloatValue * step)),
        })
    }

    pub fn points(&self) -> &Array1<FloatValue> {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Cell-centred finite-volume grid of `n_cells` equal cells on $[0, 1]$.
///
/// Cell $j$ spans $[j/N, (j+1)/N]$ and is represented by its centre
/// $(j + 1/2)/N$.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellGrid {
    centres: Vec<FloatValue>,
    faces: Vec<FloatValue>,
}

impl CellGrid {
    pub fn new(n_cells: usize) -> EBMResult<Self> {
        if n_cells < 1 {
            return Err(EBMError::Configuration(
                "grid resolution must be at least one cell".to_string(),
            ));
        }
        let width = 1.0 / n_cells as FloatValue;
        let centres = (0..n_cells)
            .map(|j| (j as FloatValue + 0.5) * width)
            .collect();
        let faces = (0..=n_cells).map(|j| j as FloatValue * width).collect();
        Ok(Self { centres, faces })
    }

    /// Cell centres, equator first.
    pub fn centres(&self) -> &[FloatValue] {
        &self.centres
    }

    /// Cell faces; one more than the number of cells, from 0 to 1.
    pub fn faces(&self) -> &[FloatValue] {
        &self.faces
    }

    pub fn n_cells(&self) -> usize {
        self.centres.len()
    }

    pub fn cell_width(&self) -> FloatValue {
        1.0 / self.n_cells() as FloatValue
    }
}
