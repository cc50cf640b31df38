//! Diffusion Stepper
//!
//! Advances a temperature field on a [`CellGrid`] by one time step of
//!
//! $$\frac{\partial T}{\partial t} = \frac{\partial}{\partial x}\left[k(x)\frac{\partial T}{\partial x}\right] + s(x)$$
//!
//! where $k$ is a pseudo-diffusivity (for the EBM, $(1-x^2)D/C$) and $s$ a
//! tendency (source divided by heat capacity). Both ends of the grid are
//! insulated: the equator by hemispheric symmetry and the pole because
//! $1 - x^2$ vanishes there.

use ebm_core::errors::{EBMError, EBMResult};
use ebm_core::grid::CellGrid;
use ebm_core::utils::linear_algebra::thomas_solve;
use ebm_core::FloatValue;

/// One-step integrator for the diffusion equation above.
pub trait DiffusionStepper {
    /// Return the field one step of length `dt` after `field`.
    ///
    /// `tendency_old` is $s$ evaluated at the start of the step and
    /// `tendency_new` its estimate at the end; `theta` weights the end of the
    /// step (0 explicit, 1 fully implicit).
    fn step(
        &self,
        field: &[FloatValue],
        tendency_old: &[FloatValue],
        tendency_new: &[FloatValue],
        diffusivity: &dyn Fn(FloatValue) -> FloatValue,
        dt: FloatValue,
        theta: FloatValue,
    ) -> EBMResult<Vec<FloatValue>>;
}

/// Finite-volume theta scheme.
///
/// Fluxes are taken at cell faces with the diffusivity sampled there, which
/// makes the discrete operator conservative. The implicit part is a
/// tridiagonal system solved with the Thomas algorithm.
#[derive(Debug, Clone)]
pub struct ThetaScheme {
    grid: CellGrid,
}

impl ThetaScheme {
    pub fn new(grid: CellGrid) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    /// $k$ at every face scaled by $1/\Delta x^2$; end faces carry no flux.
    fn face_coefficients(&self, diffusivity: &dyn Fn(FloatValue) -> FloatValue) -> Vec<FloatValue> {
        let inv_h2 = 1.0 / self.grid.cell_width().powi(2);
        let faces = self.grid.faces();
        let last = faces.len() - 1;
        faces
            .iter()
            .enumerate()
            .map(|(j, &x)| {
                if j == 0 || j == last {
                    0.0
                } else {
                    diffusivity(x) * inv_h2
                }
            })
            .collect()
    }
}

impl DiffusionStepper for ThetaScheme {
    fn step(
        &self,
        field: &[FloatValue],
        tendency_old: &[FloatValue],
        tendency_new: &[FloatValue],
        diffusivity: &dyn Fn(FloatValue) -> FloatValue,
        dt: FloatValue,
        theta: FloatValue,
    ) -> EBMResult<Vec<FloatValue>> {
        let n = self.grid.n_cells();
        if field.len() != n || tendency_old.len() != n || tendency_new.len() != n {
            return Err(EBMError::Domain(format!(
                "field and tendencies must match the {} grid cells (got {}, {}, {})",
                n,
                field.len(),
                tendency_old.len(),
                tendency_new.len()
            )));
        }

        let k = self.face_coefficients(diffusivity);
        let mut a = vec![0.0; n];
        let mut b = vec![0.0; n];
        let mut c = vec![0.0; n];
        let mut d = vec![0.0; n];

        for i in 0..n {
            let (k_left, k_right) = (k[i], k[i + 1]);

            // Explicit part of the divergence of the flux
            let mut divergence = -(k_left + k_right) * field[i];
            if i > 0 {
                divergence += k_left * field[i - 1];
            }
            if i + 1 < n {
                divergence += k_right * field[i + 1];
            }

            a[i] = -theta * dt * k_left;
            c[i] = -theta * dt * k_right;
            b[i] = 1.0 + theta * dt * (k_left + k_right);
            d[i] = field[i]
                + (1.0 - theta) * dt * divergence
                + dt * (theta * tendency_new[i] + (1.0 - theta) * tendency_old[i]);
        }

        thomas_solve(&a, &b, &c, &d)
    }
}
