//! Splitting of sampled curves into monotonic runs.
//!
//! A stability curve $x_i(Q)$ folds back on itself where the model is
//! bistable. Plotting or fitting it piecewise needs the single-valued pieces,
//! which are exactly the runs between sign changes of the gradient of `y`.

use crate::errors::{EBMError, EBMResult};
use crate::FloatValue;
use serde::{Deserialize, Serialize};

/// Direction of a monotonic run, judged from its end points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BranchDirection {
    /// Last value is at least the first.
    Rising,
    Falling,
}

/// One monotonic run of a curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub x: Vec<FloatValue>,
    pub y: Vec<FloatValue>,
    pub direction: BranchDirection,
}

/// Split `x` and `y` wherever the gradient of `y` changes sign.
///
/// Runs are maximal: equal consecutive `y` values extend the current run. For
/// `y = [1, 3, 5, 4, 2, 3, 4]` the runs are `[1, 3, 5]`, `[4, 2]`, `[3, 4]`,
/// and `[4, 4, 4, 3, 1]` splits into `[4, 4, 4]`, `[3, 1]`. Both sequences are
/// cut at the same indices and the runs keep their original order.
pub fn split_by_gradient(
    x: &[FloatValue],
    y: &[FloatValue],
) -> EBMResult<(Vec<Vec<FloatValue>>, Vec<Vec<FloatValue>>)> {
    if x.len() != y.len() {
        return Err(EBMError::Domain(format!(
            "cannot split curves of unequal length ({} and {})",
            x.len(),
            y.len()
        )));
    }
    if y.is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }

    let cuts = turning_points(y);
    let x_out = cuts.windows(2).map(|w| x[w[0]..w[1]].to_vec()).collect();
    let y_out = cuts.windows(2).map(|w| y[w[0]..w[1]].to_vec()).collect();
    Ok((x_out, y_out))
}

/// Like [`split_by_gradient`] but tags each run with its direction.
pub fn split_into_branches(x: &[FloatValue], y: &[FloatValue]) -> EBMResult<Vec<Branch>> {
    let (xs, ys) = split_by_gradient(x, y)?;
    Ok(xs
        .into_iter()
        .zip(ys)
        .map(|(x, y)| {
            let direction = endpoint_direction(&y);
            Branch { x, y, direction }
        })
        .collect())
}

/// Start index of every run, followed by `y.len()`.
fn turning_points(y: &[FloatValue]) -> Vec<usize> {
    let mut cuts = vec![0];
    if y.len() > 1 {
        let mut ascending = y[1] >= y[0];
        for j in 2..y.len() {
            if (ascending && y[j] < y[j - 1]) || (!ascending && y[j] > y[j - 1]) {
                cuts.push(j);
                ascending = !ascending;
            }
        }
    }
    cuts.push(y.len());
    cuts
}

fn endpoint_direction(y: &[FloatValue]) -> BranchDirection {
    match (y.first(), y.last()) {
        (Some(first), Some(last)) if last < first => BranchDirection::Falling,
        _ => BranchDirection::Rising,
    }
}
