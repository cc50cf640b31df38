use crate::FloatValue;

/// Value at `x_find` of the straight line through `(x1, y1)` and `(x2, y2)`.
///
/// Points outside the two known abscissae are extrapolated. Equal abscissae
/// give a non-finite result.
pub fn lin_int(
    x_find: FloatValue,
    x1: FloatValue,
    y1: FloatValue,
    x2: FloatValue,
    y2: FloatValue,
) -> FloatValue {
    y1 + (y2 - y1) * (x_find - x1) / (x2 - x1)
}
