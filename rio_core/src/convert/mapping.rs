//! Joint ↔ actuator linear maps.

use nalgebra::DMatrix;

/// `output = matrix · input`, without allocating.
///
/// Rows past `output.len()` and columns past `input.len()` are ignored.
pub fn map_into(matrix: &DMatrix<f64>, input: &[f64], output: &mut [f64]) {
    debug_assert_eq!(matrix.ncols(), input.len());
    debug_assert_eq!(matrix.nrows(), output.len());
    for (r, out) in output.iter_mut().enumerate().take(matrix.nrows()) {
        *out = matrix.row(r).iter().zip(input).map(|(m, x)| m * x).sum();
    }
}

/// `matrix · input` into a fresh vector sized by the matrix.
pub fn map(matrix: &DMatrix<f64>, input: &[f64]) -> Vec<f64> {
    let mut output = vec![0.0; matrix.nrows()];
    map_into(matrix, input, &mut output);
    output
}
