//! Gaussian elimination over GF(256), used by the recoverer to solve for
//! lost source payloads given surviving sources and repair symbols.

use super::gf256;
use thiserror::Error;

/// Failure modes of [`recover_missing`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SolveError {
    /// The reduced coefficient matrix was rank-deficient: at least one row
    /// never received a nonzero pivot. The caller must not publish any
    /// payload from this attempt; a later repair symbol may still supply
    /// the missing rank.
    #[error("singular coefficient matrix, cannot recover this round")]
    Singular,
}

/// Solves for the lost source payloads.
///
/// - `repair_data` — the repair symbol payloads, one per repair row used.
/// - `received_data` — payloads of sources that did arrive, same window.
/// - `received_coeffs[i]` — the coding-vector entries of repair row `i`
///   that correspond to `received_data`'s columns, in that order.
/// - `lost_coeffs[i]` — the coding-vector entries of repair row `i` that
///   correspond to the missing columns, in that order.
///
/// Returns one recovered payload per missing column, in the same order as
/// `lost_coeffs[0]` lists them.
pub fn recover_missing(
    repair_data: &[Vec<u8>],
    received_data: &[Vec<u8>],
    received_coeffs: &[Vec<u8>],
    lost_coeffs: &[Vec<u8>],
) -> Result<Vec<Vec<u8>>, SolveError> {
    let max_len = repair_data
        .iter()
        .chain(received_data.iter())
        .map(|v| v.len())
        .max()
        .unwrap_or(0);

    // Step 1: subtract the contribution of received sources from each
    // repair payload, leaving the RHS of the residual system.
    let mut rhs: Vec<Vec<u8>> = repair_data
        .iter()
        .map(|r| gf256::left_pad(r, max_len))
        .collect();

    for (row, coeffs) in rhs.iter_mut().zip(received_coeffs.iter()) {
        for (src, &c) in received_data.iter().zip(coeffs.iter()) {
            if c == 0 {
                continue;
            }
            let padded = gf256::left_pad(src, max_len);
            gf256::vec_add_scaled_in_place(row, c, &padded);
        }
    }

    // Step 2+3: Gaussian elimination + back substitution on the lost
    // coefficient matrix.
    gaussian_solve(lost_coeffs.to_vec(), rhs)
}

fn gaussian_solve(mut matrix: Vec<Vec<u8>>, mut rhs: Vec<Vec<u8>>) -> Result<Vec<Vec<u8>>, SolveError> {
    let m = matrix.len();
    let n = matrix.first().map(|row| row.len()).unwrap_or(0);
    let mut pivoted = vec![false; m];

    let mut r = 0usize;
    let mut c = 0usize;
    while r < m && c < n {
        let mut i_max = r;
        for i in r..m {
            if matrix[i][c] > matrix[i_max][c] {
                i_max = i;
            }
        }

        if matrix[i_max][c] == 0 {
            c += 1;
            continue;
        }

        matrix.swap(r, i_max);
        rhs.swap(r, i_max);

        for i in (r + 1)..m {
            let f = gf256::div(matrix[i][c], matrix[r][c]);
            if f == 0 {
                continue;
            }
            for j in c..n {
                matrix[i][j] = gf256::sub(matrix[i][j], gf256::mul(f, matrix[r][j]));
            }
            gf256::vec_add_scaled_in_place(&mut rhs[i], f, &rhs[r]);
        }

        pivoted[r] = true;
        r += 1;
        c += 1;
    }

    if pivoted.iter().filter(|&&p| p).count() < m {
        return Err(SolveError::Singular);
    }

    for row in (0..m).rev() {
        for col in (row + 1)..m {
            let coeff = matrix[row][col];
            if coeff != 0 {
                let scaled_col = rhs[col].clone();
                gf256::vec_add_scaled_in_place(&mut rhs[row], coeff, &scaled_col);
            }
            matrix[row][col] = 0;
        }
        let pivot = matrix[row][row];
        let inv_pivot = gf256::inv(pivot);
        rhs[row] = gf256::vec_scale(&rhs[row], inv_pivot);
        matrix[row][row] = 1;
    }

    Ok(rhs)
}
