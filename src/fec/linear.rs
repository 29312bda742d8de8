//! Linear-combination engine: computes a repair payload as a GF(256)
//! weighted sum over a window of source payloads.

use super::gf256;

/// Computes `sum(coeffs[i] * vectors[i])` over GF(256). Each input vector
/// is left-padded with zeros to the length of the longest vector before
/// combining, per spec.md §4.4's normative left-padding convention.
pub fn linear_combination(vectors: &[&[u8]], coeffs: &[u8]) -> Vec<u8> {
    let max_len = vectors.iter().map(|v| v.len()).max().unwrap_or(0);
    let mut result = vec![0u8; max_len];

    for (&vector, &c) in vectors.iter().zip(coeffs.iter()) {
        let padded = gf256::left_pad(vector, max_len);
        gf256::vec_add_scaled_in_place(&mut result, c, &padded);
    }
    result
}
