//! Coefficient generation: turns a one-byte `repair_key` into the coding
//! vector both sender and receiver independently regenerate.

use super::tinymt32::TinyMt32;

/// Density above which the dense branch is used unconditionally.
pub const FEC_MAX_DENSITY: u8 = 15;

/// Generates the `window_size`-byte coding vector for `repair_key` at the
/// given `density` (`0..=15`, out of 16).
///
/// `window_size == 0` returns an empty vector; callers must not invoke this
/// with a zero window (spec.md §7, PRNG precondition).
pub fn gen_coeffs(repair_key: u8, window_size: usize, density: u8) -> Vec<u8> {
    let mut prng = TinyMt32::new(repair_key as u32);
    let mut out = Vec::with_capacity(window_size);

    for _ in 0..window_size {
        if density >= FEC_MAX_DENSITY {
            out.push(nonzero_byte(&mut prng));
        } else {
            let roll = prng.rand16();
            if roll <= density {
                out.push(nonzero_byte(&mut prng));
            } else {
                out.push(0);
            }
        }
    }
    out
}

fn nonzero_byte(prng: &mut TinyMt32) -> u8 {
    loop {
        let v = prng.rand256();
        if v != 0 {
            return v;
        }
    }
}
