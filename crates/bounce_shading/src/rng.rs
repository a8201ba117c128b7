//! Random stream helpers.
//!
//! The kernels take any `RngCore` by mutable reference. This module provides
//! the per-path seeding used by the batch driver and a replayable stream for
//! reproducing a path exactly.

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

/// Build an independent random stream for one path at one bounce.
///
/// The stream depends only on `(seed, path_index, bounce)`, so the result
/// of a batch does not depend on how rayon splits the work.
pub fn path_rng(seed: u64, path_index: u64, bounce: u32) -> SmallRng {
    let stream = splitmix64(path_index ^ splitmix64(bounce as u64));
    SmallRng::seed_from_u64(seed ^ stream)
}

#[inline]
fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE5_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// A stream that replays a fixed list of uniforms.
///
/// Each value is handed out through `next_u32` such that `Rng::gen::<f32>()`
/// yields it back (quantized to 24 bits, so dyadic values round-trip
/// exactly). The list wraps around when exhausted; an empty list yields 0.
/// Every `next_u32` call is counted in [`SequenceRng::draws`].
#[derive(Debug, Clone)]
pub struct SequenceRng {
    values: Vec<f32>,
    cursor: usize,
    draws: usize,
}

impl SequenceRng {
    pub fn new(values: Vec<f32>) -> Self {
        Self {
            values,
            cursor: 0,
            draws: 0,
        }
    }

    /// Number of 32-bit words handed out so far.
    pub fn draws(&self) -> usize {
        self.draws
    }

    fn encode(value: f32) -> u32 {
        const MAX: u32 = (1 << 24) - 1;
        // `as` saturates negatives to 0
        let mantissa = ((value * 16_777_216.0) as u32).min(MAX);
        mantissa << 8
    }
}

impl RngCore for SequenceRng {
    fn next_u32(&mut self) -> u32 {
        self.draws += 1;
        if self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        Self::encode(value)
    }

    fn next_u64(&mut self) -> u64 {
        let lo = self.next_u32() as u64;
        let hi = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
