//! Test helpers

use std::collections::VecDeque;

use rand::RngCore;

/// RNG replaying a fixed list of unit draws.
///
/// Each value `v` in `[0, 1)` is encoded so that `rng.random::<f64>()`
/// returns it (exactly for dyadic values). Once the script runs out every
/// draw yields `0.0`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRng {
    script: VecDeque<f64>,
}

impl ScriptedRng {
    pub fn new(values: &[f64]) -> Self {
        Self {
            script: values.iter().copied().collect(),
        }
    }

    /// Draws not consumed yet
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let v = self.script.pop_front().unwrap_or(0.0).clamp(0.0, 1.0 - f64::EPSILON);
        ((v * (1u64 << 53) as f64) as u64) << 11
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}
