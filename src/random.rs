//! Deterministic random source
//!
//! Counter-based mulberry32: the whole generator state is a single `u32`
//! that is stored in snapshots. Restoring it continues the exact sequence.
//! Every simulation entry point takes `&mut DeterministicRandom`; there is
//! no shared global instance.

const INCREMENT: u32 = 0x6D2B_79F5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterministicRandom {
    state: u32,
}

impl Default for DeterministicRandom {
    fn default() -> Self {
        Self::new(0)
    }
}

impl DeterministicRandom {
    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Current generator state, as persisted in snapshots
    pub const fn state(&self) -> u32 {
        self.state
    }

    pub fn restore(&mut self, state: u32) {
        self.state = state;
    }

    #[inline]
    fn advance(&mut self) -> u32 {
        self.state = self.state.wrapping_add(INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Uniform float in `[0, 1)`
    #[inline]
    pub fn next_float(&mut self) -> f64 {
        self.advance() as f64 / 4_294_967_296.0
    }

    /// Uniform integer in `[0, max)`; `0` when `max == 0`
    #[inline]
    pub fn next_int(&mut self, max: u32) -> u32 {
        (self.next_float() * max as f64) as u32
    }

    /// Fair coin
    #[inline]
    pub fn next_bool(&mut self) -> bool {
        self.next_int(2) == 0
    }
}
