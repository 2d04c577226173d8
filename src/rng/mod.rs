//! Seeded pseudo-random source whose whole state is a four-`u16` seed.
//!
//! The generator is a 64-bit linear congruential generator. Its state is the
//! seed itself, so handing `seed()` back to a caller and rebuilding with
//! `Prng::new` resumes the exact sequence. It is NOT cryptographic.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

const MULTIPLIER: u64 = 0x5D58_8B65_6C07_8965;
const INCREMENT: u64 = 0x0026_9EC3;

/// Serialized generator state, most significant word first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrngSeed([u16; 4]);

impl PrngSeed {
    pub const fn new(words: [u16; 4]) -> Self {
        Self(words)
    }

    /// Draw a fresh seed from the thread-local entropy source.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self([rng.gen(), rng.gen(), rng.gen(), rng.gen()])
    }

    pub fn words(&self) -> [u16; 4] {
        self.0
    }

    fn to_state(self) -> u64 {
        self.0
            .iter()
            .fold(0u64, |state, word| (state << 16) | u64::from(*word))
    }

    fn from_state(state: u64) -> Self {
        Self([
            (state >> 48) as u16,
            (state >> 32) as u16,
            (state >> 16) as u16,
            state as u16,
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prng {
    state: u64,
}

impl Prng {
    pub fn new(seed: PrngSeed) -> Self {
        Self {
            state: seed.to_state(),
        }
    }

    /// Current state, for hand-off to the next request.
    pub fn seed(&self) -> PrngSeed {
        PrngSeed::from_state(self.state)
    }

    /// Seed for an independent child generator. Advances this generator.
    pub fn next_seed(&mut self) -> PrngSeed {
        PrngSeed([
            (self.next_u32() >> 16) as u16,
            (self.next_u32() >> 16) as u16,
            (self.next_u32() >> 16) as u16,
            (self.next_u32() >> 16) as u16,
        ])
    }

    pub fn sample_one<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(self)
    }

    /// `amount` distinct elements in random order (all of them if fewer).
    pub fn sample_many<T: Clone>(&mut self, items: &[T], amount: usize) -> Vec<T> {
        let mut pool = items.to_vec();
        let (chosen, _) = pool.partial_shuffle(self, amount);
        chosen.to_vec()
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(self);
    }

    fn next_frame(&mut self) {
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
    }
}

impl RngCore for Prng {
    fn next_u32(&mut self) -> u32 {
        self.next_frame();
        (self.state >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let high = u64::from(self.next_u32());
        let low = u64::from(self.next_u32());
        (high << 32) | low
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

impl SeedableRng for Prng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self {
            state: u64::from_be_bytes(seed),
        }
    }
}
