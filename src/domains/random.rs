//! Seedable random source threaded through setup, drift, steals and
//! exploration. There is no global random state.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

pub type RandomSource = StdRng;

pub fn seeded(seed: u64) -> RandomSource {
    StdRng::seed_from_u64(seed)
}

/// A v4-shaped UUID drawn from `rng`, so ids are stable for a given seed.
pub fn uuid_from<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    uuid::Builder::from_random_bytes(rng.gen()).into_uuid()
}
