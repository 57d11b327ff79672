//! Deterministic map-iteration order.
//!
//! Hash map iteration order is not part of Rust's stability guarantees,
//! so anything that needs to walk a map deterministically (peer-table
//! reassignment order, mobility profiles that iterate a set of points)
//! sorts the keys and then permutes them with Fisher-Yates using the
//! shared simulation PRNG, rather than relying on insertion or hash
//! order.

use rand::Rng;

pub fn deterministic_shuffle<T, R>(mut items: Vec<T>, rng: &mut R) -> Vec<T>
where
    T: Ord,
    R: Rng,
{
    items.sort();
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
    items
}
