//! Uniform variate capability consumed by the stochastic operations.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniform variates injected into randomize, movement, and infection.
///
/// The engine never owns a generator; hosts pass one in so tests can script
/// the exact sequence of draws.
pub trait UniformSource {
    /// Draws a variate uniformly distributed over `[0, 1)`.
    fn draw(&mut self) -> f64;

    /// Picks an index uniformly from `0..len`. Returns `0` when `len` is zero.
    fn choose_index(&mut self, len: usize) -> usize;
}

impl UniformSource for ChaCha8Rng {
    fn draw(&mut self) -> f64 {
        self.gen::<f64>()
    }

    fn choose_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.gen_range(0..len)
    }
}

impl<S: UniformSource + ?Sized> UniformSource for &mut S {
    fn draw(&mut self) -> f64 {
        (**self).draw()
    }

    fn choose_index(&mut self, len: usize) -> usize {
        (**self).choose_index(len)
    }
}

/// Selects one element of `items` uniformly, or `None` when it is empty.
pub fn choose<'a, S, T>(source: &mut S, items: &'a [T]) -> Option<&'a T>
where
    S: UniformSource + ?Sized,
{
    if items.is_empty() {
        return None;
    }
    let index = source.choose_index(items.len());
    items.get(index.min(items.len() - 1))
}

/// Creates the deterministic generator used by hosts and replay tests.
#[must_use]
pub fn seeded_source(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}
