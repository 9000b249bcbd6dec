//! Uniform selection of canned lines.

use rand::Rng;

/// Pick one element of `set` uniformly at random using `rng`.
///
/// Returns `None` for an empty set.
pub fn pick_uniform<'a, T, R: Rng + ?Sized>(set: &'a [T], rng: &mut R) -> Option<&'a T> {
    if set.is_empty() {
        return None;
    }
    set.get(rng.random_range(0..set.len()))
}
