//! Fresh element and slide ids.

use rand::RngExt;

/// Generate a fresh id with the given prefix, e.g. `text-9f3a1c08`.
///
/// Uniqueness only needs to hold within one slide; a random 32-bit suffix
/// is plenty while staying short enough to be typed back as a target
/// reference.
pub fn fresh_id(prefix: &str) -> String {
    let mut rng = rand::rng();
    let suffix: u32 = rng.random();
    format!("{}-{:08x}", prefix, suffix)
}
