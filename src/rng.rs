//! Per-run RNG seeding.
//!
//! Following the teacher's convention in `runner_builder.rs` (each parallel
//! chain draws a fresh `u64` off the driving RNG and seeds its own
//! generator from it), every run and every dynamic-driver batch thread must
//! get an independent stream. The core never reads a process-global RNG
//! directly so that a caller forking workers cannot accidentally inherit
//! correlated state (spec.md §5).

use rand::{Rng, SeedableRng};

/// Seed a fresh RNG from system entropy.
///
/// Use this once per independent run at the top of a collaborator's worker;
/// the core itself only ever derives child seeds from a caller-supplied
/// generator (see [`spawn_child`]).
pub fn seed_rng<R: SeedableRng>() -> R {
    R::from_entropy()
}

/// Derive a fresh, independently seeded RNG from a parent generator.
///
/// Used by the dynamic driver to give each batch thread its own stream
/// without sharing mutable state across the `rayon::scope` fan-out.
pub fn spawn_child<R: SeedableRng, P: Rng>(parent: &mut P) -> R {
    let seed: u64 = parent.gen();
    R::seed_from_u64(seed)
}
