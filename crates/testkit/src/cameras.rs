//! Seeded camera placements for randomized sweeps.

use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// `count` eye positions on shells of radius `min_distance..max_distance`
/// around `target`, deterministic for a given `seed`.
pub fn orbit_positions(
    seed: u64,
    count: usize,
    target: DVec3,
    min_distance: f64,
    max_distance: f64,
) -> Vec<DVec3> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let direction = loop {
                let candidate = DVec3::new(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                );
                let length = candidate.length();
                if length > 0.05 && length <= 1.0 {
                    break candidate / length;
                }
            };
            let distance = rng.gen_range(min_distance..=max_distance);
            target + direction * distance
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_deterministic_and_in_range() {
        let a = orbit_positions(42, 16, DVec3::ONE, 3.0, 5.0);
        let b = orbit_positions(42, 16, DVec3::ONE, 3.0, 5.0);
        assert_eq!(a, b);
        for p in a {
            let d = p.distance(DVec3::ONE);
            assert!((3.0 - 1e-9..=5.0 + 1e-9).contains(&d));
        }
    }
}
