//! Coherent 2D noise consumed by the heightmap generator.

use noise::{NoiseFn, Perlin};

use crate::random::RandomStream;

/// Range of the sampling offset drawn from the random stream.
const OFFSET_RANGE: f32 = 10_000.0;

/// A deterministic, continuous 2D noise function returning roughly `[-1, 1]`.
pub trait NoiseSource: Send + Sync {
    fn sample_2d(&self, x: f64, y: f64) -> f64;
}

/// Seeded Perlin noise sampled through a fixed 2D offset.
///
/// Perlin noise is exactly zero on integer lattice points; the offset moves
/// the sample grid off the lattice.
#[derive(Clone, Debug)]
pub struct PerlinSource {
    perlin: Perlin,
    seed: u32,
    offset: (f64, f64),
}

impl PerlinSource {
    pub fn new(seed: u32, offset: (f64, f64)) -> Self {
        Self {
            perlin: Perlin::new(seed),
            seed,
            offset,
        }
    }

    /// Draw the seed, then the x and y offsets, from `rng`.
    pub fn from_stream(rng: &mut RandomStream) -> Self {
        let seed = rng.next_u32();
        let ox = rng.next_float_range(-OFFSET_RANGE, OFFSET_RANGE) as f64;
        let oy = rng.next_float_range(-OFFSET_RANGE, OFFSET_RANGE) as f64;
        Self::new(seed, (ox, oy))
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn offset(&self) -> (f64, f64) {
        self.offset
    }
}

impl NoiseSource for PerlinSource {
    fn sample_2d(&self, x: f64, y: f64) -> f64 {
        self.perlin.get([x + self.offset.0, y + self.offset.1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_for_seed_and_offset() {
        let a = PerlinSource::new(12, (0.37, 1.91));
        let b = PerlinSource::new(12, (0.37, 1.91));
        for i in 0..50 {
            let x = i as f64 * 0.173;
            let y = i as f64 * 0.291;
            assert_eq!(a.sample_2d(x, y), b.sample_2d(x, y));
        }
    }

    #[test]
    fn test_bounded_and_continuous() {
        let source = PerlinSource::new(99, (0.5, 0.25));
        let mut prev = source.sample_2d(0.0, 0.0);
        for i in 1..2000 {
            let x = i as f64 * 0.001;
            let v = source.sample_2d(x, x * 0.5);
            assert!((-1.5..=1.5).contains(&v));
            assert!((v - prev).abs() < 0.05, "jump of {} at step {}", (v - prev).abs(), i);
            prev = v;
        }
    }

    #[test]
    fn test_from_stream_is_reproducible() {
        let a = PerlinSource::from_stream(&mut RandomStream::new(5));
        let b = PerlinSource::from_stream(&mut RandomStream::new(5));
        assert_eq!(a.seed(), b.seed());
        assert_eq!(a.offset(), b.offset());
        assert_eq!(a.sample_2d(3.3, 4.4), b.sample_2d(3.3, 4.4));
    }
}
