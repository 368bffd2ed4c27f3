//! Height sampling for planet generation
//!
//! The mesh generator asks a [`HeightSampler`] for a radius along every unit
//! vertex direction. Samplers must be pure: the same direction must always
//! produce the same radius, otherwise a regenerated planet would no longer
//! line up with saved paths and navigation graphs.

mod noise;

pub use noise::{fbm_3d, perlin_3d, sample_noise_1d};

use glam::Vec3;

use crate::config::PlanetConfig;

/// Trait for sampling the surface radius along a direction
pub trait HeightSampler {
    /// Radius of the surface along `direction` (a unit vector)
    fn height(&self, direction: Vec3) -> f32;
}

impl<F> HeightSampler for F
where
    F: Fn(Vec3) -> f32,
{
    fn height(&self, direction: Vec3) -> f32 {
        self(direction)
    }
}

/// Constant-radius sampler producing a perfect sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformHeight(pub f32);

impl HeightSampler for UniformHeight {
    fn height(&self, _direction: Vec3) -> f32 {
        self.0
    }
}

/// Default sampler: radius `1 + noise * magnitude / 2` from seeded Perlin noise
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoiseHeightSampler {
    /// Seed for noise generation
    pub seed: u32,
    /// Frequency multiplier applied to the direction (default: 1.5)
    pub scale: f32,
    /// Peak-to-peak radius variation (default: 0.25)
    pub magnitude: f32,
    /// Fractal layers summed per sample (default: 3)
    pub octaves: usize,
}

impl Default for NoiseHeightSampler {
    fn default() -> Self {
        Self {
            seed: 0,
            scale: 1.5,
            magnitude: 0.25,
            octaves: 3,
        }
    }
}

impl NoiseHeightSampler {
    /// Create a new sampler with the given seed
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Create the sampler described by a planet configuration
    pub fn from_config(config: &PlanetConfig) -> Self {
        Self {
            seed: config.seed,
            scale: config.noise_scale,
            magnitude: config.noise_magnitude,
            ..Default::default()
        }
    }
}

impl HeightSampler for NoiseHeightSampler {
    fn height(&self, direction: Vec3) -> f32 {
        let noise = fbm_3d(direction * self.scale, self.seed, self.octaves);
        1.0 + noise * self.magnitude * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_sampler() {
        let sampler = |d: Vec3| 2.0 + d.x;
        assert_eq!(sampler.height(Vec3::X), 3.0);
        assert_eq!(sampler.height(Vec3::Y), 2.0);
    }

    #[test]
    fn test_uniform_height() {
        let sampler = UniformHeight(1.0);
        assert_eq!(sampler.height(Vec3::X), 1.0);
        assert_eq!(sampler.height(Vec3::new(0.0, -1.0, 0.0)), 1.0);
    }

    #[test]
    fn test_noise_height_bounds() {
        let sampler = NoiseHeightSampler::new(42);
        for i in 0..100 {
            let t = i as f32 * 0.7;
            let direction = Vec3::new(t.cos(), (t * 0.3).sin(), t.sin()).normalize();
            let height = sampler.height(direction);
            // |noise| stays well within 1.5, so the radius stays near 1.0
            assert!((height - 1.0).abs() <= 1.5 * sampler.magnitude * 0.5);
        }
    }

    #[test]
    fn test_noise_height_determinism() {
        let a = NoiseHeightSampler::new(123);
        let b = NoiseHeightSampler::new(123);
        let direction = Vec3::new(0.5, 0.5, 0.5).normalize();
        assert_eq!(a.height(direction), b.height(direction));
    }

    #[test]
    fn test_from_config() {
        let config = PlanetConfig {
            seed: 9,
            noise_scale: 2.0,
            noise_magnitude: 0.1,
            ..Default::default()
        };
        let sampler = NoiseHeightSampler::from_config(&config);
        assert_eq!(sampler.seed, 9);
        assert_eq!(sampler.scale, 2.0);
        assert_eq!(sampler.magnitude, 0.1);
    }

    #[test]
    fn test_zero_magnitude_is_sphere() {
        let sampler = NoiseHeightSampler {
            magnitude: 0.0,
            ..NoiseHeightSampler::new(1)
        };
        assert_eq!(sampler.height(Vec3::Z), 1.0);
    }
}
