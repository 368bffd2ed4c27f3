//! Planet and steering configuration
//!
//! `PlanetConfig` describes everything needed to regenerate an identical
//! surface: the same configuration always yields the same vertices, faces and
//! navigation graph. `SteeringConfig` holds the tuning knobs shared by the
//! steering behaviors and agents.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{PlanetError, Result};

/// Highest subdivision level accepted by the builder
///
/// The navigation graph stores a full hop-distance row per face, so memory
/// grows with the square of the face count: level 4 (5,120 faces) needs about
/// 50 MB of heuristic tables, level 5 would need over 800 MB.
pub const MAX_SUBDIVISION_LEVEL: u32 = 4;

/// Configuration for deterministic planet generation
///
/// # Example
///
/// ```rust
/// use terrarium_nav::*;
///
/// let config = PlanetConfigBuilder::new()
///     .seed(42)
///     .subdivision_level(2)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.face_count(), 320);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetConfig {
    /// Seed for the height noise and for the simulation's random stream
    pub seed: u32,

    /// Number of times each icosahedron face is split into four
    ///
    /// The face count is `20 * 4^level`.
    pub subdivision_level: u32,

    /// Frequency multiplier applied to unit directions before sampling noise
    pub noise_scale: f32,

    /// Peak-to-peak height variation around radius 1.0
    pub noise_magnitude: f32,

    /// Radius below which a vertex counts as submerged
    ///
    /// A face is traversable when at least two of its three vertices lie
    /// strictly above this radius.
    pub water_level: f32,
}

impl PlanetConfig {
    /// Number of triangular faces a mesh generated from this config has
    #[inline]
    pub fn face_count(&self) -> usize {
        20 * 4usize.pow(self.subdivision_level)
    }

    /// Number of vertices a mesh generated from this config has
    ///
    /// Follows from Euler's formula for a closed triangulated sphere.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.face_count() / 2 + 2
    }
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            subdivision_level: 3,
            noise_scale: 1.5,
            noise_magnitude: 0.25,
            water_level: 1.0,
        }
    }
}

/// Builder for creating PlanetConfig with validation
///
/// # Example
///
/// ```rust
/// use terrarium_nav::*;
///
/// let config = PlanetConfigBuilder::new()
///     .seed(12345)
///     .noise_magnitude(0.4)
///     .unwrap()
///     .water_level(1.02)
///     .unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(config.seed, 12345);
/// ```
#[derive(Debug, Clone)]
pub struct PlanetConfigBuilder {
    seed: Option<u32>,
    subdivision_level: u32,
    noise_scale: f32,
    noise_magnitude: f32,
    water_level: f32,
}

impl PlanetConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random (generated from thread_rng)
    /// - subdivision_level: 3 (1,280 faces)
    /// - noise_scale: 1.5
    /// - noise_magnitude: 0.25
    /// - water_level: 1.0
    pub fn new() -> Self {
        let defaults = PlanetConfig::default();
        Self {
            seed: None,
            subdivision_level: defaults.subdivision_level,
            noise_scale: defaults.noise_scale,
            noise_magnitude: defaults.noise_magnitude,
            water_level: defaults.water_level,
        }
    }

    /// Set the seed for height noise and simulation randomness
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the icosahedron subdivision level
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if level > [`MAX_SUBDIVISION_LEVEL`]
    pub fn subdivision_level(mut self, level: u32) -> Result<Self> {
        if level > MAX_SUBDIVISION_LEVEL {
            return Err(PlanetError::InvalidConfig(format!(
                "subdivision level must be <= {} (got {})",
                MAX_SUBDIVISION_LEVEL, level
            )));
        }
        self.subdivision_level = level;
        Ok(self)
    }

    /// Set the noise frequency
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if scale <= 0.0
    pub fn noise_scale(mut self, scale: f32) -> Result<Self> {
        if scale.is_nan() || scale <= 0.0 {
            return Err(PlanetError::InvalidConfig(format!(
                "noise scale must be positive (got {})",
                scale
            )));
        }
        self.noise_scale = scale;
        Ok(self)
    }

    /// Set the height variation
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if magnitude is negative or >= 2.0 (which
    /// could push vertices through the origin)
    pub fn noise_magnitude(mut self, magnitude: f32) -> Result<Self> {
        if !(0.0..2.0).contains(&magnitude) {
            return Err(PlanetError::InvalidConfig(format!(
                "noise magnitude must be in [0, 2) (got {})",
                magnitude
            )));
        }
        self.noise_magnitude = magnitude;
        Ok(self)
    }

    /// Set the submersion radius threshold
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if level <= 0.0
    pub fn water_level(mut self, level: f32) -> Result<Self> {
        if level.is_nan() || level <= 0.0 {
            return Err(PlanetError::InvalidConfig(format!(
                "water level must be positive (got {})",
                level
            )));
        }
        self.water_level = level;
        Ok(self)
    }

    /// Build the configuration
    ///
    /// If no seed was provided, generates a random seed using thread_rng.
    pub fn build(self) -> Result<PlanetConfig> {
        let seed = self.seed.unwrap_or_else(rand::random);

        Ok(PlanetConfig {
            seed,
            subdivision_level: self.subdivision_level,
            noise_scale: self.noise_scale,
            noise_magnitude: self.noise_magnitude,
            water_level: self.water_level,
        })
    }
}

impl Default for PlanetConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Tuning shared by steering behaviors and agents
///
/// Speeds are in world units per second; the planet is roughly unit radius.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringConfig {
    /// Maximum change in velocity per step for path following
    pub accel: f32,
    /// Speed cap for path following
    pub max_speed: f32,
    /// Distance at which a path destination counts as reached
    pub target_distance: f32,
    /// Cruising speed of the wander behavior before noise modulation
    pub wander_speed: f32,
    /// Heading change per millisecond per unit of noise, in radians
    pub wander_rotation_speed: f32,
    /// Gain of the push out of submerged areas
    pub avoid_strength: f32,
    /// Gain of the pull back into a radius constraint
    pub constrain_strength: f32,
    /// How far a wandering agent may stray from where it started
    pub home_radius: f32,
    /// Landmark orbits: agents closer than this are pushed outward
    pub orbit_inner_radius: f32,
    /// Landmark orbits: outer edge of the ring agents settle in
    pub orbit_radius: f32,
    /// Landmark orbits: beyond this agents are pulled in rather than pathing
    pub orbit_outer_radius: f32,
    /// Landmark orbits: agents further away ignore the landmark
    pub orbit_attraction_radius: f32,
    /// How often an agent plants grass on the face it stands on
    pub grass_interval_ms: f32,
    /// How many random destinations to try before giving up on a path
    pub path_retry_limit: usize,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            accel: 0.008,
            max_speed: 0.1,
            target_distance: 0.05,
            wander_speed: 0.05,
            wander_rotation_speed: 0.0002,
            avoid_strength: 1.0,
            constrain_strength: 1.0,
            home_radius: 0.5,
            orbit_inner_radius: 0.05,
            orbit_radius: 0.15,
            orbit_outer_radius: 0.4,
            orbit_attraction_radius: 1.5,
            grass_interval_ms: 500.0,
            path_retry_limit: 8,
        }
    }
}
