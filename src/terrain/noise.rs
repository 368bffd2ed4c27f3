//! Seeded 3D gradient noise
//!
//! Classic improved Perlin noise over Ken Perlin's reference permutation,
//! with the seed folded into the lattice hash so that every seed yields an
//! independent, fully deterministic field. Used both for vertex heights and
//! for the smooth time-varying channels of the wander behavior.

use glam::Vec3;

// Ken Perlin's reference permutation. Changing it changes every generated planet.
const PERM: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209, 76,
    132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173,
    186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212, 207, 206,
    59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44, 154, 163,
    70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232,
    178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162,
    241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157, 184, 84, 204,
    176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29, 24, 72, 243, 141,
    128, 195, 78, 66, 215, 61, 156, 180,
];

/// Fixed off-lattice coordinates for 1D sampling.
///
/// Sampling along a line through integer y/z would pin the gradient terms of
/// those axes to zero.
const LINE_OFFSET_Y: f32 = 0.371;
const LINE_OFFSET_Z: f32 = 0.713;

#[inline]
fn perm(i: u32) -> u32 {
    PERM[(i & 255) as usize] as u32
}

#[inline]
fn lattice_hash(x: i32, y: i32, z: i32, seed: u32) -> u32 {
    let mixed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345) >> 16;
    let a = perm(x as u32 ^ mixed);
    let b = perm(a.wrapping_add(y as u32 ^ (mixed >> 8)));
    perm(b.wrapping_add(z as u32 ^ (mixed >> 16)))
}

/// Dot product of the offset with one of the 12 cube-edge gradients.
#[inline]
fn grad(hash: u32, offset: Vec3) -> f32 {
    let h = hash & 15;
    let u = if h < 8 { offset.x } else { offset.y };
    let v = match h {
        0..=3 => offset.y,
        12 | 14 => offset.x,
        _ => offset.z,
    };
    let u = if h & 1 == 0 { u } else { -u };
    let v = if h & 2 == 0 { v } else { -v };
    u + v
}

#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

/// Sample raw Perlin noise at `pos`, roughly in [-1, 1]
pub fn perlin_3d(pos: Vec3, seed: u32) -> f32 {
    let cell = pos.floor();
    let local = pos - cell;
    let (x0, y0, z0) = (cell.x as i32, cell.y as i32, cell.z as i32);
    let (u, v, w) = (fade(local.x), fade(local.y), fade(local.z));

    let corner = |dx: i32, dy: i32, dz: i32| {
        let hash = lattice_hash(x0 + dx, y0 + dy, z0 + dz, seed);
        grad(hash, local - Vec3::new(dx as f32, dy as f32, dz as f32))
    };

    let x00 = lerp(corner(0, 0, 0), corner(1, 0, 0), u);
    let x10 = lerp(corner(0, 1, 0), corner(1, 1, 0), u);
    let x01 = lerp(corner(0, 0, 1), corner(1, 0, 1), u);
    let x11 = lerp(corner(0, 1, 1), corner(1, 1, 1), u);

    lerp(lerp(x00, x10, v), lerp(x01, x11, v), w)
}

/// Fractal sum of `octaves` Perlin layers, normalized to roughly [-1, 1]
///
/// Each octave doubles the frequency and halves the amplitude.
pub fn fbm_3d(pos: Vec3, seed: u32, octaves: usize) -> f32 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut norm = 0.0;

    for _ in 0..octaves.max(1) {
        total += perlin_3d(pos * frequency, seed) * amplitude;
        norm += amplitude;
        amplitude *= 0.5;
        frequency *= 2.0;
    }

    total / norm
}

/// Smooth scalar noise along a single parameter, roughly in [-1, 1]
///
/// Successive values of `t` a small step apart give nearby results, which is
/// what the wander behavior relies on to turn gradually.
pub fn sample_noise_1d(t: f32, seed: u32) -> f32 {
    perlin_3d(Vec3::new(t, LINE_OFFSET_Y, LINE_OFFSET_Z), seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let pos = Vec3::new(0.5, 0.7, 0.3);
        assert_eq!(perlin_3d(pos, 42), perlin_3d(pos, 42));
        assert_eq!(fbm_3d(pos, 42, 4), fbm_3d(pos, 42, 4));
    }

    #[test]
    fn test_range() {
        for i in 0..200 {
            let t = i as f32 * 0.137;
            let pos = Vec3::new(t.sin() * 3.0, t.cos() * 2.0, t * 0.5);
            let value = perlin_3d(pos, 7);
            assert!((-1.5..=1.5).contains(&value), "value {} out of range", value);
            let value = fbm_3d(pos, 7, 5);
            assert!((-1.5..=1.5).contains(&value), "fbm {} out of range", value);
        }
    }

    #[test]
    fn test_zero_on_lattice() {
        // Every gradient dot product vanishes at integer coordinates
        assert_eq!(perlin_3d(Vec3::new(3.0, -2.0, 5.0), 99), 0.0);
    }

    #[test]
    fn test_different_seeds() {
        let differs = (0..20).any(|i| {
            let pos = Vec3::new(0.31 * i as f32, 0.5, 0.77);
            perlin_3d(pos, 42) != perlin_3d(pos, 999)
        });
        assert!(differs, "different seeds should change the field");
    }

    #[test]
    fn test_noise_1d_is_smooth() {
        let mut previous = sample_noise_1d(0.0, 5);
        for i in 1..500 {
            let value = sample_noise_1d(i as f32 * 0.01, 5);
            assert!((value - previous).abs() < 0.1, "jump at step {}", i);
            previous = value;
        }
    }

    #[test]
    fn test_noise_1d_varies() {
        let values: Vec<f32> = (0..50).map(|i| sample_noise_1d(i as f32 * 0.3, 11)).collect();
        let min = values.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = values.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert!(max - min > 0.1);
    }
}
