//! Collision checks
//!
//! Everything is a constant-radius distance test. Entity counts stay in the
//! tens, so pairs are checked brute force every tick with no spatial
//! partitioning.

use glam::{Vec2, Vec3};

/// True if `a` and `b` are closer than `radius`
#[inline]
pub fn within(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) < radius * radius
}

/// 3D variant of [`within`]
#[inline]
pub fn within3(a: Vec3, b: Vec3, radius: f32) -> bool {
    a.distance_squared(b) < radius * radius
}

/// Ray vs capsule test
///
/// The capsule is the set of points within `radius` of segment `seg_a`-`seg_b`.
/// `dir` must be normalized. Returns the distance along the ray to the point
/// of closest approach when the ray passes inside the capsule.
pub fn ray_capsule(origin: Vec3, dir: Vec3, seg_a: Vec3, seg_b: Vec3, radius: f32) -> Option<f32> {
    let seg = seg_b - seg_a;
    let r = origin - seg_a;
    let seg_len_sq = seg.length_squared();
    let b = dir.dot(seg);
    let c = dir.dot(r);
    let f = seg.dot(r);

    // Closest points between the ray (s >= 0) and the segment (0 <= t <= 1)
    let (s, t) = if seg_len_sq <= f32::EPSILON {
        ((-c).max(0.0), 0.0)
    } else {
        let denom = seg_len_sq - b * b;
        let s = if denom > f32::EPSILON {
            ((b * f - c * seg_len_sq) / denom).max(0.0)
        } else {
            0.0
        };
        let t = ((b * s + f) / seg_len_sq).clamp(0.0, 1.0);
        ((t * b - c).max(0.0), t)
    };

    let on_ray = origin + dir * s;
    let on_seg = seg_a + seg * t;
    if on_ray.distance_squared(on_seg) <= radius * radius {
        Some(s)
    } else {
        None
    }
}
