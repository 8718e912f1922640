//! Euler rotation to Babylon direction vectors
//!
//! The authoring tool stores rotations as Euler angles in degrees. Babylon
//! cameras want a target and lights a direction, both obtained by rotating
//! the up vector and flipping it.

use scenebridge_core::{Quat, Vec3};

/// Below this the closed-form `w` extraction divides by (almost) zero
const DEGENERATE_RADICAND: f64 = 1e-9;

/// Remap authoring Euler degrees `(x, y, z)` to Babylon radians
/// `[y, -x, -z]`
pub fn remap_euler(degrees: Vec3) -> [f32; 3] {
    [
        degrees.y.to_radians(),
        (-degrees.x).to_radians(),
        (-degrees.z).to_radians(),
    ]
}

/// Babylon mesh rotation from authoring Euler degrees
pub fn babylon_rotation(degrees: Vec3) -> Vec3 {
    Vec3::from(remap_euler(degrees))
}

/// Quaternion for remapped angles `[a0, a1, a2]`, with `a1` applied as
/// heading, `a2` as attitude and `a0` as bank.
///
/// Uses the matrix-trace closed form. Where its radicand vanishes (a half
/// turn, e.g. 180° of yaw) the same rotation is built from half angles
/// instead, since the closed form yields NaN there.
pub fn quaternion_from_angles(angles: [f32; 3]) -> Quat {
    let [a0, a1, a2] = angles.map(f64::from);

    let (s1, c1) = a1.sin_cos();
    let (s2, c2) = a2.sin_cos();
    let (s3, c3) = a0.sin_cos();

    let radicand = 1.0 + c1 * c2 + c1 * c3 - s1 * s2 * s3 + c2 * c3;
    if radicand > DEGENERATE_RADICAND {
        let w = radicand.sqrt() / 2.0;
        let w4 = 4.0 * w;
        return Quat::new(
            ((c2 * s3 + c1 * s3 + s1 * s2 * c3) / w4) as f32,
            ((s1 * c2 + s1 * c3 + c1 * s2 * s3) / w4) as f32,
            ((-s1 * s3 + c1 * s2 * c3 + s2) / w4) as f32,
            w as f32,
        );
    }

    let (s1, c1) = (a1 / 2.0).sin_cos();
    let (s2, c2) = (a2 / 2.0).sin_cos();
    let (s3, c3) = (a0 / 2.0).sin_cos();
    Quat::new(
        (s1 * s2 * c3 + c1 * c2 * s3) as f32,
        (s1 * c2 * c3 + c1 * s2 * s3) as f32,
        (c1 * s2 * c3 - s1 * c2 * s3) as f32,
        (c1 * c2 * c3 - s1 * s2 * s3) as f32,
    )
}

/// Direction a camera looks along or a light shines along, from authoring
/// Euler degrees
pub fn direction_from_euler(degrees: Vec3) -> Vec3 {
    let q = quaternion_from_angles(remap_euler(degrees));
    -q.rotate(Vec3::UP)
}
