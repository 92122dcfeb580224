//! # Vector Math
//!
//! Small vector helpers on top of cgmath used by the skeleton builder and the
//! mesh emitter. Addition, subtraction, scaling, dot and cross products come
//! straight from cgmath's operators and [`InnerSpace`]; this module adds the
//! handful of operations the generator needs beyond that.

use cgmath::{InnerSpace, Vector3, Zero};

/// The vector type used by the generator
pub type Vec3 = Vector3<f32>;

/// Normalize `v`, returning the zero vector for zero-length input instead of NaN
pub fn normalize_or_zero(v: Vec3) -> Vec3 {
    let length = v.magnitude();
    if length > 0.0 {
        v / length
    } else {
        Vec3::zero()
    }
}

/// Rotate `vec` around the unit `axis` by `angle` radians (Rodrigues' formula)
pub fn axis_angle(vec: Vec3, axis: Vec3, angle: f32) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    vec * cos + axis.cross(vec) * sin + axis * (axis.dot(vec) * (1.0 - cos))
}

/// Mirror `vec` about the direction `normal`, pushing the mirrored vector
/// further out by `factor`.
///
/// Used to derive the second child direction of a fork from the first one so
/// the two children diverge symmetrically around the parent's axis.
pub fn mirror_about(vec: Vec3, normal: Vec3, factor: f32) -> Vec3 {
    let perpendicular = normal.cross(vec.cross(normal));
    let amount = factor * perpendicular.dot(vec);
    vec - perpendicular * amount
}

/// Scale the component of `vector` that lies along the unit `direction` by
/// `scale`, leaving the perpendicular part untouched.
///
/// A scale of `0.0` projects `vector` onto the plane perpendicular to
/// `direction`.
pub fn scale_in_direction(vector: Vec3, direction: Vec3, scale: f32) -> Vec3 {
    let magnitude = vector.dot(direction);
    vector + direction * (magnitude * scale - magnitude)
}

/// Convert to the array layout stored in output buffers
pub fn to_array(v: Vec3) -> [f32; 3] {
    [v.x, v.y, v.z]
}

/// Convert from the array layout stored in output buffers
pub fn from_array(a: [f32; 3]) -> Vec3 {
    Vec3::new(a[0], a[1], a[2])
}
