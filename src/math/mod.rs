pub mod vec3;
pub mod ray;
pub mod random;

pub use self::vec3::*;
pub use self::ray::*;

pub const EPSILON: f32 = std::f32::EPSILON;

pub fn lerp<T>(a: T, b: T, t: f32) -> T
where T: std::ops::Mul<f32, Output = T> + std::ops::Add<T, Output = T>,
{
    a*(1.0-t) + b*t
}

pub fn is_almost_equal(value0: f32, value1: f32, epsilon: f32) -> bool {
    (value1 - value0).abs() < epsilon
}

/// Real roots of `a·t² + b·t + c = 0`, smaller root first. Any non-zero `a`
/// is accepted, however small.
pub fn solve_quadratic(a: f32, b: f32, c: f32) -> Option<(f32, f32)> {
    if a == 0.0 {
        return None;
    }

    let discriminant = b*b - 4.0*a*c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_discriminant = discriminant.sqrt();
    let t0 = (-b - sqrt_discriminant) / (2.0*a);
    let t1 = (-b + sqrt_discriminant) / (2.0*a);

    if t0 <= t1 { Some((t0, t1)) } else { Some((t1, t0)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quadratic_roots_are_ordered() {
        // (t - 1)(t - 3)
        let (t0, t1) = solve_quadratic(1.0, -4.0, 3.0).unwrap();
        assert!(is_almost_equal(t0, 1.0, 1e-6));
        assert!(is_almost_equal(t1, 3.0, 1e-6));

        // negative leading coefficient flips the formula's order
        let (t0, t1) = solve_quadratic(-1.0, 4.0, -3.0).unwrap();
        assert!(t0 < t1);
        assert!(is_almost_equal(t0, 1.0, 1e-6));
    }

    #[test]
    fn quadratic_without_real_roots() {
        assert!(solve_quadratic(1.0, 0.0, 1.0).is_none());
        assert!(solve_quadratic(0.0, 1.0, 1.0).is_none());
    }

    #[test]
    fn tiny_leading_coefficient_still_solves() {
        // (t - 2)(t - 6) scaled by 1e-8
        let (t0, t1) = solve_quadratic(1e-8, -8e-8, 12e-8).unwrap();
        assert!(is_almost_equal(t0, 2.0, 1e-3));
        assert!(is_almost_equal(t1, 6.0, 1e-3));
    }

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(2.0_f32, 4.0, 0.0), 2.0);
        assert_eq!(lerp(2.0_f32, 4.0, 1.0), 4.0);
        assert_eq!(lerp(Vec3::ZERO, Vec3::from_float(2.0), 0.5), Vec3::from_float(1.0));
    }
}
