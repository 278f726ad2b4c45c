// Unit quaternion used as the orientation state of the AHRS filters
// Convention: w is the scalar part, (x, y, z) the vector part

use core::ops;
use num_traits::Float;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quaternion<T> {
    pub w: T,
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T: Float> Quaternion<T> {
    pub fn new(w: T, x: T, y: T, z: T) -> Self {
        Self { w, x, y, z }
    }

    // no rotation
    pub fn identity() -> Self {
        Self::new(T::one(), T::zero(), T::zero(), T::zero())
    }

    // pure quaternion (0, x, y, z) carrying a 3-vector
    pub fn from_vector(x: T, y: T, z: T) -> Self {
        Self::new(T::zero(), x, y, z)
    }

    pub fn conjugate(self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    pub fn norm_squared(self) -> T {
        self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn norm(self) -> T {
        self.norm_squared().sqrt()
    }

    /// Scales the quaternion to unit length.
    ///
    /// Returns `None` when the norm is zero or not finite, so callers can keep
    /// their previous estimate instead of propagating NaN.
    pub fn normalized(self) -> Option<Self> {
        let norm = self.norm();
        if norm == T::zero() || !norm.is_finite() {
            return None;
        }
        Some(self * norm.recip())
    }

    // (q0, q1, q2, q3) = (w, x, y, z)
    pub fn components(self) -> (T, T, T, T) {
        (self.w, self.x, self.y, self.z)
    }
}

impl<T: Float> Default for Quaternion<T> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<T: Float> ops::Add for Quaternion<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.w + rhs.w,
            self.x + rhs.x,
            self.y + rhs.y,
            self.z + rhs.z,
        )
    }
}

impl<T: Float> ops::Sub for Quaternion<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.w - rhs.w,
            self.x - rhs.x,
            self.y - rhs.y,
            self.z - rhs.z,
        )
    }
}

// Hamilton product
impl<T: Float> ops::Mul for Quaternion<T> {
    type Output = Self;

    fn mul(self, b: Self) -> Self {
        let a = self;
        Self::new(
            a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
            a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
            a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
            a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
        )
    }
}

impl<T: Float> ops::Mul<T> for Quaternion<T> {
    type Output = Self;

    fn mul(self, k: T) -> Self {
        Self::new(self.w * k, self.x * k, self.y * k, self.z * k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn default_is_identity() {
        let q: Quaternion<f32> = Quaternion::default();
        assert_eq!(q.components(), (1.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn identity_is_neutral_for_product() {
        let q = Quaternion::new(0.5_f64, -0.5, 0.5, 0.5);
        assert_eq!(Quaternion::identity() * q, q);
        assert_eq!(q * Quaternion::identity(), q);
    }

    #[test]
    fn basis_products_follow_hamilton_rules() {
        let i = Quaternion::from_vector(1.0_f32, 0.0, 0.0);
        let j = Quaternion::from_vector(0.0_f32, 1.0, 0.0);
        let k = Quaternion::from_vector(0.0_f32, 0.0, 1.0);
        assert_eq!(i * j, k);
        assert_eq!(j * k, i);
        assert_eq!(k * i, j);
        assert_eq!(j * i, k * -1.0);
        assert_eq!(i * i, Quaternion::new(-1.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn rotation_by_conjugation() {
        // 90 degrees about z takes x onto y
        let half = core::f64::consts::FRAC_PI_4;
        let q = Quaternion::new(half.cos(), 0.0, 0.0, half.sin());
        let v = q * Quaternion::from_vector(1.0, 0.0, 0.0) * q.conjugate();
        assert_abs_diff_eq!(v.w, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v.y, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn normalized_has_unit_norm() {
        let q = Quaternion::new(1.0_f32, 2.0, -3.0, 4.0).normalized().unwrap();
        assert_abs_diff_eq!(q.norm(), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(q.w * 30.0_f32.sqrt(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn normalized_rejects_degenerate() {
        assert!(Quaternion::new(0.0_f32, 0.0, 0.0, 0.0).normalized().is_none());
        assert!(Quaternion::new(f32::NAN, 0.0, 0.0, 0.0).normalized().is_none());
        assert!(Quaternion::new(f32::INFINITY, 1.0, 0.0, 0.0).normalized().is_none());
    }
}
