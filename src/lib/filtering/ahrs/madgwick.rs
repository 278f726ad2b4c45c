// Madgwick filter implementation
// Gradient descent orientation filter for IMU (6-axis) and MARG (9-axis) sensor arrays
// Reference: S. Madgwick, "An efficient orientation filter for inertial and
// inertial/magnetic sensor arrays", 2010

use core::fmt::Debug;

use log::{debug, trace, warn};
use num_traits::Float;

pub use crate::filtering::ahrs::ahrs_filter::*;
use crate::filtering::ahrs::config::MadgwickConfig;
use crate::filtering::ahrs::quaternion::Quaternion;

#[derive(Clone, Debug)]
pub struct MadgwickFilter<T = f32> {
    q: Quaternion<T>, // sensor frame relative to earth frame
    beta: T,          // gradient descent gain
    sample_freq: T,   // Hz
}

impl<T> MadgwickFilter<T>
where
    T: Float + Debug,
{
    // identity orientation, unconfigured
    pub fn new() -> Self {
        Self::with_config(MadgwickConfig::default())
    }

    pub fn with_config(config: MadgwickConfig<T>) -> Self {
        Self {
            q: Quaternion::identity(),
            beta: config.beta,
            sample_freq: config.sample_freq,
        }
    }

    pub fn set_config(&mut self, config: MadgwickConfig<T>) {
        self.set_beta(config.beta);
        self.set_sample_frequency(config.sample_freq);
    }

    pub fn config(&self) -> MadgwickConfig<T> {
        MadgwickConfig::new(self.beta, self.sample_freq)
    }

    pub fn set_beta(&mut self, beta: T) {
        debug!("madgwick beta set to {:?}", beta);
        self.beta = beta;
    }

    pub fn beta(&self) -> T {
        self.beta
    }

    // Non-positive rates are accepted, they only degrade the integration step
    pub fn set_sample_frequency(&mut self, sample_freq: T) {
        if sample_freq <= T::zero() || sample_freq.is_nan() {
            warn!("madgwick sample frequency {:?} Hz is not positive", sample_freq);
        } else {
            debug!("madgwick sample frequency set to {:?} Hz", sample_freq);
        }
        self.sample_freq = sample_freq;
    }

    pub fn sample_frequency(&self) -> T {
        self.sample_freq
    }

    pub fn quaternion(&self) -> Quaternion<T> {
        self.q
    }

    pub fn reset(&mut self) {
        debug!("madgwick orientation reset");
        self.q = Quaternion::identity();
    }

    /// Fuses one gyroscope (rad/s) and accelerometer (any unit) sample.
    ///
    /// A zero accelerometer reading skips the correction and the sample is
    /// integrated from the gyroscope alone.
    pub fn update_6dof(&mut self, gx: T, gy: T, gz: T, ax: T, ay: T, az: T) {
        let mut q_dot = self.gyro_rate_of_change(gx, gy, gz);

        match normalize(ax, ay, az) {
            Some(accel) => q_dot = self.apply_correction(q_dot, accel_gradient(self.q, accel)),
            None => trace!("zero accelerometer reading, gyroscope only"),
        }

        self.integrate(q_dot);
    }

    /// Fuses one gyroscope (rad/s), accelerometer and magnetometer sample.
    ///
    /// A zero magnetometer reading falls back to [`Self::update_6dof`], a zero
    /// accelerometer reading to gyroscope only integration.
    #[allow(clippy::too_many_arguments)]
    pub fn update_9dof(&mut self, gx: T, gy: T, gz: T, ax: T, ay: T, az: T, mx: T, my: T, mz: T) {
        let Some(mag) = normalize(mx, my, mz) else {
            trace!("zero magnetometer reading, falling back to 6dof update");
            self.update_6dof(gx, gy, gz, ax, ay, az);
            return;
        };

        let mut q_dot = self.gyro_rate_of_change(gx, gy, gz);

        match normalize(ax, ay, az) {
            Some(accel) => {
                q_dot = self.apply_correction(q_dot, marg_gradient(self.q, accel, mag));
            }
            None => trace!("zero accelerometer reading, gyroscope only"),
        }

        self.integrate(q_dot);
    }

    // qdot = 0.5 * q x (0, gx, gy, gz)
    fn gyro_rate_of_change(&self, gx: T, gy: T, gz: T) -> Quaternion<T> {
        let half = (T::one() + T::one()).recip();
        self.q * Quaternion::from_vector(gx, gy, gz) * half
    }

    // Subtract the normalised gradient step scaled by beta
    fn apply_correction(&self, q_dot: Quaternion<T>, gradient: Quaternion<T>) -> Quaternion<T> {
        match gradient.normalized() {
            Some(step) => q_dot - step * self.beta,
            None => {
                trace!("degenerate gradient, correction skipped");
                q_dot
            }
        }
    }

    // Integrate to yield quaternion, keep the previous estimate if it degenerates
    fn integrate(&mut self, q_dot: Quaternion<T>) {
        let dt = self.sample_freq.recip();
        match (self.q + q_dot * dt).normalized() {
            Some(q) => self.q = q,
            None => trace!("degenerate quaternion, previous estimate kept"),
        }
    }
}

impl<T> Default for MadgwickFilter<T>
where
    T: Float + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> AHRSFilter<T> for MadgwickFilter<T>
where
    T: Float + Debug,
{
    fn update_imu(&mut self, gyro: (T, T, T), accel: (T, T, T)) {
        self.update_6dof(gyro.0, gyro.1, gyro.2, accel.0, accel.1, accel.2);
    }

    fn update(&mut self, imu_data: ImuData<T>) {
        let (gx, gy, gz) = imu_data.gyro;
        let (ax, ay, az) = imu_data.accel;
        let (mx, my, mz) = imu_data.mag;
        self.update_9dof(gx, gy, gz, ax, ay, az, mx, my, mz);
    }

    fn quaternion(&self) -> Quaternion<T> {
        self.q
    }

    fn reset(&mut self) {
        MadgwickFilter::reset(self);
    }
}

// Unit vector, or None for a zero vector
fn normalize<T: Float>(x: T, y: T, z: T) -> Option<(T, T, T)> {
    let norm = (x * x + y * y + z * z).sqrt();
    if norm == T::zero() {
        return None;
    }
    let recip_norm = norm.recip();
    Some((x * recip_norm, y * recip_norm, z * recip_norm))
}

// Gradient of the gravity objective f_g = q* x (0, 0, 0, 1) x q - a,
// i.e. J_g^T * f_g expanded and simplified
fn accel_gradient<T: Float>(q: Quaternion<T>, accel: (T, T, T)) -> Quaternion<T> {
    let (q0, q1, q2, q3) = q.components();
    let (ax, ay, az) = accel;

    let two = T::one() + T::one();
    let four = two + two;
    let eight = four + four;

    // Auxiliary variables to avoid repeated arithmetic
    let _2q0 = two * q0;
    let _2q1 = two * q1;
    let _2q2 = two * q2;
    let _2q3 = two * q3;
    let _4q0 = four * q0;
    let _4q1 = four * q1;
    let _4q2 = four * q2;
    let _8q1 = eight * q1;
    let _8q2 = eight * q2;
    let q0q0 = q0 * q0;
    let q1q1 = q1 * q1;
    let q2q2 = q2 * q2;
    let q3q3 = q3 * q3;

    let s0 = _4q0 * q2q2 + _2q2 * ax + _4q0 * q1q1 - _2q1 * ay;
    let s1 = _4q1 * q3q3 - _2q3 * ax + four * q0q0 * q1 - _2q0 * ay - _4q1
        + _8q1 * q1q1
        + _8q1 * q2q2
        + _4q1 * az;
    let s2 = four * q0q0 * q2 + _2q0 * ax + _4q2 * q3q3 - _2q3 * ay - _4q2
        + _8q2 * q1q1
        + _8q2 * q2q2
        + _4q2 * az;
    let s3 = four * q1q1 * q3 - _2q1 * ax + four * q2q2 * q3 - _2q2 * ay;

    Quaternion::new(s0, s1, s2, s3)
}

// Gradient of the stacked gravity and magnetic field objectives,
// J_g^T * f_g + J_b^T * f_b
fn marg_gradient<T: Float>(q: Quaternion<T>, accel: (T, T, T), mag: (T, T, T)) -> Quaternion<T> {
    let (q0, q1, q2, q3) = q.components();
    let (ax, ay, az) = accel;
    let (mx, my, mz) = mag;

    let two = T::one() + T::one();
    let four = two + two;
    let half = two.recip();

    // Reference direction of Earth's magnetic field: rotate the measurement
    // into the earth frame, then fold the horizontal part onto the x axis
    let h = q * Quaternion::from_vector(mx, my, mz) * q.conjugate();
    let bx = (h.x * h.x + h.y * h.y).sqrt();
    let bz = h.z;
    let _2bx = two * bx;
    let _2bz = two * bz;
    let _4bx = four * bx;
    let _4bz = four * bz;

    // Auxiliary variables to avoid repeated arithmetic
    let _2q0 = two * q0;
    let _2q1 = two * q1;
    let _2q2 = two * q2;
    let _2q3 = two * q3;
    let _4q1 = four * q1;
    let _4q2 = four * q2;
    let q0q1 = q0 * q1;
    let q0q2 = q0 * q2;
    let q0q3 = q0 * q3;
    let q1q1 = q1 * q1;
    let q1q2 = q1 * q2;
    let q1q3 = q1 * q3;
    let q2q2 = q2 * q2;
    let q2q3 = q2 * q3;
    let q3q3 = q3 * q3;

    // Objective functions: predicted minus measured direction
    let fgx = two * (q1q3 - q0q2) - ax;
    let fgy = two * (q0q1 + q2q3) - ay;
    let fgz = two * (half - q1q1 - q2q2) - az;
    let fbx = _2bx * (half - q2q2 - q3q3) + _2bz * (q1q3 - q0q2) - mx;
    let fby = _2bx * (q1q2 - q0q3) + _2bz * (q0q1 + q2q3) - my;
    let fbz = _2bx * (q0q2 + q1q3) + _2bz * (half - q1q1 - q2q2) - mz;

    // Gradient descent corrective step
    let s0 = -_2q2 * fgx + _2q1 * fgy - _2bz * q2 * fbx
        + (-_2bx * q3 + _2bz * q1) * fby
        + _2bx * q2 * fbz;
    let s1 = _2q3 * fgx + _2q0 * fgy - _4q1 * fgz
        + _2bz * q3 * fbx
        + (_2bx * q2 + _2bz * q0) * fby
        + (_2bx * q3 - _4bz * q1) * fbz;
    let s2 = -_2q0 * fgx + _2q3 * fgy - _4q2 * fgz
        + (-_4bx * q2 - _2bz * q0) * fbx
        + (_2bx * q1 + _2bz * q3) * fby
        + (_2bx * q0 - _4bz * q2) * fbz;
    let s3 = _2q1 * fgx + _2q2 * fgy
        + (-_4bx * q3 + _2bz * q1) * fbx
        + (-_2bx * q0 + _2bz * q2) * fby
        + _2bx * q1 * fbz;

    Quaternion::new(s0, s1, s2, s3)
}
