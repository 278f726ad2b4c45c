// Madgwick filter tuning parameters

use num_traits::Float;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MadgwickConfig<T> {
    pub beta: T,        // gradient descent gain
    pub sample_freq: T, // update rate in Hz
}

impl<T: Float> MadgwickConfig<T> {
    pub fn new(beta: T, sample_freq: T) -> Self {
        Self { beta, sample_freq }
    }

    /// Derives `beta` from the expected gyroscope measurement error (rad/s).
    ///
    /// beta = sqrt(3/4) * error, the gain at which the correction cancels the
    /// worst case gyroscope error in all four quaternion components.
    pub fn from_gyro_error(gyro_error: T, sample_freq: T) -> Self {
        let three = T::one() + T::one() + T::one();
        let four = three + T::one();
        Self::new((three / four).sqrt() * gyro_error, sample_freq)
    }

    // integration time step in seconds, not guarded against a zero frequency
    pub fn sample_period(&self) -> T {
        self.sample_freq.recip()
    }
}

// Unconfigured: zero gain, zero rate
impl<T: Float> Default for MadgwickConfig<T> {
    fn default() -> Self {
        Self::new(T::zero(), T::zero())
    }
}
