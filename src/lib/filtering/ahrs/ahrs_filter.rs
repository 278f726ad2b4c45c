use crate::filtering::ahrs::quaternion::Quaternion;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImuData<T> {
    pub accel: (T, T, T), // (ax, ay, az)
    pub gyro: (T, T, T),  // (gx, gy, gz)
    pub mag: (T, T, T),   // (mx, my, mz), all zero when no magnetometer is fitted
}

pub trait AHRSFilter<T> {
    // accel in any unit
    // gyro in rad/s
    fn update_imu(&mut self, gyro: (T, T, T), accel: (T, T, T));

    // accel in any unit
    // gyro in rad/s
    // mag in any unit
    fn update(&mut self, imu_data: ImuData<T>);

    // orientation of the sensor frame relative to the earth frame
    fn quaternion(&self) -> Quaternion<T>;

    // reset the filter to initial conditions
    fn reset(&mut self);
}
