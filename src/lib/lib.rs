#![cfg_attr(not(test), no_std)]

// Orientation estimation from gyroscope, accelerometer and magnetometer samples

pub mod filtering;

pub use filtering::ahrs::ahrs_filter::{AHRSFilter, ImuData};
pub use filtering::ahrs::config::MadgwickConfig;
pub use filtering::ahrs::error::ErrorCode;
pub use filtering::ahrs::madgwick::MadgwickFilter;
pub use filtering::ahrs::quaternion::Quaternion;
