pub mod ahrs_filter;
pub mod config;
pub mod error;
pub mod handle;
pub mod madgwick;
pub mod quaternion;
