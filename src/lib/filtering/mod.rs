pub mod ahrs;
