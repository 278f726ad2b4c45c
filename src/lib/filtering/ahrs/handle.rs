// Handle based interface to the Madgwick filter
//
// Every operation takes an optional filter reference, `None` standing in for a
// null or released handle. Operations on `None` fail with
// `ErrorCode::InvalidHandle` and touch no state.

use core::fmt::Debug;

use log::warn;
use num_traits::Float;

use crate::filtering::ahrs::config::MadgwickConfig;
use crate::filtering::ahrs::error::ErrorCode;
use crate::filtering::ahrs::madgwick::MadgwickFilter;

fn resolve<F>(handle: Option<F>) -> Result<F, ErrorCode> {
    handle.ok_or_else(|| {
        warn!("madgwick operation on invalid handle");
        ErrorCode::InvalidHandle
    })
}

// New filter at identity orientation, unconfigured
pub fn init<T: Float + Debug>() -> MadgwickFilter<T> {
    MadgwickFilter::new()
}

// Copies both parameters, values are not range checked
pub fn set_config<T: Float + Debug>(
    handle: Option<&mut MadgwickFilter<T>>,
    config: MadgwickConfig<T>,
) -> Result<(), ErrorCode> {
    resolve(handle)?.set_config(config);
    Ok(())
}

// Parameters take effect as soon as they are set, so this only checks the handle
pub fn config<T: Float + Debug>(handle: Option<&mut MadgwickFilter<T>>) -> Result<(), ErrorCode> {
    resolve(handle).map(|_| ())
}

pub fn set_beta<T: Float + Debug>(
    handle: Option<&mut MadgwickFilter<T>>,
    beta: T,
) -> Result<(), ErrorCode> {
    resolve(handle)?.set_beta(beta);
    Ok(())
}

pub fn set_sample_frequency<T: Float + Debug>(
    handle: Option<&mut MadgwickFilter<T>>,
    sample_freq: T,
) -> Result<(), ErrorCode> {
    resolve(handle)?.set_sample_frequency(sample_freq);
    Ok(())
}

// (q0, q1, q2, q3) as stored, already normalized
pub fn get_quaternion<T: Float + Debug>(
    handle: Option<&MadgwickFilter<T>>,
) -> Result<(T, T, T, T), ErrorCode> {
    Ok(resolve(handle)?.quaternion().components())
}

#[allow(clippy::too_many_arguments)]
pub fn update_6dof<T: Float + Debug>(
    handle: Option<&mut MadgwickFilter<T>>,
    gx: T,
    gy: T,
    gz: T,
    ax: T,
    ay: T,
    az: T,
) -> Result<(), ErrorCode> {
    resolve(handle)?.update_6dof(gx, gy, gz, ax, ay, az);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn update_9dof<T: Float + Debug>(
    handle: Option<&mut MadgwickFilter<T>>,
    gx: T,
    gy: T,
    gz: T,
    ax: T,
    ay: T,
    az: T,
    mx: T,
    my: T,
    mz: T,
) -> Result<(), ErrorCode> {
    resolve(handle)?.update_9dof(gx, gy, gz, ax, ay, az, mx, my, mz);
    Ok(())
}
