//! CSPICE-backed provider sampling the kernels listed in [`crate::kernels::KERNEL_CATALOG`].
//!
//! Epoch seconds are passed to SPICE as ephemeris time (TDB seconds past J2000) unchanged.

use std::ffi::{CStr, CString};
use std::sync::{Mutex, OnceLock};

use cspice_sys::{
    SpiceBoolean, SpiceDouble, SpiceInt, bodn2c_c, erract_c, failed_c, furnsh_c, getmsg_c,
    kclear_c, reset_c, spkezr_c,
};
use solar_core::time::Epoch;
use solar_core::vector::Vector3;

use crate::kernels::{KERNEL_CATALOG, KernelDescriptor};
use crate::{Body, Ephemeris, EphemerisError, normalize_heliocentric_target_name};

const OBSERVER: &str = "SOLAR SYSTEM BARYCENTER";
const FRAME: &str = "ECLIPJ2000";

static INITIALIZED: OnceLock<()> = OnceLock::new();
static INITIALIZE_LOCK: Mutex<()> = Mutex::new(());
// CSPICE keeps global error state, so every toolkit call is serialized.
static CALL_LOCK: Mutex<()> = Mutex::new(());

/// Ensure the CSPICE runtime has all required kernels loaded.
pub fn load_default_kernels() -> Result<(), EphemerisError> {
    if INITIALIZED.get().is_some() {
        return Ok(());
    }
    let _lock = INITIALIZE_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    if INITIALIZED.get().is_some() {
        return Ok(());
    }
    initialize_spice()?;
    let _ = INITIALIZED.set(());
    Ok(())
}

/// Ephemeris backed by the local SPICE kernel set.
#[derive(Debug)]
pub struct SpiceEphemeris {
    _private: (),
}

impl SpiceEphemeris {
    pub fn new() -> Result<Self, EphemerisError> {
        load_default_kernels()?;
        Ok(Self { _private: () })
    }

    fn body_code(&self, target: &str) -> Result<Option<SpiceInt>, EphemerisError> {
        let _guard = CALL_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let target_c = c_string(target)?;
        let mut code: SpiceInt = 0;
        let mut found: SpiceBoolean = 0;
        unsafe {
            bodn2c_c(target_c.as_ptr() as *mut i8, &mut code, &mut found);
        }
        check_for_spice_error()?;
        Ok((found != 0 as SpiceBoolean).then_some(code))
    }
}

impl Ephemeris for SpiceEphemeris {
    fn resolve(&self, name: &str) -> Result<Body, EphemerisError> {
        let candidates = [
            normalize_heliocentric_target_name(name),
            name.to_ascii_uppercase(),
        ];
        for candidate in candidates {
            if self.body_code(&candidate)?.is_some() {
                return Ok(Body::new(name, candidate));
            }
        }
        Err(EphemerisError::UnknownBody {
            name: name.to_string(),
        })
    }

    fn position_km(&self, body: &Body, epoch: Epoch) -> Result<Vector3, EphemerisError> {
        let _guard = CALL_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let target = c_string(body.target())?;
        let frame = c_string(FRAME)?;
        let aberration = c_string("NONE")?;
        let observer = c_string(OBSERVER)?;

        let mut state: [SpiceDouble; 6] = [0.0; 6];
        let mut light_time: SpiceDouble = 0.0;
        unsafe {
            spkezr_c(
                target.as_ptr() as *mut i8,
                epoch.seconds_past_j2000(),
                frame.as_ptr() as *mut i8,
                aberration.as_ptr() as *mut i8,
                observer.as_ptr() as *mut i8,
                state.as_mut_ptr(),
                &mut light_time,
            );
        }
        check_for_spice_error()?;
        Ok([state[0], state[1], state[2]])
    }
}

fn c_string(value: &str) -> Result<CString, EphemerisError> {
    CString::new(value).map_err(|_| EphemerisError::Spice {
        message: format!("`{value}` contains an interior NUL byte"),
    })
}

fn initialize_spice() -> Result<(), EphemerisError> {
    crate::validate_kernel_paths()?;
    let _guard = CALL_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    unsafe {
        kclear_c();
    }
    configure_error_handling();
    for descriptor in KERNEL_CATALOG {
        let c_path = path_to_cstring(descriptor)?;
        unsafe {
            furnsh_c(c_path.as_ptr() as *mut i8);
        }
        check_for_spice_error()?;
    }
    Ok(())
}

fn path_to_cstring(descriptor: &KernelDescriptor) -> Result<CString, EphemerisError> {
    let path = descriptor.local_path();
    let path_str = path
        .to_str()
        .ok_or_else(|| EphemerisError::InvalidKernelPath {
            name: descriptor.filename,
            path: path.clone(),
        })?;
    CString::new(path_str).map_err(|_| EphemerisError::InvalidKernelPath {
        name: descriptor.filename,
        path,
    })
}

fn configure_error_handling() {
    const SET: &[u8] = b"SET\0";
    const RETURN_MODE: &[u8] = b"RETURN\0";
    unsafe {
        erract_c(
            SET.as_ptr() as *mut i8,
            0 as SpiceInt,
            RETURN_MODE.as_ptr() as *mut i8,
        );
    }
}

fn check_for_spice_error() -> Result<(), EphemerisError> {
    unsafe {
        if failed_c() != 0 as SpiceBoolean {
            const LONG: &[u8] = b"LONG\0";
            let mut buffer = vec![0i8; 1024];
            getmsg_c(
                LONG.as_ptr() as *mut i8,
                buffer.len() as SpiceInt,
                buffer.as_mut_ptr(),
            );
            reset_c();
            let message = CStr::from_ptr(buffer.as_ptr())
                .to_string_lossy()
                .trim()
                .to_string();
            return Err(EphemerisError::Spice { message });
        }
    }
    Ok(())
}
