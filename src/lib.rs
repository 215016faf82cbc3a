pub mod data;
pub mod index;
pub mod model;
pub mod training;
pub mod utils;

use crate::index::{classify, PollutionCalculator, TemperatureUnit};
use crate::training::trainer::{train_model, TrainConfig};
use std::ffi::CStr;
use std::path::PathBuf;

/// Pollution index for one set of readings with the default weights.
///
/// `unit` is 0 for Celsius, 1 for Fahrenheit and 2 for Kelvin; any other
/// code yields NaN.
#[unsafe(no_mangle)]
pub extern "C" fn pollution_index(
    so2: f64,
    co2: f64,
    pm10: f64,
    pm25: f64,
    temperature: f64,
    unit: i32,
) -> f64 {
    let Some(unit) = TemperatureUnit::from_code(unit) else {
        log::warn!("unknown temperature unit code {}", unit);
        return f64::NAN;
    };
    PollutionCalculator::default().compute(so2, co2, pm10, pm25, unit.to_celsius(temperature))
}

/// 0 = Good, 1 = Moderate, 2 = Unhealthy.
#[unsafe(no_mangle)]
pub extern "C" fn pollution_severity(index: f64) -> i32 {
    classify(index).code()
}

unsafe fn path_arg(ptr: *const libc::c_char) -> Option<PathBuf> {
    if ptr.is_null() {
        return None;
    }
    let s = unsafe { CStr::from_ptr(ptr) }.to_str().ok()?;
    Some(PathBuf::from(s))
}

/// Trains on `csv_path` and writes the model to `model_path`.
///
/// # Safety
///
/// Both pointers must be null or point to NUL-terminated strings.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn train_pollution_model(
    csv_path: *const libc::c_char,
    model_path: *const libc::c_char,
) -> bool {
    let (Some(csv_path), Some(model_path)) = (unsafe { path_arg(csv_path) }, unsafe { path_arg(model_path) })
    else {
        log::error!("train_pollution_model: invalid path argument");
        return false;
    };

    let config = TrainConfig {
        csv_path,
        model_path,
        plot_path: None,
        ..TrainConfig::default()
    };

    let result = train_model(&config)
        .and_then(|(model, _)| utils::io::save_model(&config.model_path, &model));
    match result {
        Ok(()) => {
            log::info!("Model trained and saved to {}", config.model_path.display());
            true
        }
        Err(e) => {
            log::error!("Training failed: {:#}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    #[test]
    fn ffi_index_and_severity() {
        let index = pollution_index(10.0, 10.0, 10.0, 10.0, 68.0, 1);
        assert!((index - 35.0).abs() < 1e-9);
        assert_eq!(pollution_severity(index), 0);
        assert_eq!(pollution_severity(pollution_index(50.0, 50.0, 50.0, 50.0, 25.0, 0)), 2);
        assert_eq!(pollution_severity(75.0), 1);
    }

    #[test]
    fn ffi_unknown_unit_is_nan() {
        assert!(pollution_index(0.0, 0.0, 0.0, 0.0, 0.0, 9).is_nan());
    }

    #[test]
    fn ffi_training_rejects_null_and_missing_files() {
        let missing = CString::new("/nonexistent/pollution.csv").unwrap();
        let out = CString::new("/nonexistent/model.bin").unwrap();
        assert!(!unsafe { train_pollution_model(std::ptr::null(), out.as_ptr()) });
        assert!(!unsafe { train_pollution_model(missing.as_ptr(), out.as_ptr()) });
    }
}
