//! Python bindings
//!
//! Mirrors the classic `tesoro` Python API: awaitable lighting calls and
//! `get_device_list()`. Colors are `(red, green, blue)` tuples.

use crate::error::TesoroError;
use crate::hid::{self, DeviceDescriptor, NusbBackend, GRAM_SPECTRUM_PRODUCT_ID, VENDOR_ID};
use crate::packet::{Color, Mode, Profile, SpectrumSubmode};
use crate::{PacketSender, SenderConfig};
use pyo3::exceptions::{PyOSError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;
use pyo3_async_runtimes::tokio::future_into_py;
use std::sync::Arc;

impl From<TesoroError> for PyErr {
    fn from(err: TesoroError) -> PyErr {
        if err.is_invalid_argument() {
            PyValueError::new_err(err.to_string())
        } else {
            PyOSError::new_err(err.to_string())
        }
    }
}

/// A connected Tesoro device.
#[pyclass(name = "Device", get_all, frozen)]
#[derive(Clone, Debug)]
pub struct PyDevice {
    name: String,
    bus: u8,
    address: u8,
    product_id: u16,
    device_type: u8,
}

impl From<DeviceDescriptor> for PyDevice {
    fn from(d: DeviceDescriptor) -> Self {
        Self {
            name: d.name,
            bus: d.bus,
            address: d.address,
            product_id: d.product_id,
            device_type: d.device_type.into(),
        }
    }
}

#[pymethods]
impl PyDevice {
    fn __repr__(&self) -> String {
        format!(
            "Device(name={:?}, bus={}, address={}, product_id=0x{:04x})",
            self.name, self.bus, self.address, self.product_id
        )
    }
}

/// Lighting control for one keyboard model.
///
/// Calls on the same instance are serialized; keep one instance per process.
#[pyclass(name = "Keyboard")]
pub struct PyKeyboard {
    sender: Arc<PacketSender<NusbBackend>>,
    product_id: u16,
}

#[pymethods]
impl PyKeyboard {
    #[new]
    #[pyo3(signature = (product_id=GRAM_SPECTRUM_PRODUCT_ID, busy_timeout_ms=None))]
    fn new(product_id: u16, busy_timeout_ms: Option<u64>) -> Self {
        let config = SenderConfig {
            busy_timeout_ms,
            ..Default::default()
        };
        Self {
            sender: Arc::new(PacketSender::new(NusbBackend::new(&config), &config)),
            product_id,
        }
    }

    #[getter]
    fn product_id(&self) -> u16 {
        self.product_id
    }

    /// Change active profile (1-5 gaming, 6 PC mode).
    fn set_profile<'py>(&self, py: Python<'py>, profile: u8) -> PyResult<Bound<'py, PyAny>> {
        let profile = Profile::new(profile)?;
        let sender = Arc::clone(&self.sender);
        let product_id = self.product_id;

        future_into_py(py, async move {
            sender.set_profile(product_id, profile).await?;
            Ok(())
        })
    }

    /// Set whole keyboard color. Does not change spectrum mode colors.
    fn set_color<'py>(
        &self,
        py: Python<'py>,
        color: (u8, u8, u8),
        profile: u8,
    ) -> PyResult<Bound<'py, PyAny>> {
        let profile = Profile::new(profile)?;
        let sender = Arc::clone(&self.sender);
        let product_id = self.product_id;

        future_into_py(py, async move {
            sender
                .set_color(product_id, Color::from(color), profile)
                .await?;
            Ok(())
        })
    }

    /// Set lighting mode.
    ///
    /// Modes: 0 standard, 1 trigger, 2 ripple, 3 firework, 4 radiation,
    /// 5 breathing, 6 rainbow wave, 8 spectrum colors.
    /// Submodes (spectrum colors only): 0 shine, 1 breathing, 2 trigger.
    #[pyo3(signature = (mode, profile, submode=0))]
    fn set_mode<'py>(
        &self,
        py: Python<'py>,
        mode: u8,
        profile: u8,
        submode: u8,
    ) -> PyResult<Bound<'py, PyAny>> {
        let mode = Mode::try_from(mode)?;
        let submode = SpectrumSubmode::try_from(submode)?;
        let profile = Profile::new(profile)?;
        let sender = Arc::clone(&self.sender);
        let product_id = self.product_id;

        future_into_py(py, async move {
            sender.set_mode(product_id, mode, profile, submode).await?;
            Ok(())
        })
    }

    /// Set individual key colors from a dict of key name to color tuple.
    fn set_key_colors<'py>(
        &self,
        py: Python<'py>,
        colors: &Bound<'py, PyDict>,
        profile: u8,
    ) -> PyResult<Bound<'py, PyAny>> {
        let profile = Profile::new(profile)?;
        let mut entries = Vec::with_capacity(colors.len());
        for (key, color) in colors.iter() {
            let name: String = key.extract()?;
            let rgb: (u8, u8, u8) = color.extract()?;
            entries.push((name, Color::from(rgb)));
        }

        let sender = Arc::clone(&self.sender);
        let product_id = self.product_id;

        future_into_py(py, async move {
            sender.set_key_colors(product_id, entries, profile).await?;
            Ok(())
        })
    }
}

/// Get connected Tesoro devices (awaitable).
#[pyfunction]
fn get_device_list(py: Python<'_>) -> PyResult<Bound<'_, PyAny>> {
    future_into_py(py, async move {
        let devices = hid::list_devices(&NusbBackend::default()).await?;
        Ok(devices.into_iter().map(PyDevice::from).collect::<Vec<_>>())
    })
}

/// Known key names for `Keyboard.set_key_colors`.
#[pyfunction]
#[pyo3(name = "key_names")]
fn known_key_names() -> Vec<&'static str> {
    crate::keys::key_names().collect()
}

#[pymodule]
fn tesoro_native(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyKeyboard>()?;
    m.add_class::<PyDevice>()?;
    m.add_function(wrap_pyfunction!(get_device_list, m)?)?;
    m.add_function(wrap_pyfunction!(known_key_names, m)?)?;

    m.add("VENDOR_ID", VENDOR_ID)?;
    m.add("GRAM_SPECTRUM_PRODUCT_ID", GRAM_SPECTRUM_PRODUCT_ID)?;

    Ok(())
}
