//! Startup diagnostics.
//!
//! When the renderer cannot start, the runtime reports what it knows about the
//! host and the GPU together with the full error chain.

use std::error::Error;
use std::fmt;

/// Host and adapter identification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformInfo {
    pub os: &'static str,
    pub arch: &'static str,
    /// Adapter name, once one has been selected.
    pub adapter: Option<String>,
    pub backend: Option<String>,
    pub driver: Option<String>,
}

impl PlatformInfo {
    /// Host identification only; no adapter has been selected yet.
    pub fn host() -> Self {
        Self {
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
            adapter: None,
            backend: None,
            driver: None,
        }
    }

    pub fn with_adapter(info: &wgpu::AdapterInfo) -> Self {
        let driver = match (info.driver.is_empty(), info.driver_info.is_empty()) {
            (true, _) => None,
            (false, true) => Some(info.driver.clone()),
            (false, false) => Some(format!("{} ({})", info.driver, info.driver_info)),
        };

        Self {
            adapter: Some(info.name.clone()),
            backend: Some(format!("{:?}", info.backend)),
            driver,
            ..Self::host()
        }
    }
}

impl fmt::Display for PlatformInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)?;
        match (&self.adapter, &self.backend) {
            (Some(adapter), Some(backend)) => write!(f, ", adapter {adapter} via {backend}")?,
            (Some(adapter), None) => write!(f, ", adapter {adapter}")?,
            _ => write!(f, ", no adapter")?,
        }
        if let Some(driver) = &self.driver {
            write!(f, ", driver {driver}")?;
        }
        Ok(())
    }
}

/// Human-readable startup failure report: platform line, then one line per error
/// in the source chain.
pub fn startup_failure_message(platform: &PlatformInfo, err: &(dyn Error + 'static)) -> String {
    let mut msg = format!("renderer failed to start on {platform}\n  error: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(&format!("\n  caused by: {cause}"));
        source = cause.source();
    }
    msg
}

/// Logs [`startup_failure_message`] at error level.
pub fn report_startup_failure(platform: &PlatformInfo, err: &(dyn Error + 'static)) {
    log::error!("{}", startup_failure_message(platform, err));
}
