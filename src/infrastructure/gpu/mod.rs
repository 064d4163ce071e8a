mod monitor;
mod scheduler;

pub use monitor::{GpuError, GpuInfo, GpuMonitor};
pub use scheduler::{GpuPermit, GpuScheduler};
