use serde::Serialize;
use tokio::process::Command;

const DEFAULT_SMI_BIN: &str = "nvidia-smi";
const SMI_QUERY: &str = "--query-gpu=name,memory.total,memory.used";
const SMI_FORMAT: &str = "--format=csv,noheader,nounits";

/// GPU identity and memory as reported by the driver, in MiB.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GpuInfo {
    pub name: String,
    pub memory_mb: u64,
    pub memory_used_mb: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("GPU not detected: {0}")]
    NotDetected(String),
    #[error("GPU probe failed: {0}")]
    ProbeFailed(String),
}

/// Probes GPU presence and memory through the driver's query tool.
///
/// The model backends run in sidecar processes, so this is the gateway's only
/// direct view of the device. Every other guarantee in the service depends on
/// the GPU existing, which is why the startup probe is fatal.
pub struct GpuMonitor {
    smi_bin: String,
}

impl GpuMonitor {
    pub fn new(smi_bin: impl Into<String>) -> Self {
        Self {
            smi_bin: smi_bin.into(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(std::env::var("NVIDIA_SMI_BIN").unwrap_or_else(|_| DEFAULT_SMI_BIN.to_string()))
    }

    /// Queries the first GPU. Used by the health endpoint on every call, so
    /// memory figures are current rather than cached.
    pub async fn probe(&self) -> Result<GpuInfo, GpuError> {
        let output = Command::new(&self.smi_bin)
            .args([SMI_QUERY, SMI_FORMAT])
            .output()
            .await
            .map_err(|e| GpuError::NotDetected(format!("{}: {e}", self.smi_bin)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GpuError::NotDetected(stderr.trim().to_string()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let first_line = stdout
            .lines()
            .next()
            .ok_or_else(|| GpuError::NotDetected("no GPU listed".to_string()))?;

        parse_smi_line(first_line)
            .ok_or_else(|| GpuError::ProbeFailed(format!("unparseable query output: {first_line}")))
    }

    /// Startup verification. The process must refuse to start without a GPU;
    /// the caller exits non-zero on error.
    pub async fn verify_at_startup(&self) -> Result<GpuInfo, GpuError> {
        let info = self.probe().await?;
        tracing::info!(
            gpu = %info.name,
            memory_mb = info.memory_mb,
            "GPU verified"
        );
        Ok(info)
    }
}

fn parse_smi_line(line: &str) -> Option<GpuInfo> {
    let mut fields = line.split(',').map(str::trim);
    let name = fields.next()?.to_string();
    let memory_mb = fields.next()?.parse().ok()?;
    let memory_used_mb = fields.next()?.parse().ok()?;
    if name.is_empty() {
        return None;
    }
    Some(GpuInfo {
        name,
        memory_mb,
        memory_used_mb,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_standard_query_line() {
        let info = parse_smi_line("NVIDIA GeForce RTX 3090, 24576, 1024").unwrap();
        assert_eq!(info.name, "NVIDIA GeForce RTX 3090");
        assert_eq!(info.memory_mb, 24576);
        assert_eq!(info.memory_used_mb, 1024);
    }

    #[test]
    fn rejects_truncated_line() {
        assert!(parse_smi_line("NVIDIA A100, 40960").is_none());
        assert!(parse_smi_line("").is_none());
    }

    #[tokio::test]
    async fn missing_binary_reports_not_detected() {
        let monitor = GpuMonitor::new("/nonexistent/nvidia-smi");
        let err = monitor.probe().await.unwrap_err();
        assert!(matches!(err, GpuError::NotDetected(_)));
    }
}
