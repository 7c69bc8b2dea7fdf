//! Métricas locais – CPU/RAM via `sysinfo`, temperatura via sysfs.
//!
//! CPU e RAM não falham no `sysinfo`; a temperatura vem de um pseudo-arquivo
//! com mili-graus Celsius e pode faltar (container, placa sem sensor).

use oled_core::source::MetricsSource;
use std::path::{Path, PathBuf};
use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};
use tracing::{debug, error};

/// Falha na leitura do sensor térmico.
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("Falha ao ler {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Valor inválido em {path}: {raw:?}")]
    Parse { path: PathBuf, raw: String },
}

/// Lê um valor inteiro em mili-graus e converte para °C.
pub fn read_thermal_file(path: &Path) -> Result<f32, SensorError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SensorError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let millis: i64 = raw.trim().parse().map_err(|_| SensorError::Parse {
        path: path.to_path_buf(),
        raw: raw.trim().to_string(),
    })?;

    Ok(millis as f32 / 1000.0)
}

/// Percentual de memória usada; total zero vira 0%.
fn memory_percent(used: u64, total: u64) -> f32 {
    if total == 0 {
        return 0.0;
    }
    clamp_percent((used as f64 / total as f64 * 100.0) as f32)
}

fn clamp_percent(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Monitor de métricas do host.
pub struct HostMetrics {
    sys: System,
    thermal_path: PathBuf,
}

impl HostMetrics {
    pub fn new(thermal_path: impl Into<PathBuf>) -> Self {
        let mut sys = System::new_with_specifics(
            RefreshKind::nothing()
                .with_cpu(CpuRefreshKind::nothing().with_cpu_usage())
                .with_memory(MemoryRefreshKind::nothing().with_ram()),
        );

        // Primeira leitura para inicializar contadores de uso
        sys.refresh_cpu_usage();

        let thermal_path = thermal_path.into();
        debug!("Sensor térmico: {}", thermal_path.display());

        Self { sys, thermal_path }
    }
}

impl MetricsSource for HostMetrics {
    fn cpu_percent(&mut self) -> f32 {
        self.sys.refresh_cpu_usage();
        clamp_percent(self.sys.global_cpu_usage())
    }

    fn ram_percent(&mut self) -> f32 {
        self.sys.refresh_memory();
        memory_percent(self.sys.used_memory(), self.sys.total_memory())
    }

    fn cpu_temp_c(&mut self) -> f32 {
        match read_thermal_file(&self.thermal_path) {
            Ok(temp) => temp,
            Err(e) => {
                error!("Erro ao ler temperatura da CPU: {e}");
                0.0
            }
        }
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
