//! Tipos de dados do monitor.

/// Estados do Supervisor com significado local.
///
/// Qualquer outra string vinda da API é exibida como está.
pub mod ha_state {
    /// Único estado que acende o LED.
    pub const RUNNING: &str = "running";
    /// Resposta válida sem `data.state`.
    pub const UNKNOWN: &str = "unknown";
    /// Falha de rede, timeout, HTTP não-2xx ou corpo inválido.
    pub const ERROR: &str = "error";
    /// Nenhum token configurado; nenhuma requisição é feita.
    pub const NO_AUTH: &str = "no_auth";
    /// Antes da primeira leitura.
    pub const PENDING: &str = "?";
}

/// Últimos valores conhecidos de CPU, RAM, temperatura e estado do Supervisor.
///
/// Capturado uma vez por intervalo de poll e substituído por inteiro.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemSnapshot {
    /// Uso total da CPU (0–100%)
    pub cpu_percent: f32,
    /// Uso de RAM (0–100%)
    pub ram_percent: f32,
    /// Temperatura da CPU (°C)
    pub cpu_temp_c: f32,
    /// Estado reportado pelo Supervisor
    pub ha_state: String,
}

impl SystemSnapshot {
    /// `true` quando o LED de status deve ficar aceso.
    pub fn is_running(&self) -> bool {
        self.ha_state == ha_state::RUNNING
    }
}

impl Default for SystemSnapshot {
    fn default() -> Self {
        Self {
            cpu_percent: 0.0,
            ram_percent: 0.0,
            cpu_temp_c: 0.0,
            ha_state: ha_state::PENDING.into(),
        }
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
