//! Configuração unificada via TOML.
//!
//! Todos os campos têm padrão igual às constantes de referência do painel,
//! então um `config.toml` vazio (ou ausente) produz o comportamento padrão.
//! O layout do painel não é configurável.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Variável de ambiente que sobrescreve o caminho do `config.toml`.
pub const CONFIG_PATH_ENV: &str = "OLED_MONITOR_CONFIG";

/// Erros ao persistir a configuração.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Erro de serialização TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Erro de escrita: {0}")]
    Io(#[from] std::io::Error),
}

/// Converte segundos em `Duration` sem entrar em pânico com valores negativos ou NaN.
fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

/// Configuração do display SSD1306.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Device do barramento I2C
    pub i2c_bus: String,
    /// Endereço I2C de 7 bits
    pub address: u8,
    /// Tentativas de abrir o display antes de desistir
    pub init_attempts: u32,
    /// Pausa entre tentativas (segundos)
    pub init_retry_secs: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            i2c_bus: "/dev/i2c-1".into(),
            address: 0x3C,
            init_attempts: 5,
            init_retry_secs: 2.0,
        }
    }
}

impl DisplayConfig {
    pub fn init_retry(&self) -> Duration {
        secs(self.init_retry_secs)
    }
}

/// Cadências do loop e pausas de recuperação.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Intervalo entre leituras de métricas/Supervisor (segundos)
    pub poll_interval_secs: f64,
    /// Pausa entre frames (segundos)
    pub frame_interval_secs: f64,
    /// Pausa após erro de comunicação no barramento (segundos)
    pub bus_error_cooldown_secs: f64,
    /// Pausa após qualquer outro erro (segundos)
    pub unexpected_error_cooldown_secs: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 1.0,
            frame_interval_secs: 0.05,
            bus_error_cooldown_secs: 2.0,
            unexpected_error_cooldown_secs: 1.0,
        }
    }
}

impl TimingConfig {
    pub fn poll_interval(&self) -> Duration {
        secs(self.poll_interval_secs)
    }

    pub fn frame_interval(&self) -> Duration {
        secs(self.frame_interval_secs)
    }

    pub fn bus_error_cooldown(&self) -> Duration {
        secs(self.bus_error_cooldown_secs)
    }

    pub fn unexpected_error_cooldown(&self) -> Duration {
        secs(self.unexpected_error_cooldown_secs)
    }
}

/// Configuração da API do Supervisor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Endpoint de informações
    pub url: String,
    /// Timeout da requisição (segundos)
    pub timeout_secs: f64,
    /// Variáveis de ambiente com o token, em ordem de prioridade
    pub token_vars: Vec<String>,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            url: "http://supervisor/info".into(),
            timeout_secs: 2.0,
            token_vars: vec!["SUPERVISOR_TOKEN".into(), "HASSIO_TOKEN".into()],
        }
    }
}

impl SupervisorConfig {
    pub fn timeout(&self) -> Duration {
        secs(self.timeout_secs)
    }
}

/// Fontes locais de sensores.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Pseudo-arquivo com a temperatura em mili-graus Celsius
    pub thermal_path: PathBuf,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            thermal_path: PathBuf::from("/sys/class/thermal/thermal_zone0/temp"),
        }
    }
}

/// Configuração raiz do monitor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub display: DisplayConfig,
    pub timing: TimingConfig,
    pub supervisor: SupervisorConfig,
    pub sensors: SensorConfig,
}

impl AppConfig {
    /// Carrega configuração de um arquivo TOML.
    ///
    /// Arquivo ausente ou inválido resulta na configuração padrão.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str::<AppConfig>(&content) {
                    Ok(config) => {
                        info!("Configuração carregada de {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        warn!("Erro ao parsear {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    warn!("Erro ao ler {}: {}", path.display(), e);
                }
            }
        }

        info!("Usando configuração padrão");
        AppConfig::default()
    }

    /// Salva configuração em arquivo TOML.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuração salva em {}", path.display());
        Ok(())
    }

    /// Retorna o caminho do config.toml.
    ///
    /// `OLED_MONITOR_CONFIG` tem prioridade; senão, ao lado do executável.
    pub fn default_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
            return PathBuf::from(path);
        }
        let exe_dir = std::env::current_exe()
            .map(|p| p.parent().unwrap_or(Path::new(".")).to_path_buf())
            .unwrap_or_else(|_| PathBuf::from("."));
        exe_dir.join("config.toml")
    }

    /// Valida a configuração e retorna lista de erros.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let d = &self.display;
        if d.i2c_bus.trim().is_empty() {
            errors.push("Barramento I2C não pode ser vazio".into());
        }
        if !(0x03..=0x77).contains(&d.address) {
            errors.push(format!("Endereço I2C inválido: 0x{:02X} (0x03–0x77)", d.address));
        }
        if d.init_attempts == 0 {
            errors.push("Tentativas de inicialização devem ser ≥ 1".into());
        }
        check_range(&mut errors, "Pausa entre tentativas", d.init_retry_secs, 0.0, 60.0);

        let t = &self.timing;
        check_range(&mut errors, "Intervalo de poll", t.poll_interval_secs, 0.1, 60.0);
        check_range(&mut errors, "Intervalo de frame", t.frame_interval_secs, 0.01, 1.0);
        check_range(&mut errors, "Pausa após erro de barramento", t.bus_error_cooldown_secs, 0.0, 60.0);
        check_range(
            &mut errors,
            "Pausa após erro inesperado",
            t.unexpected_error_cooldown_secs,
            0.0,
            60.0,
        );

        let s = &self.supervisor;
        if !(s.url.starts_with("http://") || s.url.starts_with("https://")) {
            errors.push(format!("URL do Supervisor inválida: {:?}", s.url));
        }
        check_range(&mut errors, "Timeout do Supervisor", s.timeout_secs, 0.1, 30.0);
        if s.token_vars.iter().all(|v| v.trim().is_empty()) {
            errors.push("Nenhuma variável de token configurada".into());
        }

        if self.sensors.thermal_path.as_os_str().is_empty() {
            errors.push("Caminho do sensor térmico não pode ser vazio".into());
        }

        errors
    }
}

fn check_range(errors: &mut Vec<String>, label: &str, value: f64, min: f64, max: f64) {
    // `contains` é falso para NaN
    if !(min..=max).contains(&value) {
        errors.push(format!("{label} inválido: {value} ({min}–{max})"));
    }
}
