//! # OLED Monitor
//!
//! Lê CPU, RAM, temperatura e o estado do Home Assistant Supervisor e
//! desenha um painel fixo num display SSD1306 128×64 via I2C.
//!
//! ## Uso
//! ```bash
//! SUPERVISOR_TOKEN=... oled_monitor
//! OLED_MONITOR_CONFIG=/data/oled.toml oled_monitor
//! RUST_LOG=debug oled_monitor
//! ```
//!
//! Sai com código 1 apenas se o display não puder ser aberto.

mod metrics;
mod panel;
mod supervisor;

use metrics::HostMetrics;
use oled_core::config::AppConfig;
use oled_core::{RenderLoop, init_with_retry};
use panel::Ssd1306Panel;
use supervisor::{SupervisorClient, token_from_env};
use tracing::{error, info, warn};

fn main() {
    // ── Logging ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    info!("Monitor OLED iniciando...");

    // ── Carregar config ──
    let config_path = AppConfig::default_path();
    let mut config = AppConfig::load(&config_path);

    // Salva config padrão se não existir
    if !config_path.exists() {
        if let Err(e) = config.save(&config_path) {
            warn!("Não foi possível salvar config padrão: {e}");
        }
    }

    let problems = config.validate();
    if !problems.is_empty() {
        for p in &problems {
            warn!("Config inválida: {p}");
        }
        warn!("Usando configuração padrão");
        config = AppConfig::default();
    }

    // ── Banner ──
    info!("══════════════════════════════════════════════");
    info!("  Display:    {} @ 0x{:02X}", config.display.i2c_bus, config.display.address);
    info!("  Supervisor: {}", config.supervisor.url);
    info!("  Sensor:     {}", config.sensors.thermal_path.display());
    info!(
        "  Poll {:.2}s | Frame {:.2}s",
        config.timing.poll_interval_secs, config.timing.frame_interval_secs
    );
    info!("══════════════════════════════════════════════");

    // ── Display (única falha fatal) ──
    let display_cfg = &config.display;
    let panel = match init_with_retry(display_cfg.init_attempts, display_cfg.init_retry(), || {
        Ssd1306Panel::open(&display_cfg.i2c_bus, display_cfg.address)
    }) {
        Ok(panel) => panel,
        Err(e) => {
            error!("CRÍTICO: {e}. Encerrando.");
            std::process::exit(1);
        }
    };

    // ── Fontes ──
    let metrics = HostMetrics::new(&config.sensors.thermal_path);

    let token = token_from_env(&config.supervisor.token_vars);
    let status = SupervisorClient::new(
        config.supervisor.url.clone(),
        token,
        config.supervisor.timeout(),
    );
    if !status.has_token() {
        warn!(
            "Nenhum token em {:?}; status do HA será \"no_auth\"",
            config.supervisor.token_vars
        );
    }

    // ── Loop principal ──
    RenderLoop::new(panel, metrics, status, &config.timing).run()
}
