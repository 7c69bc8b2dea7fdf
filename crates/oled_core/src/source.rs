//! Fontes de dados consultadas a cada intervalo de poll.
//!
//! As implementações degradam sozinhas: qualquer falha vira um valor
//! sentinela (`0.0`, `"error"`, `"unknown"`, `"no_auth"`) e é logada na
//! própria fonte. O loop nunca recebe erro daqui.

/// Métricas locais do sistema.
pub trait MetricsSource {
    /// Uso total da CPU (0–100%).
    fn cpu_percent(&mut self) -> f32;
    /// Uso de RAM (0–100%).
    fn ram_percent(&mut self) -> f32;
    /// Temperatura da CPU em °C; `0.0` se a leitura falhar.
    fn cpu_temp_c(&mut self) -> f32;
}

/// Estado de execução do orquestrador remoto.
pub trait StatusSource {
    fn fetch_state(&mut self) -> String;
}
