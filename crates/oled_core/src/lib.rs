//! # OLED Core
//!
//! Crate compartilhada do monitor de status: estruturas de dados,
//! configuração TOML, frame monocromático 128×64, layout do painel e o
//! loop de renderização com isolamento de falhas.
//!
//! ## Módulos
//! - [`types`] – Snapshot do sistema e estados conhecidos do Supervisor
//! - [`config`] – Configuração unificada via TOML
//! - [`frame`] – Bitmap 1-bit que implementa `DrawTarget`
//! - [`layout`] – Layout fixo do painel (textos, barras, LED)
//! - [`cadence`] – Temporizadores monotônicos independentes
//! - [`source`] – Traits das fontes de métricas e de status
//! - [`display`] – Trait do display, erros e inicialização com retry
//! - [`render_loop`] – Loop principal (poll + redraw)

pub mod types;
pub mod config;
pub mod frame;
pub mod layout;
pub mod cadence;
pub mod source;
pub mod display;
pub mod render_loop;

// Re-exports convenientes
pub use types::SystemSnapshot;
pub use config::AppConfig;
pub use frame::Frame;
pub use layout::render_frame;
pub use display::{DisplayError, DisplayHandle, InitError, init_with_retry};
pub use source::{MetricsSource, StatusSource};
pub use render_loop::RenderLoop;
