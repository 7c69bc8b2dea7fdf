//! Abstração do display físico e inicialização com retry.

use crate::frame::Frame;
use std::time::Duration;
use tracing::{info, warn};

/// Falha ao falar com o display.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DisplayError {
    /// Escrita no barramento (I2C) falhou; costuma se resolver sozinha.
    #[error("Erro de comunicação no barramento: {0}")]
    Bus(String),

    #[error("Erro inesperado no display: {0}")]
    Unexpected(String),
}

impl DisplayError {
    pub fn is_bus(&self) -> bool {
        matches!(self, DisplayError::Bus(_))
    }
}

/// Display monocromático 128×64 que recebe frames completos.
pub trait DisplayHandle {
    /// Transfere o frame inteiro para o painel.
    fn display(&mut self, frame: &Frame) -> Result<(), DisplayError>;
}

impl<D: DisplayHandle + ?Sized> DisplayHandle for Box<D> {
    fn display(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        (**self).display(frame)
    }
}

/// Falha definitiva na abertura do display.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("Display indisponível após {attempts} tentativas: {last}")]
    Exhausted { attempts: u32, last: DisplayError },
}

/// Tenta abrir o display até `attempts` vezes, com `delay` entre tentativas.
///
/// Cada falha é logada como warning; não há pausa depois da última.
/// `attempts == 0` conta como uma tentativa.
pub fn init_with_retry<D, F>(attempts: u32, delay: Duration, mut open: F) -> Result<D, InitError>
where
    F: FnMut() -> Result<D, DisplayError>,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match open() {
            Ok(display) => {
                info!("Display inicializado (tentativa {attempt}/{attempts})");
                return Ok(display);
            }
            Err(e) if attempt < attempts => {
                warn!("Falha ao inicializar display (tentativa {attempt}/{attempts}): {e}");
                std::thread::sleep(delay);
                attempt += 1;
            }
            Err(e) => {
                warn!("Falha ao inicializar display (tentativa {attempt}/{attempts}): {e}");
                return Err(InitError::Exhausted { attempts, last: e });
            }
        }
    }
}
