//! Display SSD1306 128×64 via I2C (`linux-embedded-hal` + `ssd1306`).

use display_interface::DisplayError as InterfaceError;
use linux_embedded_hal::I2cdev;
use oled_core::display::{DisplayError, DisplayHandle};
use oled_core::frame::Frame;
use ssd1306::{
    I2CDisplayInterface, Ssd1306,
    mode::BufferedGraphicsMode,
    prelude::*,
    size::DisplaySize128x64,
};
use tracing::info;

type Driver =
    Ssd1306<I2CInterface<I2cdev>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// Painel físico aberto e inicializado.
pub struct Ssd1306Panel {
    driver: Driver,
}

impl Ssd1306Panel {
    /// Abre o barramento, inicializa o controlador e limpa a tela.
    pub fn open(i2c_bus: &str, address: u8) -> Result<Self, DisplayError> {
        info!("Abrindo display em {i2c_bus} (0x{address:02X})");

        let i2c = I2cdev::new(i2c_bus)
            .map_err(|e| DisplayError::Bus(format!("{i2c_bus}: {e}")))?;
        let interface = I2CDisplayInterface::new_custom_address(i2c, address);

        let mut driver = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();

        driver.init().map_err(classify)?;
        driver.clear_buffer();
        driver.flush().map_err(classify)?;

        Ok(Self { driver })
    }
}

impl DisplayHandle for Ssd1306Panel {
    fn display(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        self.driver.clear_buffer();
        for (x, y) in frame.lit_pixels() {
            self.driver.set_pixel(x, y, true);
        }
        self.driver.flush().map_err(classify)
    }
}

/// Separa falhas de barramento (recuperáveis com pausa longa) do resto.
fn classify(err: InterfaceError) -> DisplayError {
    match err {
        InterfaceError::BusWriteError
        | InterfaceError::DCError
        | InterfaceError::CSError
        | InterfaceError::RSError => DisplayError::Bus(format!("{err:?}")),
        other => DisplayError::Unexpected(format!("{other:?}")),
    }
}
