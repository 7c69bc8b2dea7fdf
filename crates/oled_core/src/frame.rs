//! Bitmap monocromático 128×64 (1 bit por pixel).
//!
//! O frame é reconstruído do zero a cada tick e depois copiado para o
//! display. Implementa `DrawTarget<Color = BinaryColor>`, então qualquer
//! primitiva do `embedded-graphics` desenha direto nele.

use core::convert::Infallible;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use std::fmt;

/// Largura do painel em pixels.
pub const WIDTH: u32 = 128;
/// Altura do painel em pixels.
pub const HEIGHT: u32 = 64;

const BYTES_PER_ROW: usize = (WIDTH / 8) as usize;
const BUFFER_SIZE: usize = BYTES_PER_ROW * HEIGHT as usize;

/// Frame 1-bit, linha a linha, bit mais significativo à esquerda.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    buf: [u8; BUFFER_SIZE],
}

impl Frame {
    /// Frame com todos os pixels apagados.
    pub fn new() -> Self {
        Self {
            buf: [0; BUFFER_SIZE],
        }
    }

    /// Estado do pixel; fora dos limites é sempre apagado.
    pub fn pixel(&self, x: u32, y: u32) -> bool {
        match Self::index(x, y) {
            Some((byte, mask)) => self.buf[byte] & mask != 0,
            None => false,
        }
    }

    /// Acende ou apaga um pixel. Coordenadas fora do painel são ignoradas.
    pub fn set_pixel(&mut self, x: u32, y: u32, on: bool) {
        if let Some((byte, mask)) = Self::index(x, y) {
            if on {
                self.buf[byte] |= mask;
            } else {
                self.buf[byte] &= !mask;
            }
        }
    }

    /// Itera sobre as coordenadas dos pixels acesos.
    pub fn lit_pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..HEIGHT)
            .flat_map(|y| (0..WIDTH).map(move |x| (x, y)))
            .filter(|&(x, y)| self.pixel(x, y))
    }

    /// Quantidade de pixels acesos.
    pub fn lit_count(&self) -> u32 {
        self.buf.iter().map(|b| b.count_ones()).sum()
    }

    fn index(x: u32, y: u32) -> Option<(usize, u8)> {
        if x >= WIDTH || y >= HEIGHT {
            return None;
        }
        let byte = y as usize * BYTES_PER_ROW + (x / 8) as usize;
        Some((byte, 0x80 >> (x % 8)))
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("size", &format_args!("{WIDTH}x{HEIGHT}"))
            .field("lit", &self.lit_count())
            .finish()
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        Size::new(WIDTH, HEIGHT)
    }
}

impl DrawTarget for Frame {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 {
                self.set_pixel(point.x as u32, point.y as u32, color.is_on());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    #[test]
    fn new_frame_is_blank() {
        let frame = Frame::new();
        assert_eq!(frame.lit_count(), 0);
        assert_eq!(frame.lit_pixels().count(), 0);
    }

    #[test]
    fn set_and_clear_pixel() {
        let mut frame = Frame::new();
        frame.set_pixel(0, 0, true);
        frame.set_pixel(127, 63, true);
        frame.set_pixel(9, 1, true);
        assert!(frame.pixel(0, 0));
        assert!(frame.pixel(127, 63));
        assert!(frame.pixel(9, 1));
        assert!(!frame.pixel(1, 0));
        assert!(!frame.pixel(9, 0));
        assert_eq!(frame.lit_count(), 3);

        frame.set_pixel(9, 1, false);
        assert!(!frame.pixel(9, 1));
        assert_eq!(frame.lit_count(), 2);
    }

    #[test]
    fn out_of_bounds_is_ignored() {
        let mut frame = Frame::new();
        frame.set_pixel(128, 0, true);
        frame.set_pixel(0, 64, true);
        Pixel(Point::new(-1, 5), BinaryColor::On).draw(&mut frame).unwrap();
        assert_eq!(frame.lit_count(), 0);
        assert!(!frame.pixel(500, 500));
    }

    #[test]
    fn draws_embedded_graphics_primitives() {
        let mut frame = Frame::new();
        Rectangle::new(Point::new(2, 3), Size::new(4, 2))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut frame)
            .unwrap();
        assert_eq!(frame.lit_count(), 8);
        let lit: Vec<_> = frame.lit_pixels().collect();
        assert_eq!(lit.first(), Some(&(2, 3)));
        assert_eq!(lit.last(), Some(&(5, 4)));
    }
}
