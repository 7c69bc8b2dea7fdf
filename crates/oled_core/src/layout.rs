//! Layout fixo do painel 128×64.
//!
//! ```text
//! ┌────────────────────────────────────────┐
//! │System Monitor                          │ y=0
//! │CPU: 73.2%        [██████████·······]   │ y=14 / barra y=16
//! │RAM: 41.0%        [██████···········]   │ y=26 / barra y=28
//! │Temp: 52.3C                             │ y=38
//! │HA: running                          ●  │ y=50 / LED (116,50)-(124,58)
//! └────────────────────────────────────────┘
//! ```
//!
//! O frame é função pura do [`SystemSnapshot`]: o mesmo snapshot sempre
//! produz o mesmo bitmap.

use crate::frame::Frame;
use crate::types::SystemSnapshot;
use embedded_graphics::mono_font::{MonoTextStyle, ascii::FONT_6X10};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle};
use embedded_graphics::text::{Baseline, Text};

/// Título na primeira linha.
pub const HEADER: &str = "System Monitor";

/// Topo de cada linha de texto (cabeçalho, CPU, RAM, Temp, HA).
pub const LINE_Y: [i32; 5] = [0, 14, 26, 38, 50];

/// Coluna das barras.
pub const GAUGE_X: i32 = 70;
/// Largura total da barra (contorno).
pub const GAUGE_WIDTH: u32 = 50;
/// Altura da barra.
pub const GAUGE_HEIGHT: u32 = 6;
/// Topo da barra de CPU.
pub const CPU_GAUGE_Y: i32 = 16;
/// Topo da barra de RAM.
pub const RAM_GAUGE_Y: i32 = 28;

/// Canto superior esquerdo do LED de status.
pub const LED_TOP_LEFT: Point = Point::new(116, 50);
/// Diâmetro do LED (caixa 116..=124 × 50..=58).
pub const LED_DIAMETER: u32 = 9;

/// Linhas de valores, na ordem em que aparecem abaixo do cabeçalho.
pub fn status_lines(snapshot: &SystemSnapshot) -> [String; 4] {
    [
        format!("CPU: {:4.1}%", snapshot.cpu_percent),
        format!("RAM: {:4.1}%", snapshot.ram_percent),
        format!("Temp: {:4.1}C", snapshot.cpu_temp_c),
        format!("HA: {}", snapshot.ha_state),
    ]
}

/// Largura preenchida da barra para um percentual.
///
/// `floor(50 * v / 100)` com `v` limitado a 0–100; NaN conta como zero.
pub fn gauge_fill_width(percent: f32) -> u32 {
    if !percent.is_finite() {
        return 0;
    }
    let percent = percent.clamp(0.0, 100.0);
    ((GAUGE_WIDTH as f32 * percent / 100.0).floor() as u32).min(GAUGE_WIDTH)
}

/// Reconstrói o frame completo a partir do snapshot.
pub fn render_frame(snapshot: &SystemSnapshot) -> Frame {
    let mut frame = Frame::new();
    let Ok(()) = draw_dashboard(&mut frame, snapshot);
    frame
}

/// Desenha o painel em qualquer alvo monocromático.
pub fn draw_dashboard<D>(target: &mut D, snapshot: &SystemSnapshot) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let text_style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);

    Text::with_baseline(HEADER, Point::new(0, LINE_Y[0]), text_style, Baseline::Top)
        .draw(target)?;

    for (line, y) in status_lines(snapshot).iter().zip(&LINE_Y[1..]) {
        Text::with_baseline(line, Point::new(0, *y), text_style, Baseline::Top).draw(target)?;
    }

    draw_gauge(target, CPU_GAUGE_Y, snapshot.cpu_percent)?;
    draw_gauge(target, RAM_GAUGE_Y, snapshot.ram_percent)?;
    draw_led(target, snapshot.is_running())
}

fn draw_gauge<D>(target: &mut D, y: i32, percent: f32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let origin = Point::new(GAUGE_X, y);

    Rectangle::new(origin, Size::new(GAUGE_WIDTH, GAUGE_HEIGHT))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(target)?;

    Rectangle::new(origin, Size::new(gauge_fill_width(percent), GAUGE_HEIGHT))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(target)
}

fn draw_led<D>(target: &mut D, lit: bool) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let mut style = PrimitiveStyleBuilder::new()
        .stroke_color(BinaryColor::On)
        .stroke_width(1);
    if lit {
        style = style.fill_color(BinaryColor::On);
    }

    Circle::new(LED_TOP_LEFT, LED_DIAMETER)
        .into_styled(style.build())
        .draw(target)
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
