//! Loop principal: poll de métricas e redraw do painel em cadências separadas.
//!
//! Cada iteração:
//! 1. se o poll está devido, lê métricas + Supervisor e substitui o snapshot;
//! 2. se o redraw está devido, reconstrói o frame e envia ao display;
//! 3. dorme o intervalo de frame.
//!
//! Erros do display são tratados na fronteira da iteração ([`RenderLoop::step`]):
//! logados, seguidos de uma pausa fixa, e o loop continua. Depois da
//! inicialização o processo não sai por falha de renderização.

use crate::cadence::Cadence;
use crate::config::TimingConfig;
use crate::display::{DisplayError, DisplayHandle};
use crate::layout::render_frame;
use crate::source::{MetricsSource, StatusSource};
use crate::types::SystemSnapshot;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Dono exclusivo do display, das fontes e do estado do loop.
pub struct RenderLoop<D, M, S> {
    display: D,
    metrics: M,
    status: S,
    snapshot: SystemSnapshot,
    poll: Cadence,
    redraw: Cadence,
    frame_interval: Duration,
    bus_cooldown: Duration,
    unexpected_cooldown: Duration,
    consecutive_failures: u32,
}

impl<D, M, S> RenderLoop<D, M, S>
where
    D: DisplayHandle,
    M: MetricsSource,
    S: StatusSource,
{
    pub fn new(display: D, metrics: M, status: S, timing: &TimingConfig) -> Self {
        Self {
            display,
            metrics,
            status,
            snapshot: SystemSnapshot::default(),
            poll: Cadence::new(timing.poll_interval()),
            redraw: Cadence::new(timing.frame_interval()),
            frame_interval: timing.frame_interval(),
            bus_cooldown: timing.bus_error_cooldown(),
            unexpected_cooldown: timing.unexpected_error_cooldown(),
            consecutive_failures: 0,
        }
    }

    /// Último snapshot capturado.
    pub fn snapshot(&self) -> &SystemSnapshot {
        &self.snapshot
    }

    /// Falhas de display seguidas desde o último frame entregue.
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Roda para sempre.
    pub fn run(mut self) -> ! {
        info!(
            "Loop iniciado: poll a cada {:.2}s, frame a cada {:.2}s",
            self.poll.interval().as_secs_f64(),
            self.frame_interval.as_secs_f64()
        );
        loop {
            let pause = self.step(Instant::now());
            std::thread::sleep(pause);
        }
    }

    /// Uma iteração com isolamento de falhas.
    ///
    /// Retorna quanto tempo dormir antes da próxima: o intervalo de frame
    /// em caso de sucesso, ou a pausa de recuperação do tipo de erro.
    pub fn step(&mut self, now: Instant) -> Duration {
        match self.tick(now) {
            Ok(()) => {
                if self.consecutive_failures > 0 {
                    info!(
                        "Display recuperado após {} falha(s)",
                        self.consecutive_failures
                    );
                    self.consecutive_failures = 0;
                }
                self.frame_interval
            }
            Err(e) => {
                self.consecutive_failures += 1;
                let pause = self.cooldown_for(&e);
                error!(
                    "{e} (falha #{}, pausa de {:.1}s)",
                    self.consecutive_failures,
                    pause.as_secs_f64()
                );
                pause
            }
        }
    }

    /// Uma iteração sem tratamento: poll (se devido) e redraw (se devido).
    pub fn tick(&mut self, now: Instant) -> Result<(), DisplayError> {
        if self.poll.is_due(now) {
            self.poll_sources();
            self.poll.mark(now);
        }

        if self.redraw.is_due(now) {
            self.redraw.mark(now);
            let frame = render_frame(&self.snapshot);
            self.display.display(&frame)?;
            debug!("Frame enviado ({} pixels acesos)", frame.lit_count());
        }

        Ok(())
    }

    /// Pausa fixa após um erro: maior para falhas de barramento.
    pub fn cooldown_for(&self, error: &DisplayError) -> Duration {
        if error.is_bus() {
            self.bus_cooldown
        } else {
            self.unexpected_cooldown
        }
    }

    fn poll_sources(&mut self) {
        let snapshot = SystemSnapshot {
            cpu_percent: self.metrics.cpu_percent(),
            ram_percent: self.metrics.ram_percent(),
            cpu_temp_c: self.metrics.cpu_temp_c(),
            ha_state: self.status.fetch_state(),
        };

        info!(
            "CPU={:.1}% RAM={:.1}% Temp={:.1}°C HA={}",
            snapshot.cpu_percent, snapshot.ram_percent, snapshot.cpu_temp_c, snapshot.ha_state
        );

        self.snapshot = snapshot;
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Frame;
    use crate::types::ha_state;
    use std::collections::VecDeque;

    /// Display falso com roteiro de falhas.
    #[derive(Default)]
    struct ScriptedDisplay {
        failures: VecDeque<DisplayError>,
        calls: u32,
        frames: Vec<Frame>,
    }

    impl ScriptedDisplay {
        fn failing(errors: Vec<DisplayError>) -> Self {
            Self {
                failures: errors.into(),
                ..Default::default()
            }
        }
    }

    impl DisplayHandle for ScriptedDisplay {
        fn display(&mut self, frame: &Frame) -> Result<(), DisplayError> {
            self.calls += 1;
            if let Some(e) = self.failures.pop_front() {
                return Err(e);
            }
            self.frames.push(frame.clone());
            Ok(())
        }
    }

    struct FixedMetrics {
        cpu: f32,
        ram: f32,
        temp: f32,
        reads: u32,
    }

    impl FixedMetrics {
        fn new(cpu: f32, ram: f32, temp: f32) -> Self {
            Self {
                cpu,
                ram,
                temp,
                reads: 0,
            }
        }
    }

    impl MetricsSource for FixedMetrics {
        fn cpu_percent(&mut self) -> f32 {
            self.reads += 1;
            self.cpu
        }

        fn ram_percent(&mut self) -> f32 {
            self.ram
        }

        fn cpu_temp_c(&mut self) -> f32 {
            self.temp
        }
    }

    struct FixedStatus(&'static str);

    impl StatusSource for FixedStatus {
        fn fetch_state(&mut self) -> String {
            self.0.to_string()
        }
    }

    fn make_loop(
        display: ScriptedDisplay,
        state: &'static str,
    ) -> RenderLoop<ScriptedDisplay, FixedMetrics, FixedStatus> {
        RenderLoop::new(
            display,
            FixedMetrics::new(73.2, 41.0, 52.3),
            FixedStatus(state),
            &TimingConfig::default(),
        )
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn first_tick_polls_and_draws() {
        let mut rl = make_loop(ScriptedDisplay::default(), ha_state::RUNNING);
        let pause = rl.step(Instant::now());

        assert_eq!(pause, ms(50));
        assert_eq!(rl.metrics.reads, 1);
        assert_eq!(rl.snapshot().ha_state, "running");
        assert_eq!(rl.snapshot().cpu_percent, 73.2);
        assert_eq!(rl.display.frames.len(), 1);
        assert_eq!(rl.display.frames[0], render_frame(rl.snapshot()));
    }

    #[test]
    fn poll_and_redraw_run_on_separate_cadences() {
        let t0 = Instant::now();
        let mut rl = make_loop(ScriptedDisplay::default(), ha_state::RUNNING);

        // 20 frames em ~1s: um único poll até completar o intervalo
        for i in 0..20 {
            rl.step(t0 + ms(50 * i));
        }
        assert_eq!(rl.metrics.reads, 1);
        assert_eq!(rl.display.calls, 20);

        rl.step(t0 + ms(1000));
        assert_eq!(rl.metrics.reads, 2);
        assert_eq!(rl.display.calls, 21);
    }

    #[test]
    fn redraw_is_skipped_when_called_too_early() {
        let t0 = Instant::now();
        let mut rl = make_loop(ScriptedDisplay::default(), ha_state::RUNNING);
        rl.step(t0);
        rl.step(t0 + ms(10));
        assert_eq!(rl.display.calls, 1);
    }

    #[test]
    fn survives_consecutive_display_failures() {
        let t0 = Instant::now();
        let failures = vec![
            DisplayError::Bus("remote I/O error".into()),
            DisplayError::Bus("remote I/O error".into()),
            DisplayError::Unexpected("formato".into()),
        ];
        let mut rl = make_loop(ScriptedDisplay::failing(failures), ha_state::RUNNING);

        assert_eq!(rl.step(t0), Duration::from_secs(2));
        assert_eq!(rl.step(t0 + ms(2000)), Duration::from_secs(2));
        assert_eq!(rl.step(t0 + ms(4000)), Duration::from_secs(1));
        assert_eq!(rl.consecutive_failures(), 3);

        // Iteração N+1 acontece e entrega o frame
        assert_eq!(rl.step(t0 + ms(5000)), ms(50));
        assert_eq!(rl.display.calls, 4);
        assert_eq!(rl.display.frames.len(), 1);
        assert_eq!(rl.consecutive_failures(), 0);
    }

    #[test]
    fn failed_render_does_not_skip_next_poll() {
        let t0 = Instant::now();
        let failures = vec![DisplayError::Bus("nack".into()); 3];
        let mut rl = make_loop(ScriptedDisplay::failing(failures), ha_state::RUNNING);

        rl.step(t0);
        rl.step(t0 + ms(1000));
        rl.step(t0 + ms(2000));
        assert_eq!(rl.metrics.reads, 3);
        assert!(rl.display.frames.is_empty());
    }

    #[test]
    fn tick_surfaces_the_error_kind() {
        let failures = vec![DisplayError::Unexpected("boom".into())];
        let mut rl = make_loop(ScriptedDisplay::failing(failures), ha_state::RUNNING);
        assert_eq!(
            rl.tick(Instant::now()),
            Err(DisplayError::Unexpected("boom".into()))
        );
    }

    #[test]
    fn cooldowns_follow_timing_config() {
        let timing = TimingConfig {
            bus_error_cooldown_secs: 3.0,
            unexpected_error_cooldown_secs: 0.5,
            ..Default::default()
        };
        let rl = RenderLoop::new(
            ScriptedDisplay::default(),
            FixedMetrics::new(0.0, 0.0, 0.0),
            FixedStatus("?"),
            &timing,
        );
        assert_eq!(rl.cooldown_for(&DisplayError::Bus("x".into())), Duration::from_secs(3));
        assert_eq!(rl.cooldown_for(&DisplayError::Unexpected("x".into())), ms(500));
    }

    #[test]
    fn no_auth_state_renders_hollow_led() {
        let mut rl = make_loop(ScriptedDisplay::default(), ha_state::NO_AUTH);
        rl.step(Instant::now());
        let frame = &rl.display.frames[0];
        assert_eq!(rl.snapshot().ha_state, "no_auth");
        assert!(!frame.pixel(120, 54));
        assert!(frame.pixel(120, 50));
    }

    #[test]
    fn frames_before_first_poll_use_pending_snapshot() {
        let rl = make_loop(ScriptedDisplay::default(), ha_state::RUNNING);
        assert_eq!(rl.snapshot(), &SystemSnapshot::default());
    }
}
