//! Temporizador monotônico simples.
//!
//! O loop mantém dois `Cadence` independentes (poll e redraw); um não
//! depende do outro para decidir se está na hora.

use std::time::{Duration, Instant};

/// Marca o último disparo e diz quando o próximo está devido.
#[derive(Debug, Clone)]
pub struct Cadence {
    interval: Duration,
    last: Option<Instant>,
}

impl Cadence {
    /// Nova cadência; o primeiro `is_due` é sempre verdadeiro.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_due(&self, now: Instant) -> bool {
        match self.last {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        }
    }

    pub fn mark(&mut self, now: Instant) {
        self.last = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_check_is_due() {
        let c = Cadence::new(Duration::from_secs(1));
        assert!(c.is_due(Instant::now()));
    }

    #[test]
    fn due_again_after_interval() {
        let t0 = Instant::now();
        let mut c = Cadence::new(Duration::from_secs(1));
        c.mark(t0);

        assert!(!c.is_due(t0 + Duration::from_millis(999)));
        assert!(c.is_due(t0 + Duration::from_secs(1)));
        assert!(c.is_due(t0 + Duration::from_secs(7)));
    }

    #[test]
    fn clock_before_mark_is_not_due() {
        let t0 = Instant::now() + Duration::from_secs(10);
        let mut c = Cadence::new(Duration::from_secs(1));
        c.mark(t0);
        assert!(!c.is_due(t0 - Duration::from_secs(5)));
    }

    #[test]
    fn zero_interval_is_always_due() {
        let t0 = Instant::now();
        let mut c = Cadence::new(Duration::ZERO);
        c.mark(t0);
        assert!(c.is_due(t0));
    }
}
