// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TIMING UTILITIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Medição de tempo das etapas com I/O (resolução de redirects).
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::time::{Duration, Instant};

/// Timer de uma etapa nomeada
pub struct ActionTimer {
    start: Instant,
    label: String,
}

impl ActionTimer {
    /// Inicia o timer
    pub fn start(label: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            label: label.into(),
        }
    }

    /// Tempo decorrido
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Encerra o timer logando o tempo junto com um resumo da etapa
    pub fn finish(self, summary: &str) -> Duration {
        let elapsed = self.elapsed();
        log::info!("⏱️  {} em {}ms ({})", self.label, elapsed.as_millis(), summary);
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_action_timer() {
        let timer = ActionTimer::start("test");
        sleep(Duration::from_millis(10));
        let elapsed = timer.finish("ok");
        assert!(elapsed >= Duration::from_millis(10));
    }
}
