use fortune_core::ReadingConfig;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Timing of the reading animation: `steps` pauses of `step_delay`, each
/// followed by a sub-step advance, then one `final_pause`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingPacer {
    pub step_delay: Duration,
    pub final_pause: Duration,
    pub steps: u8,
}

impl ReadingPacer {
    pub fn from_config(config: &ReadingConfig) -> Self {
        Self {
            step_delay: config.step_delay(),
            final_pause: config.final_pause(),
            steps: config.animation_steps,
        }
    }

    pub fn total_duration(&self) -> Duration {
        self.step_delay * u32::from(self.steps) + self.final_pause
    }

    pub async fn run(&self, mut on_step: impl FnMut(u8)) {
        for step in 1..=self.steps {
            sleep(self.step_delay).await;
            debug!("Reading step {}/{}", step, self.steps);
            on_step(step);
        }
        sleep(self.final_pause).await;
    }
}
