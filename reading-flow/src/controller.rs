use crate::capabilities::Capabilities;
use crate::demo::demo_generated;
use crate::pacing::ReadingPacer;
use crate::share::{ShareContext, ShareService};
use crate::state::FlowState;
use crate::toast::ToastCenter;
use fortune_core::{
    ActivityGuard, CoreError, ErrorRecovery, ErrorReporter, GeneratedPortrait, Observable,
    Outcome, PortraitSource, ReadingConfig, ReadingGateway, ReadingStep, RecoveryResult,
    RecoveryStrategy, ShareConfig,
};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// Drives `landing -> connecting -> reading -> results` and the share
/// actions available on the results step.
///
/// Every method takes `&mut self`, so a reset can never interleave with a
/// reading that is still in flight on the same controller.
pub struct ReadingFlowController<G: ReadingGateway> {
    gateway: Arc<G>,
    reporter: ErrorReporter,
    config: ReadingConfig,
    pacer: ReadingPacer,
    share: ShareService,
    state: Observable<FlowState>,
}

impl<G: ReadingGateway> ReadingFlowController<G> {
    pub fn new(
        gateway: Arc<G>,
        capabilities: Capabilities,
        reporter: ErrorReporter,
        config: ReadingConfig,
        share_config: ShareConfig,
    ) -> Self {
        let toasts = ToastCenter::new(
            share_config.toast_duration(),
            capabilities.notifier.clone(),
        );
        let share = ShareService::new(
            capabilities,
            toasts,
            reporter.clone(),
            share_config,
            config.share_origin.clone(),
        );

        Self {
            gateway,
            reporter,
            pacer: ReadingPacer::from_config(&config),
            config,
            share,
            state: Observable::new(FlowState::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FlowState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> FlowState {
        self.state.snapshot()
    }

    pub fn step(&self) -> ReadingStep {
        self.state.read(|s| s.step)
    }

    pub fn reporter(&self) -> &ErrorReporter {
        &self.reporter
    }

    pub fn toasts(&self) -> &ToastCenter {
        self.share.toasts()
    }

    fn require_step(&self, expected: ReadingStep, action: &str) -> bool {
        let current = self.step();
        if current == expected {
            return true;
        }
        self.reporter.report_warning(
            action,
            &CoreError::InvalidTransition {
                from: current.to_string(),
                action: action.to_string(),
            },
        );
        false
    }

    pub fn start_reading(&mut self) -> Outcome {
        if !self.require_step(ReadingStep::Landing, "start_reading") {
            return Outcome::Skipped;
        }
        self.state.update(|s| s.step = ReadingStep::Connecting);
        info!("Reading started");
        Outcome::Completed
    }

    /// Sync, play the animation, then generate the portrait. Always ends on
    /// the results step; a failed generation lands on the demo portrait.
    pub async fn connect_threads(&mut self) -> Outcome {
        if !self.require_step(ReadingStep::Connecting, "connect_threads") {
            return Outcome::Skipped;
        }

        self.state.update(|s| {
            s.step = ReadingStep::Reading;
            s.reading_step = 0;
        });
        let _activity = ActivityGuard::begin(&self.state);

        let synced = ErrorRecovery::apply_strategy(
            RecoveryStrategy::Skip,
            &self.reporter,
            "sync",
            || self.gateway.sync(),
        )
        .await;
        if let RecoveryResult::Recovered(result) = &synced {
            debug!("Data synced: {}", result);
        }

        let state = self.state.clone();
        self.pacer
            .run(|step| state.update(|s| s.reading_step = step))
            .await;

        let share_origin = self.config.share_origin.clone();
        let generated = ErrorRecovery::apply_with_fallback(
            RecoveryStrategy::Fallback,
            &self.reporter,
            "generate_portrait",
            || self.gateway.generate_portrait(),
            || demo_generated(&share_origin),
        )
        .await;

        let (portrait, source) = match generated {
            RecoveryResult::Recovered(portrait) => (portrait, PortraitSource::Generated),
            RecoveryResult::Degraded(portrait) => (portrait, PortraitSource::Demo),
            RecoveryResult::Skipped | RecoveryResult::Failed(_) => {
                (demo_generated(&share_origin), PortraitSource::Demo)
            }
        };
        self.show_results(portrait, source);

        match (synced.is_recovered(), source) {
            (true, PortraitSource::Generated) => Outcome::Completed,
            _ => Outcome::Degraded,
        }
    }

    fn show_results(&self, generated: GeneratedPortrait, source: PortraitSource) {
        info!("Reading complete ({:?} portrait)", source);
        self.state.update(|s| {
            s.portrait = Some(generated.portrait);
            s.shareable_content = Some(generated.shareable_content);
            s.source = Some(source);
            s.step = ReadingStep::Results;
        });
    }

    /// Back to landing from any step.
    pub fn reset(&mut self) -> Outcome {
        self.state.update(|s| {
            s.step = ReadingStep::Landing;
            s.reading_step = 0;
            s.portrait = None;
            s.shareable_content = None;
            s.source = None;
        });
        info!("Reading reset");
        Outcome::Completed
    }

    fn share_context(&self, action: &str) -> Option<ShareContext> {
        if !self.require_step(ReadingStep::Results, action) {
            return None;
        }
        self.state.read(|s| {
            Some(ShareContext {
                portrait: s.portrait.clone()?,
                content: s.shareable_content.clone()?,
            })
        })
    }

    /// Text offered by the copy action for the current results.
    pub fn share_text(&self) -> Option<String> {
        let ctx = self.state.read(|s| {
            Some(ShareContext {
                portrait: s.portrait.clone()?,
                content: s.shareable_content.clone()?,
            })
        })?;
        Some(self.share.share_text(&ctx))
    }

    pub async fn share_to_threads(&mut self) -> Outcome {
        match self.share_context("share_to_threads") {
            Some(ctx) => self.share.share_to_threads(&ctx).await,
            None => Outcome::Skipped,
        }
    }

    pub async fn share_to_twitter(&mut self) -> Outcome {
        match self.share_context("share_to_twitter") {
            Some(ctx) => self.share.share_to_twitter(&ctx).await,
            None => Outcome::Skipped,
        }
    }

    pub async fn share_to_instagram(&mut self) -> Outcome {
        match self.share_context("share_to_instagram") {
            Some(ctx) => self.share.share_to_instagram(&ctx).await,
            None => Outcome::Skipped,
        }
    }

    pub async fn copy_text(&mut self) -> Outcome {
        match self.share_context("copy_text") {
            Some(ctx) => self.share.copy_text(&ctx).await,
            None => Outcome::Skipped,
        }
    }

    pub async fn download_image(&mut self) -> Outcome {
        match self.share_context("download_image") {
            Some(ctx) => self.share.download_image(&ctx).await,
            None => Outcome::Skipped,
        }
    }
}
