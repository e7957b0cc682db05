//! Share and export actions, each with its fallback chain.

use crate::capabilities::{Capabilities, SharePayload};
use crate::demo::default_share_text;
use crate::toast::ToastCenter;
use fortune_core::{
    CapabilityError, CoreError, ErrorReporter, Outcome, Portrait, ShareConfig, ShareableContent,
};
use tracing::{debug, info};

pub const NATIVE_SHARE_TITLE: &str = "🔮 My Creator DNA";
pub const NATIVE_SHARE_FALLBACK_TEXT: &str = "Check out my mystical creator portrait!";

const COPIED_TOAST: &str = "✨ Copied to clipboard!";
const DOWNLOADED_TOAST: &str = "📸 Image downloaded!";
const SHARED_TOAST: &str = "🔮 Shared your Creator DNA!";

/// What the share actions work from: the results of one reading.
#[derive(Debug, Clone, PartialEq)]
pub struct ShareContext {
    pub portrait: Portrait,
    pub content: ShareableContent,
}

pub struct ShareService {
    capabilities: Capabilities,
    toasts: ToastCenter,
    reporter: ErrorReporter,
    config: ShareConfig,
    share_origin: String,
    site_host: String,
}

/// A fallback that worked still means the preferred path did not.
fn as_fallback(outcome: Outcome) -> Outcome {
    match outcome {
        Outcome::Completed => Outcome::Degraded,
        other => other,
    }
}

impl ShareService {
    pub fn new(
        capabilities: Capabilities,
        toasts: ToastCenter,
        reporter: ErrorReporter,
        config: ShareConfig,
        share_origin: impl Into<String>,
    ) -> Self {
        let share_origin = share_origin.into();
        let site_host = crate::demo::site_host(&share_origin);
        Self {
            capabilities,
            toasts,
            reporter,
            config,
            share_origin,
            site_host,
        }
    }

    pub fn toasts(&self) -> &ToastCenter {
        &self.toasts
    }

    /// The server-provided copy text, or the default text for the portrait.
    pub fn share_text(&self, ctx: &ShareContext) -> String {
        ctx.content
            .share_urls
            .copy_text
            .clone()
            .unwrap_or_else(|| default_share_text(&ctx.portrait, &self.site_host))
    }

    pub async fn share_to_threads(&self, ctx: &ShareContext) -> Outcome {
        let url = ctx.content.share_urls.threads.as_deref();
        self.open_or_copy("share_to_threads", "Threads", url, ctx).await
    }

    pub async fn share_to_twitter(&self, ctx: &ShareContext) -> Outcome {
        let url = ctx.content.share_urls.twitter.as_deref();
        self.open_or_copy("share_to_twitter", "X", url, ctx).await
    }

    async fn open_or_copy(
        &self,
        operation: &str,
        platform: &str,
        url: Option<&str>,
        ctx: &ShareContext,
    ) -> Outcome {
        let Some(url) = url else {
            debug!("No {} share URL, copying text instead", platform);
            return as_fallback(self.copy_text(ctx).await);
        };

        let opened = match &self.capabilities.url_opener {
            Some(opener) => opener.open(url).await,
            None => Err(CapabilityError::unavailable("url opener")),
        };

        match opened {
            Ok(()) => {
                info!("Opened {} share window", platform);
                self.toasts.show(format!("🔮 Opening {}...", platform));
                Outcome::Completed
            }
            Err(error) => {
                self.reporter
                    .report_warning(operation, &CoreError::Capability(error));
                as_fallback(self.copy_text(ctx).await)
            }
        }
    }

    pub async fn share_to_instagram(&self, ctx: &ShareContext) -> Outcome {
        let payload = SharePayload {
            title: NATIVE_SHARE_TITLE.to_string(),
            text: ctx
                .content
                .share_urls
                .copy_text
                .clone()
                .unwrap_or_else(|| NATIVE_SHARE_FALLBACK_TEXT.to_string()),
            url: self.share_origin.clone(),
        };

        let shared = match &self.capabilities.native_share {
            Some(share) => share.share(&payload).await,
            None => Err(CapabilityError::unavailable("native share")),
        };

        match shared {
            Ok(()) => {
                self.toasts.show(SHARED_TOAST);
                Outcome::Completed
            }
            Err(error) => {
                self.reporter
                    .report_warning("share_to_instagram", &CoreError::Capability(error));
                as_fallback(self.download_image(ctx).await)
            }
        }
    }

    /// Clipboard first, then the legacy clipboard. Fails only when neither
    /// accepted the text.
    pub async fn copy_text(&self, ctx: &ShareContext) -> Outcome {
        let text = self.share_text(ctx);

        let primary = match &self.capabilities.clipboard {
            Some(clipboard) => clipboard.write_text(&text).await,
            None => Err(CapabilityError::unavailable("clipboard")),
        };
        let primary_error = match primary {
            Ok(()) => {
                self.toasts.show(COPIED_TOAST);
                return Outcome::Completed;
            }
            Err(error) => error,
        };
        debug!("Clipboard unavailable ({}), trying legacy copy", primary_error);

        let legacy = match &self.capabilities.legacy_clipboard {
            Some(clipboard) => clipboard.write_text(&text).await,
            None => Err(CapabilityError::unavailable("legacy clipboard")),
        };
        match legacy {
            Ok(()) => {
                self.reporter
                    .report_warning("copy_text", &CoreError::Capability(primary_error));
                self.toasts.show(COPIED_TOAST);
                Outcome::Degraded
            }
            Err(error) => {
                self.reporter
                    .report_error("copy_text", &CoreError::Capability(error));
                Outcome::Failed
            }
        }
    }

    pub async fn download_image(&self, ctx: &ShareContext) -> Outcome {
        let Some(image) = ctx.content.ig_story_image.as_deref() else {
            debug!("No story image to download");
            return Outcome::Skipped;
        };

        let downloaded = match &self.capabilities.downloader {
            Some(downloader) => downloader.download(image, &self.config.image_file_name).await,
            None => Err(CapabilityError::unavailable("file download")),
        };

        match downloaded {
            Ok(()) => {
                self.toasts.show(DOWNLOADED_TOAST);
                Outcome::Completed
            }
            Err(error) => {
                self.reporter
                    .report_error("download_image", &CoreError::Capability(error));
                Outcome::Failed
            }
        }
    }
}
