//! Platform capabilities the share subsystem calls into. Any of them may be
//! missing, which is expressed with `Option` on [`Capabilities`].

use async_trait::async_trait;
use fortune_core::CapabilityError;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), CapabilityError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

#[async_trait]
pub trait NativeShare: Send + Sync {
    /// `Err(CapabilityError::UserCancelled)` when the user dismisses the sheet.
    async fn share(&self, payload: &SharePayload) -> Result<(), CapabilityError>;
}

#[async_trait]
pub trait UrlOpener: Send + Sync {
    async fn open(&self, url: &str) -> Result<(), CapabilityError>;
}

#[async_trait]
pub trait FileDownloader: Send + Sync {
    /// Save a `data:` URI under `file_name`.
    async fn download(&self, data_uri: &str, file_name: &str) -> Result<(), CapabilityError>;
}

pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, duration: Duration) -> Result<(), CapabilityError>;
}

#[derive(Clone, Default)]
pub struct Capabilities {
    pub clipboard: Option<Arc<dyn Clipboard>>,
    pub legacy_clipboard: Option<Arc<dyn Clipboard>>,
    pub native_share: Option<Arc<dyn NativeShare>>,
    pub url_opener: Option<Arc<dyn UrlOpener>>,
    pub downloader: Option<Arc<dyn FileDownloader>>,
    pub notifier: Option<Arc<dyn Notifier>>,
}

impl Capabilities {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_clipboard(mut self, clipboard: Arc<dyn Clipboard>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    pub fn with_legacy_clipboard(mut self, clipboard: Arc<dyn Clipboard>) -> Self {
        self.legacy_clipboard = Some(clipboard);
        self
    }

    pub fn with_native_share(mut self, share: Arc<dyn NativeShare>) -> Self {
        self.native_share = Some(share);
        self
    }

    pub fn with_url_opener(mut self, opener: Arc<dyn UrlOpener>) -> Self {
        self.url_opener = Some(opener);
        self
    }

    pub fn with_downloader(mut self, downloader: Arc<dyn FileDownloader>) -> Self {
        self.downloader = Some(downloader);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("clipboard", &self.clipboard.is_some())
            .field("legacy_clipboard", &self.legacy_clipboard.is_some())
            .field("native_share", &self.native_share.is_some())
            .field("url_opener", &self.url_opener.is_some())
            .field("downloader", &self.downloader.is_some())
            .field("notifier", &self.notifier.is_some())
            .finish()
    }
}
