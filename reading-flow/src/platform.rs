//! Desktop implementations of the capability traits.

use crate::capabilities::{Clipboard, FileDownloader, Notifier, UrlOpener};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use fortune_core::CapabilityError;
use notify_rust::{Notification, Timeout};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

const APP_NAME: &str = "Threads Fortune";

/// OS clipboard through `arboard`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<(), CapabilityError> {
        let text = text.to_string();
        tokio::task::spawn_blocking(move || {
            let mut clipboard =
                arboard::Clipboard::new().map_err(|e| CapabilityError::failed("clipboard", e))?;
            clipboard
                .set_text(text)
                .map_err(|e| CapabilityError::failed("clipboard", e))
        })
        .await
        .map_err(|e| CapabilityError::failed("clipboard", e))?
    }
}

/// Last-resort "clipboard": prints the text so it can be copied by hand.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalClipboard;

#[async_trait]
impl Clipboard for TerminalClipboard {
    async fn write_text(&self, text: &str) -> Result<(), CapabilityError> {
        println!("----- copy the text below -----");
        println!("{}", text);
        println!("-------------------------------");
        Ok(())
    }
}

/// Opens URLs in the default browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserOpener;

#[async_trait]
impl UrlOpener for BrowserOpener {
    async fn open(&self, url: &str) -> Result<(), CapabilityError> {
        let url = url.to_string();
        tokio::task::spawn_blocking(move || {
            webbrowser::open(&url).map_err(|e| CapabilityError::failed("url opener", e))
        })
        .await
        .map_err(|e| CapabilityError::failed("url opener", e))?
    }
}

/// Writes downloaded payloads into a directory.
#[derive(Debug, Clone)]
pub struct DirectoryDownloader {
    dir: PathBuf,
}

impl DirectoryDownloader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The user's download directory, or the working directory when the
    /// platform has none.
    pub fn user_downloads() -> Self {
        Self::new(dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Decode a base64 `data:` URI into raw bytes.
pub fn decode_data_uri(data_uri: &str) -> Result<Vec<u8>, CapabilityError> {
    let rest = data_uri
        .strip_prefix("data:")
        .ok_or_else(|| CapabilityError::failed("file download", "not a data URI"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| CapabilityError::failed("file download", "data URI has no payload"))?;
    if !meta.ends_with(";base64") {
        return Err(CapabilityError::failed(
            "file download",
            "only base64 data URIs are supported",
        ));
    }
    BASE64
        .decode(payload.trim())
        .map_err(|e| CapabilityError::failed("file download", e))
}

#[async_trait]
impl FileDownloader for DirectoryDownloader {
    async fn download(&self, data_uri: &str, file_name: &str) -> Result<(), CapabilityError> {
        let bytes = decode_data_uri(data_uri)?;
        let io_err = |e: std::io::Error| CapabilityError::failed("file download", e);

        tokio::fs::create_dir_all(&self.dir).await.map_err(io_err)?;

        // Write next to the target and rename so a partial file never shows
        // up under the final name.
        let target = self.dir.join(file_name);
        let partial = self.dir.join(format!(".{}.part", file_name));
        tokio::fs::write(&partial, &bytes).await.map_err(io_err)?;
        tokio::fs::rename(&partial, &target).await.map_err(io_err)?;

        info!("Saved {} bytes to {}", bytes.len(), target.display());
        Ok(())
    }
}

/// Desktop notifications through `notify-rust`. `show()` blocks on the
/// notification daemon, so it runs on the blocking pool and delivery errors
/// are only logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, message: &str, duration: Duration) -> Result<(), CapabilityError> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|_| CapabilityError::unavailable("desktop notification"))?;

        debug!("Desktop notification: {}", message);
        let message = message.to_string();
        let timeout = Timeout::Milliseconds(duration.as_millis() as u32);
        handle.spawn_blocking(move || {
            if let Err(e) = Notification::new()
                .appname(APP_NAME)
                .summary(APP_NAME)
                .body(&message)
                .timeout(timeout)
                .show()
            {
                warn!("Desktop notification failed: {}", e);
            }
        });
        Ok(())
    }
}
