#![allow(dead_code)]

use async_trait::async_trait;
use fortune_core::{
    CapabilityError, CoreError, GatewayError, GeneratedPortrait, Portrait, ReadingConfig,
    ReadingGateway, ShareConfig, ShareUrls, ShareableContent,
};
use reading_flow::{
    Capabilities, Clipboard, FileDownloader, NativeShare, ReadingFlowController, SharePayload,
    UrlOpener,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn server_error(endpoint: &str, status: u16) -> CoreError {
    CoreError::Gateway(GatewayError::ServerError {
        endpoint: endpoint.to_string(),
        status,
    })
}

pub fn generated_portrait() -> GeneratedPortrait {
    GeneratedPortrait {
        portrait: Portrait {
            archetype: Some("The Midnight Philosopher".to_string()),
            posting_spirit: Some("Dawn Poster".to_string()),
            shareable_quote: Some("Deep thoughts, late nights".to_string()),
            ..Portrait::default()
        },
        shareable_content: ShareableContent {
            ig_story_image: Some("data:image/png;base64,AAAA".to_string()),
            share_urls: ShareUrls {
                threads: Some("https://threads.net/intent/post?text=generated".to_string()),
                twitter: Some("https://twitter.com/intent/tweet?text=generated".to_string()),
                copy_text: Some("generated copy text".to_string()),
                ..ShareUrls::default()
            },
            ..ShareableContent::default()
        },
    }
}

pub struct FakeGateway {
    pub sync_status: Option<u16>,
    pub generate_status: Option<u16>,
    pub generated: GeneratedPortrait,
    pub sync_calls: AtomicUsize,
    pub generate_calls: AtomicUsize,
}

impl FakeGateway {
    pub fn healthy() -> Self {
        Self {
            sync_status: None,
            generate_status: None,
            generated: generated_portrait(),
            sync_calls: AtomicUsize::new(0),
            generate_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_sync(status: u16) -> Self {
        Self {
            sync_status: Some(status),
            ..Self::healthy()
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            sync_status: Some(status),
            generate_status: Some(status),
            ..Self::healthy()
        }
    }
}

#[async_trait]
impl ReadingGateway for FakeGateway {
    async fn sync(&self) -> Result<serde_json::Value, CoreError> {
        self.sync_calls.fetch_add(1, Ordering::SeqCst);
        match self.sync_status {
            Some(status) => Err(server_error("/api/sync", status)),
            None => Ok(json!({ "synced": 12 })),
        }
    }

    async fn generate_portrait(&self) -> Result<GeneratedPortrait, CoreError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        match self.generate_status {
            Some(status) => Err(server_error("/api/generate-portrait", status)),
            None => Ok(self.generated.clone()),
        }
    }
}

#[derive(Default)]
pub struct FakeClipboard {
    pub fail: bool,
    pub copied: Mutex<Vec<String>>,
}

impl FakeClipboard {
    pub fn broken() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl Clipboard for FakeClipboard {
    async fn write_text(&self, text: &str) -> Result<(), CapabilityError> {
        if self.fail {
            return Err(CapabilityError::failed("clipboard", "permission denied"));
        }
        self.copied.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeOpener {
    pub fail: bool,
    pub opened: Mutex<Vec<String>>,
}

#[async_trait]
impl UrlOpener for FakeOpener {
    async fn open(&self, url: &str) -> Result<(), CapabilityError> {
        if self.fail {
            return Err(CapabilityError::failed("url opener", "no browser"));
        }
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeShare {
    pub cancel: bool,
    pub shared: Mutex<Vec<SharePayload>>,
}

#[async_trait]
impl NativeShare for FakeShare {
    async fn share(&self, payload: &SharePayload) -> Result<(), CapabilityError> {
        self.shared.lock().unwrap().push(payload.clone());
        if self.cancel {
            return Err(CapabilityError::UserCancelled {
                capability: "native share".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeDownloader {
    pub downloads: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl FileDownloader for FakeDownloader {
    async fn download(&self, data_uri: &str, file_name: &str) -> Result<(), CapabilityError> {
        self.downloads
            .lock()
            .unwrap()
            .push((data_uri.to_string(), file_name.to_string()));
        Ok(())
    }
}

pub fn controller(
    gateway: FakeGateway,
    capabilities: Capabilities,
) -> ReadingFlowController<FakeGateway> {
    ReadingFlowController::new(
        Arc::new(gateway),
        capabilities,
        fortune_core::ErrorReporter::new(),
        ReadingConfig::default(),
        ShareConfig::default(),
    )
}

/// A controller that has already reached the results step.
pub async fn at_results(
    gateway: FakeGateway,
    capabilities: Capabilities,
) -> ReadingFlowController<FakeGateway> {
    let mut flow = controller(gateway, capabilities);
    flow.start_reading();
    flow.connect_threads().await;
    flow.reporter().clear();
    flow
}
