mod common;

use common::{at_results, FakeClipboard, FakeDownloader, FakeGateway, FakeOpener, FakeShare};
use fortune_core::{Outcome, Severity, ShareUrls};
use reading_flow::demo::default_share_text;
use reading_flow::share::{NATIVE_SHARE_FALLBACK_TEXT, NATIVE_SHARE_TITLE};
use reading_flow::Capabilities;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_sharing_outside_results_is_skipped() {
    let clipboard = Arc::new(FakeClipboard::default());
    let mut flow = common::controller(
        FakeGateway::healthy(),
        Capabilities::none().with_clipboard(clipboard.clone()),
    );

    assert_eq!(flow.copy_text().await, Outcome::Skipped);
    assert_eq!(flow.share_to_threads().await, Outcome::Skipped);
    assert_eq!(flow.download_image().await, Outcome::Skipped);

    assert!(clipboard.copied.lock().unwrap().is_empty());
    let diagnostics = flow.reporter().diagnostics_for("copy_text");
    assert_eq!(diagnostics[0].code, "INVALID_TRANSITION");
}

#[tokio::test(start_paused = true)]
async fn test_share_to_threads_opens_url() {
    let opener = Arc::new(FakeOpener::default());
    let mut flow = at_results(
        FakeGateway::healthy(),
        Capabilities::none().with_url_opener(opener.clone()),
    )
    .await;

    assert_eq!(flow.share_to_threads().await, Outcome::Completed);
    assert_eq!(
        *opener.opened.lock().unwrap(),
        vec!["https://threads.net/intent/post?text=generated"]
    );
    assert_eq!(flow.toasts().active()[0].message, "🔮 Opening Threads...");
}

#[tokio::test(start_paused = true)]
async fn test_failing_opener_falls_back_to_copy() {
    let opener = Arc::new(FakeOpener {
        fail: true,
        ..FakeOpener::default()
    });
    let clipboard = Arc::new(FakeClipboard::default());
    let mut flow = at_results(
        FakeGateway::healthy(),
        Capabilities::none()
            .with_url_opener(opener)
            .with_clipboard(clipboard.clone()),
    )
    .await;

    assert_eq!(flow.share_to_twitter().await, Outcome::Degraded);
    assert_eq!(*clipboard.copied.lock().unwrap(), vec!["generated copy text"]);

    let diagnostics = flow.reporter().diagnostics_for("share_to_twitter");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
}

#[tokio::test(start_paused = true)]
async fn test_missing_share_url_copies_default_text() {
    let mut gateway = FakeGateway::healthy();
    gateway.generated.shareable_content.share_urls = ShareUrls::default();
    let expected = default_share_text(&gateway.generated.portrait, "threadsfortune.app");

    let opener = Arc::new(FakeOpener::default());
    let clipboard = Arc::new(FakeClipboard::default());
    let mut flow = at_results(
        gateway,
        Capabilities::none()
            .with_url_opener(opener.clone())
            .with_clipboard(clipboard.clone()),
    )
    .await;

    assert_eq!(flow.share_to_threads().await, Outcome::Degraded);
    assert!(opener.opened.lock().unwrap().is_empty());
    assert_eq!(*clipboard.copied.lock().unwrap(), vec![expected.clone()]);
    assert_eq!(flow.share_text(), Some(expected));
}

#[tokio::test(start_paused = true)]
async fn test_instagram_share_uses_native_sheet() {
    let share = Arc::new(FakeShare::default());
    let mut flow = at_results(
        FakeGateway::healthy(),
        Capabilities::none().with_native_share(share.clone()),
    )
    .await;

    assert_eq!(flow.share_to_instagram().await, Outcome::Completed);
    let shared = share.shared.lock().unwrap();
    assert_eq!(shared.len(), 1);
    assert_eq!(shared[0].title, NATIVE_SHARE_TITLE);
    assert_eq!(shared[0].text, "generated copy text");
    assert_eq!(shared[0].url, "https://threadsfortune.app");
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_instagram_share_downloads_image() {
    let share = Arc::new(FakeShare {
        cancel: true,
        ..FakeShare::default()
    });
    let downloader = Arc::new(FakeDownloader::default());
    let mut flow = at_results(
        FakeGateway::healthy(),
        Capabilities::none()
            .with_native_share(share)
            .with_downloader(downloader.clone()),
    )
    .await;

    assert_eq!(flow.share_to_instagram().await, Outcome::Degraded);
    assert_eq!(
        *downloader.downloads.lock().unwrap(),
        vec![(
            "data:image/png;base64,AAAA".to_string(),
            "my-creator-dna.png".to_string()
        )]
    );
    assert_eq!(flow.toasts().active()[0].message, "📸 Image downloaded!");
}

#[tokio::test(start_paused = true)]
async fn test_instagram_fallback_text_without_copy_text() {
    let mut gateway = FakeGateway::healthy();
    gateway.generated.shareable_content.share_urls.copy_text = None;
    let share = Arc::new(FakeShare::default());
    let mut flow = at_results(gateway, Capabilities::none().with_native_share(share.clone())).await;

    flow.share_to_instagram().await;
    assert_eq!(share.shared.lock().unwrap()[0].text, NATIVE_SHARE_FALLBACK_TEXT);
}

#[tokio::test(start_paused = true)]
async fn test_copy_text_prefers_primary_clipboard() {
    let clipboard = Arc::new(FakeClipboard::default());
    let legacy = Arc::new(FakeClipboard::default());
    let mut flow = at_results(
        FakeGateway::healthy(),
        Capabilities::none()
            .with_clipboard(clipboard.clone())
            .with_legacy_clipboard(legacy.clone()),
    )
    .await;

    assert_eq!(flow.copy_text().await, Outcome::Completed);
    assert_eq!(clipboard.copied.lock().unwrap().len(), 1);
    assert!(legacy.copied.lock().unwrap().is_empty());
    assert_eq!(flow.toasts().active()[0].message, "✨ Copied to clipboard!");
}

#[tokio::test(start_paused = true)]
async fn test_copy_text_falls_back_to_legacy_clipboard() {
    let legacy = Arc::new(FakeClipboard::default());
    let mut flow = at_results(
        FakeGateway::healthy(),
        Capabilities::none()
            .with_clipboard(Arc::new(FakeClipboard::broken()))
            .with_legacy_clipboard(legacy.clone()),
    )
    .await;

    assert_eq!(flow.copy_text().await, Outcome::Degraded);
    assert_eq!(*legacy.copied.lock().unwrap(), vec!["generated copy text"]);
    assert_eq!(flow.toasts().active().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_copy_text_fails_without_any_clipboard() {
    let mut flow = at_results(FakeGateway::healthy(), Capabilities::none()).await;

    assert_eq!(flow.copy_text().await, Outcome::Failed);
    assert!(flow.toasts().active().is_empty());

    let diagnostics = flow.reporter().diagnostics_for("copy_text");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Error);
}

#[tokio::test(start_paused = true)]
async fn test_download_without_image_is_skipped() {
    let mut gateway = FakeGateway::healthy();
    gateway.generated.shareable_content.ig_story_image = None;
    let downloader = Arc::new(FakeDownloader::default());
    let mut flow = at_results(gateway, Capabilities::none().with_downloader(downloader.clone())).await;

    assert_eq!(flow.download_image().await, Outcome::Skipped);
    assert!(downloader.downloads.lock().unwrap().is_empty());
    assert!(flow.reporter().diagnostics().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_download_without_downloader_fails() {
    let mut flow = at_results(FakeGateway::healthy(), Capabilities::none()).await;

    assert_eq!(flow.download_image().await, Outcome::Failed);
    assert_eq!(flow.reporter().diagnostics_for("download_image").len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_toast_dismissed_after_three_seconds() {
    let clipboard = Arc::new(FakeClipboard::default());
    let mut flow = at_results(
        FakeGateway::healthy(),
        Capabilities::none().with_clipboard(clipboard),
    )
    .await;

    flow.copy_text().await;
    assert_eq!(flow.toasts().active().len(), 1);

    tokio::time::sleep(Duration::from_millis(2900)).await;
    assert_eq!(flow.toasts().active().len(), 1);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(flow.toasts().active().is_empty());
}
