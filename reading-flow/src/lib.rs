pub mod capabilities;
pub mod controller;
pub mod demo;
pub mod pacing;
pub mod platform;
pub mod share;
pub mod state;
pub mod toast;

pub use capabilities::{
    Capabilities, Clipboard, FileDownloader, NativeShare, Notifier, SharePayload, UrlOpener,
};
pub use controller::ReadingFlowController;
pub use pacing::ReadingPacer;
pub use platform::{
    BrowserOpener, DesktopNotifier, DirectoryDownloader, SystemClipboard, TerminalClipboard,
};
pub use share::{ShareContext, ShareService};
pub use state::FlowState;
pub use toast::{Toast, ToastCenter};
