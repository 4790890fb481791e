use std::sync::Arc;

mod system;

/// Hands external links (video pages) to something outside the webview.
pub trait UiLinkOpener: Send + Sync {
    fn open_url(&self, url: &str);
}

pub type LinkOpenerRef = Arc<dyn UiLinkOpener>;

pub use system::DesktopLinkOpener;
