use std::process::Command;

use tracing::{debug, warn};

use super::UiLinkOpener;

/// Opens links in the system browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopLinkOpener;

impl DesktopLinkOpener {
    fn command(url: &str) -> Command {
        #[cfg(target_os = "macos")]
        {
            let mut cmd = Command::new("open");
            cmd.arg(url);
            cmd
        }
        #[cfg(target_os = "windows")]
        {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", "", url]);
            cmd
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(url);
            cmd
        }
    }
}

impl UiLinkOpener for DesktopLinkOpener {
    fn open_url(&self, url: &str) {
        let url = url.trim();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            warn!(url, "refusing to open non-http link");
            return;
        }
        match Self::command(url).spawn() {
            Ok(_) => debug!(url, "opened external link"),
            Err(err) => warn!(url, error = %err, "failed to open external link"),
        }
    }
}
