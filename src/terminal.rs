use crate::service::{Launcher, Navigator, LOGIN_PATH};

/// Routes become hints on stderr; there are no pages to switch to.
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn redirect(&self, path: &str) {
        if path == LOGIN_PATH {
            eprintln!("Not signed in. Run `creator-desk login <email>` first.");
        } else {
            eprintln!("Continue at {}", path);
        }
    }
}

/// Opens links in the system browser.
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn open_external(&self, url: &str) -> std::io::Result<()> {
        debug!("Opening {}", url);
        open::that(url)
    }
}
