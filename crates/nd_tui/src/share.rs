use nd_core::NewsArticle;

use crate::notify::Notifier;

#[derive(Debug, Clone, PartialEq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

#[derive(Debug)]
pub enum ShareError {
    /// The platform has no native share surface.
    Unsupported,
    /// The user backed out of the share; suppressed, never reported.
    Cancelled,
    Failed(String),
}

/// Platform capability for sharing and clipboard access. Injected so
/// the fallback chain can be exercised without a real terminal or
/// window system.
pub trait SharePlatform: Send {
    fn share(&mut self, payload: &SharePayload) -> Result<(), ShareError>;

    fn copy_to_clipboard(&mut self, text: &str) -> Result<(), ShareError>;
}

/// Desktop terminal platform: no share sheet exists, so sharing always
/// lands on the clipboard fallback.
#[derive(Default)]
pub struct OsPlatform;

impl OsPlatform {
    pub fn new() -> Self {
        Self
    }
}

impl SharePlatform for OsPlatform {
    fn share(&mut self, _payload: &SharePayload) -> Result<(), ShareError> {
        Err(ShareError::Unsupported)
    }

    fn copy_to_clipboard(&mut self, text: &str) -> Result<(), ShareError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| ShareError::Failed(e.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| ShareError::Failed(e.to_string()))
    }
}

/// Share an article: native share first, clipboard fallback when the
/// platform has none. Cancellation is swallowed; everything else is
/// reported.
pub fn share_article(
    platform: &mut dyn SharePlatform,
    notifier: &mut Notifier,
    article: &NewsArticle,
) {
    let payload = SharePayload {
        title: article.title.clone(),
        text: article.summary.clone(),
        url: article.url.clone(),
    };

    match platform.share(&payload) {
        Ok(()) => notifier.success("Article shared"),
        Err(ShareError::Unsupported) => match platform.copy_to_clipboard(&article.url) {
            Ok(()) => notifier.success("Link copied to clipboard"),
            Err(_) => notifier.error("Failed to share article"),
        },
        Err(ShareError::Cancelled) => {}
        Err(ShareError::Failed(reason)) => {
            tracing::debug!("share failed: {}", reason);
            notifier.error("Failed to share article");
        }
    }
}

/// Opens the article's source URL with the platform's URL handler.
pub fn open_in_browser(url: &str) -> Result<(), ShareError> {
    #[cfg(target_os = "macos")]
    let opener = "open";
    #[cfg(not(target_os = "macos"))]
    let opener = "xdg-open";

    launch(opener, url)
}

/// Spawns the handler and reaps the child from a background thread so
/// it does not linger as a zombie after exiting.
fn launch(program: &str, url: &str) -> Result<(), ShareError> {
    let mut child = std::process::Command::new(program)
        .arg(url)
        .spawn()
        .map_err(|e| ShareError::Failed(e.to_string()))?;
    std::thread::spawn(move || {
        let _ = child.wait();
    });
    Ok(())
}
