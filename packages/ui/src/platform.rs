//! Browser glue: timers, the persisted login token and file downloads.
//!
//! Outside the browser (unit tests, `dx check`) the storage and download
//! helpers do nothing and the timer falls back to tokio.

use std::time::Duration;

const TOKEN_KEY: &str = "portal.token";

pub async fn sleep_ms(ms: u32) {
    let duration = Duration::from_millis(u64::from(ms));
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(duration).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(duration).await;
}

#[cfg(target_arch = "wasm32")]
fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

pub fn load_token() -> Option<String> {
    #[cfg(target_arch = "wasm32")]
    {
        storage()?
            .get_item(TOKEN_KEY)
            .ok()
            .flatten()
            .filter(|t| !t.is_empty())
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = TOKEN_KEY;
        None
    }
}

pub fn store_token(token: Option<&str>) {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(storage) = storage() else {
            tracing::warn!("localStorage unavailable, login will not survive a reload");
            return;
        };
        let result = match token {
            Some(token) => storage.set_item(TOKEN_KEY, token),
            None => storage.remove_item(TOKEN_KEY),
        };
        if result.is_err() {
            tracing::warn!("failed to update the stored token");
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    let _ = token;
}

/// Object URLs stay alive this long after the click so the browser can
/// start reading the blob.
#[cfg(target_arch = "wasm32")]
const REVOKE_AFTER_MS: u32 = 1_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DownloadError {
    #[error("Downloads are only available in the browser")]
    Unsupported,
    #[error("Could not prepare the download ({0})")]
    Browser(&'static str),
}

/// Offer `contents` to the user as a file download.
pub async fn download_text(filename: &str, mime: &str, contents: &str) -> Result<(), DownloadError> {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::{JsCast, JsValue};

        let window = web_sys::window().ok_or(DownloadError::Browser("no window"))?;
        let document = window
            .document()
            .ok_or(DownloadError::Browser("no document"))?;

        let parts = js_sys::Array::of1(&JsValue::from_str(contents));
        let options = web_sys::BlobPropertyBag::new();
        options.set_type(mime);
        let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &options)
            .map_err(|_| DownloadError::Browser("blob"))?;
        let url = web_sys::Url::create_object_url_with_blob(&blob)
            .map_err(|_| DownloadError::Browser("url"))?;

        let anchor = document
            .create_element("a")
            .map_err(|_| DownloadError::Browser("anchor"))?
            .dyn_into::<web_sys::HtmlAnchorElement>()
            .map_err(|_| DownloadError::Browser("anchor"))?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.click();

        sleep_ms(REVOKE_AFTER_MS).await;
        if web_sys::Url::revoke_object_url(&url).is_err() {
            tracing::debug!("failed to revoke download url");
        }
        Ok(())
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        tracing::warn!(filename, mime, bytes = contents.len(), "downloads need a browser");
        Err(DownloadError::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn downloads_refuse_outside_the_browser() {
        let err = download_text("q.csv", "text/csv", "a,b\r\n").await.unwrap_err();
        assert_eq!(err, DownloadError::Unsupported);
        assert_eq!(err.to_string(), "Downloads are only available in the browser");
    }

    #[test]
    fn no_stored_token_outside_the_browser() {
        store_token(Some("abc"));
        assert_eq!(load_token(), None);
    }
}
