use crate::io::download::transfer::{ReadyState, Transfer, is_success_status};
use crate::io::fs::{normalize_relative_path, write_complete};
use js_sys::{ArrayBuffer, Uint8Array};
use log::{error, trace, warn};
use std::path::{Path, PathBuf};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;
use web_sys::{XmlHttpRequest, XmlHttpRequestResponseType};

/// Fetches relative to the page through XMLHttpRequest. The browser drives the request, we only
/// ever poll its state. On success, the response is written to the (virtual) filesystem before the
/// request reports done, so the usual loaders find it.
#[derive(Clone, Debug)]
pub struct BrowserBackend {
    url_prefix: String,
    asset_root: PathBuf,
}

impl BrowserBackend {
    pub fn new(url_prefix: impl Into<String>, asset_root: impl Into<PathBuf>) -> Self {
        Self {
            url_prefix: url_prefix.into(),
            asset_root: asset_root.into(),
        }
    }

    pub fn start(&self, relative_path: &str) -> BrowserTransfer {
        let relative_path = normalize_relative_path(relative_path);
        let url = format!("{}{}", self.url_prefix, relative_path);
        let full_path = self.asset_root.join(&relative_path);

        match PendingRequest::send(&url, full_path) {
            Ok(pending) => BrowserTransfer {
                inner: Ok(pending),
            },
            Err(err) => {
                error!("Could not start the download of {}: {:?}", url, err);
                BrowserTransfer {
                    inner: Err(format!("{:?}", err)),
                }
            }
        }
    }
}

struct PendingRequest {
    xhr: XmlHttpRequest,
    // Kept alive for as long as the request can still call them.
    _onload: Closure<dyn FnMut()>,
    _onerror: Closure<dyn FnMut()>,
}

impl PendingRequest {
    fn send(url: &str, full_path: PathBuf) -> Result<Self, wasm_bindgen::JsValue> {
        let xhr = XmlHttpRequest::new()?;
        xhr.set_response_type(XmlHttpRequestResponseType::Arraybuffer);

        let onload_xhr = xhr.clone();
        let onload = Closure::wrap(Box::new(move || store_response(&onload_xhr, &full_path)) as Box<dyn FnMut()>);

        let onerror_url = url.to_string();
        let onerror = Closure::wrap(Box::new(move || warn!("Network error on {}", onerror_url)) as Box<dyn FnMut()>);

        xhr.set_onload(Some(onload.as_ref().unchecked_ref()));
        xhr.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        xhr.open("GET", url)?;
        xhr.send()?;

        Ok(Self {
            xhr,
            _onload: onload,
            _onerror: onerror,
        })
    }
}

fn store_response(xhr: &XmlHttpRequest, full_path: &Path) {
    let status = xhr.status().unwrap_or(0);
    let bytes = xhr
        .response()
        .ok()
        .and_then(|response| response.dyn_into::<ArrayBuffer>().ok())
        .map(|buffer| Uint8Array::new(&buffer).to_vec())
        .unwrap_or_default();

    if !is_success_status(status, !bytes.is_empty()) {
        warn!(
            "Download error on {}: {} {}",
            full_path.display(),
            status,
            xhr.status_text().unwrap_or_default()
        );
        return;
    }

    match write_complete(full_path, &bytes) {
        Ok(()) => trace!("Downloaded {} ({} bytes)", full_path.display(), bytes.len()),
        Err(err) => error!("Failed to store {}: {}", full_path.display(), err),
    }
}

pub struct BrowserTransfer {
    inner: Result<PendingRequest, String>,
}

impl Transfer for BrowserTransfer {
    fn ready_state(&self) -> ReadyState {
        match &self.inner {
            Ok(pending) => ReadyState::from(pending.xhr.ready_state()),
            Err(_) => ReadyState::Done,
        }
    }

    fn status(&self) -> u16 {
        match &self.inner {
            Ok(pending) => pending.xhr.status().unwrap_or(0),
            Err(_) => 0,
        }
    }

    fn status_text(&self) -> String {
        match &self.inner {
            Ok(pending) => pending.xhr.status_text().unwrap_or_default(),
            Err(err) => err.clone(),
        }
    }
}
