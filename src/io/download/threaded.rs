use crate::io::download::transfer::{ReadyState, Transfer};
use crate::io::fs::{normalize_relative_path, write_complete};
use log::{debug, error, trace};
use reqwest::Url;
use reqwest::blocking::Client;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:8042/game/";

#[derive(Error, Debug)]
enum FetchError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("Error: {0}")]
    Io(#[from] std::io::Error),
}

/// Downloads from a web server into the asset root, one background thread per transfer. This is
/// how a web deployment can be simulated on the desktop: serve the full game directory and start
/// with a stripped down one.
#[derive(Clone, Debug)]
pub struct ThreadedHttpBackend {
    client: Client,
    origin: Url,
    asset_root: PathBuf,
}

impl ThreadedHttpBackend {
    pub fn new(origin: Url, asset_root: impl Into<PathBuf>) -> Result<Self, reqwest::Error> {
        // Transfers are never cancelled and don't time out.
        let client = Client::builder().timeout(None::<Duration>).build()?;
        Ok(Self::with_client(client, origin, asset_root))
    }

    pub fn with_client(client: Client, origin: Url, asset_root: impl Into<PathBuf>) -> Self {
        Self {
            client,
            origin,
            asset_root: asset_root.into(),
        }
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    pub fn start(&self, relative_path: &str) -> ThreadedHttpTransfer {
        let relative_path = normalize_relative_path(relative_path);
        let state = Arc::new(TransferState::default());

        let url = match self.origin.join(&relative_path) {
            Ok(url) => url,
            Err(err) => {
                state.finish(Some(format!("Invalid URL for {}: {}", relative_path, err)));
                return ThreadedHttpTransfer { state };
            }
        };

        let full_path = self.asset_root.join(&relative_path);
        let client = self.client.clone();
        let thread_state = state.clone();
        let spawned = std::thread::Builder::new()
            .name("Download".into())
            .spawn(move || {
                let result = fetch_into(&client, &url, &full_path);
                match &result {
                    Ok(len) => trace!("Downloaded {} > {} ({} bytes)", url, full_path.display(), len),
                    Err(err) => debug!("Download of {} failed: {}", url, err),
                }
                thread_state.finish(result.err().map(|err| err.to_string()));
            });

        if let Err(err) = spawned {
            error!("Failed to spawn the download thread for {}: {}", relative_path, err);
            state.finish(Some(format!("Error: {}", err)));
        }

        ThreadedHttpTransfer { state }
    }
}

fn fetch_into(client: &Client, url: &Url, full_path: &Path) -> Result<usize, FetchError> {
    let response = client.get(url.clone()).send()?.error_for_status()?;
    let bytes = response.bytes()?;
    write_complete(full_path, &bytes)?;
    Ok(bytes.len())
}

/// The only state shared with the download thread: the error is set at most once and strictly
/// before `done` is published.
#[derive(Default)]
struct TransferState {
    done: AtomicBool,
    error: OnceLock<String>,
}

impl TransferState {
    fn finish(&self, error: Option<String>) {
        if let Some(error) = error {
            let _ = self.error.set(error);
        }
        self.done.store(true, Ordering::Release);
    }

    fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    fn error(&self) -> Option<&str> {
        if !self.is_done() {
            return None;
        }
        self.error.get().map(String::as_str)
    }
}

pub struct ThreadedHttpTransfer {
    state: Arc<TransferState>,
}

impl Transfer for ThreadedHttpTransfer {
    fn ready_state(&self) -> ReadyState {
        if self.state.is_done() {
            ReadyState::Done
        } else {
            ReadyState::Unsent
        }
    }

    fn status(&self) -> u16 {
        if self.state.error().is_some() { 0 } else { 200 }
    }

    fn status_text(&self) -> String {
        self.state.error().unwrap_or("OK").to_string()
    }
}

#[cfg(test)]
mod tests {
    use crate::io::download::threaded::ThreadedHttpBackend;
    use crate::io::download::transfer::{ReadyState, Transfer};
    use reqwest::Url;
    use reqwest::blocking::Client;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::time::{Duration, Instant};

    /// Answers a single request with the given status line and body.
    fn serve_once(status_line: &'static str, body: &'static [u8]) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|window| window == b"\r\n\r\n") {
                let read = stream.read(&mut buf).unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..read]);
            }

            write!(
                stream,
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status_line,
                body.len()
            )
            .unwrap();
            stream.write_all(body).unwrap();
        });

        Url::parse(&format!("http://127.0.0.1:{}/game/", port)).unwrap()
    }

    fn backend(origin: Url, root: &std::path::Path) -> ThreadedHttpBackend {
        let client = Client::builder().no_proxy().build().unwrap();
        ThreadedHttpBackend::with_client(client, origin, root)
    }

    fn wait_until_done(transfer: &impl Transfer) {
        let deadline = Instant::now() + Duration::from_secs(30);
        while !transfer.is_done() {
            assert!(Instant::now() < deadline, "Transfer did not complete in time");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    pub fn downloads_into_asset_root() {
        let dir = tempfile::tempdir().unwrap();
        let origin = serve_once("200 OK", b"not really a png");

        let transfer = backend(origin, dir.path()).start("images/bg.png");
        wait_until_done(&transfer);

        assert_eq!(transfer.ready_state(), ReadyState::Done);
        assert_eq!(transfer.status(), 200);
        assert_eq!(transfer.status_text(), "OK");
        assert_eq!(
            std::fs::read(dir.path().join("images/bg.png")).unwrap(),
            b"not really a png"
        );
    }

    #[test]
    pub fn http_errors_leave_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let origin = serve_once("404 Not Found", b"");

        let transfer = backend(origin, dir.path()).start("images/bg.png");
        wait_until_done(&transfer);

        assert_eq!(transfer.status(), 0);
        assert!(transfer.status_text().contains("404"));
        assert!(!dir.path().join("images/bg.png").exists());
    }

    #[test]
    pub fn unreachable_origin_fails() {
        let dir = tempfile::tempdir().unwrap();
        // Bind and immediately drop, so the port is most likely closed.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let origin = Url::parse(&format!("http://127.0.0.1:{}/game/", port)).unwrap();

        let transfer = backend(origin, dir.path()).start("images/bg.png");
        wait_until_done(&transfer);

        assert_eq!(transfer.status(), 0);
        assert_ne!(transfer.status_text(), "OK");
    }

    #[test]
    pub fn failed_writes_leave_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let origin = serve_once("200 OK", b"not really a png");
        // Occupied by a directory, so the download can't be stored.
        std::fs::create_dir_all(dir.path().join("images/bg.png")).unwrap();

        let transfer = backend(origin, dir.path()).start("images/bg.png");
        wait_until_done(&transfer);

        assert_eq!(transfer.status(), 0);
        assert!(transfer.status_text().starts_with("Error: "));
        assert!(!dir.path().join("images/bg.png").is_file());
        assert!(!dir.path().join("images/bg.png.part").exists());
    }
}
