#[cfg(target_arch = "wasm32")]
use crate::io::download::browser::BrowserBackend;
use crate::io::download::disabled::DisabledTransfer;
#[cfg(not(target_arch = "wasm32"))]
use crate::io::download::threaded::ThreadedHttpBackend;
use crate::io::download::transfer::Transfer;

/// How missing assets are fetched. Chosen once at startup (see
/// [`crate::settings::CliArgs::transfer_backend`]) and then owned by the download queue.
#[derive(Clone, Debug)]
pub enum TransferBackend {
    #[cfg(target_arch = "wasm32")]
    Browser(BrowserBackend),
    #[cfg(not(target_arch = "wasm32"))]
    ThreadedHttp(ThreadedHttpBackend),
    Disabled,
}

impl TransferBackend {
    /// Starts the transfer immediately. Never blocks and never fails, failures are reported
    /// through the returned transfer's status.
    pub fn start(&self, relative_path: &str) -> Box<dyn Transfer> {
        match self {
            #[cfg(target_arch = "wasm32")]
            TransferBackend::Browser(backend) => Box::new(backend.start(relative_path)),
            #[cfg(not(target_arch = "wasm32"))]
            TransferBackend::ThreadedHttp(backend) => Box::new(backend.start(relative_path)),
            TransferBackend::Disabled => Box::new(DisabledTransfer),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, TransferBackend::Disabled)
    }
}
