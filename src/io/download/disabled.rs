use crate::io::download::transfer::{ReadyState, Transfer};

/// What a transfer looks like when the deployment can't download anything: failed right away.
#[derive(Debug, Default)]
pub struct DisabledTransfer;

impl Transfer for DisabledTransfer {
    fn ready_state(&self) -> ReadyState {
        ReadyState::Done
    }

    fn status(&self) -> u16 {
        0
    }

    fn status_text(&self) -> String {
        "downloads are disabled".to_string()
    }
}
