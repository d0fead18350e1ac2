/// Mirrors the `readyState` of an XMLHttpRequest, where only `Done` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Unsent,
    Loading,
    Done,
}

impl From<u16> for ReadyState {
    fn from(value: u16) -> Self {
        match value {
            0 => ReadyState::Unsent,
            4 => ReadyState::Done,
            _ => ReadyState::Loading, // OPENED, HEADERS_RECEIVED and LOADING
        }
    }
}

/// One in-flight download of one asset. Exactly one attempt is made, there are no retries.
///
/// When a successful transfer reports [`ReadyState::Done`], the fetched bytes have already been
/// written to the local file. A failed transfer leaves no file behind and explains itself through
/// [`Transfer::status_text`].
pub trait Transfer {
    fn ready_state(&self) -> ReadyState;

    fn status(&self) -> u16;

    fn status_text(&self) -> String;

    /// Non-blocking.
    #[inline]
    fn is_done(&self) -> bool {
        self.ready_state() == ReadyState::Done
    }
}

/// 200, 206 and 304 are success, and so is 0 when there is a body (e.g. `file://` URLs, that
/// don't have a status at all).
pub fn is_success_status(status: u16, has_body: bool) -> bool {
    matches!(status, 200 | 206 | 304) || (status == 0 && has_body)
}
