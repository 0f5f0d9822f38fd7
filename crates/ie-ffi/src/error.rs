use std::cell::RefCell;
use std::ffi::CString;

use ie_session::SessionError;

use crate::types::IEStatus;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Store an error message for later retrieval via `ie_last_error`.
pub fn set_last_error(msg: String) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Take the last error message, leaving `None` in its place.
pub fn take_last_error() -> Option<CString> {
    LAST_ERROR.with(|e| e.borrow_mut().take())
}

pub fn status_of(err: &SessionError) -> IEStatus {
    match err {
        SessionError::ModelLoad(_) => IEStatus::ErrorModelLoad,
        SessionError::Shape { .. } => IEStatus::ErrorShape,
        SessionError::SizeMismatch { .. } => IEStatus::ErrorSizeMismatch,
        SessionError::Backend(_) => IEStatus::ErrorBackend,
    }
}

/// Record `err` as the last error and return its status code.
pub fn fail(err: SessionError) -> IEStatus {
    let status = status_of(&err);
    set_last_error(err.to_string());
    status
}
