use ie_session::InferenceSession;

/// Opaque session handle owned by the C caller.
///
/// Created by `ie_session_create*`, released by `ie_session_destroy`. A
/// handle must not be used from two threads at once.
pub struct IESession {
    pub(crate) inner: InferenceSession,
}

impl IESession {
    pub(crate) fn new(inner: InferenceSession) -> Self {
        Self { inner }
    }
}
