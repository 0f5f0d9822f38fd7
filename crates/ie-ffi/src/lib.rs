mod error;
mod session;
mod types;

pub use error::*;
pub use session::*;
pub use types::*;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::AssertUnwindSafe;
use std::path::Path;

use ie_session::{InferenceSession, ModelSource, SessionConfig};

/// Execute a closure that returns an `IEStatus`, catching any panics
/// and converting them into `IEStatus::ErrorInternal`.
///
/// A session that panicked mid-invoke is left in whatever state the backend
/// reached.
fn catch_panic<F: FnOnce() -> IEStatus>(f: F) -> IEStatus {
    match std::panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(status) => status,
        Err(_) => {
            set_last_error("internal panic".to_string());
            IEStatus::ErrorInternal
        }
    }
}

fn invalid(msg: &str) -> IEStatus {
    set_last_error(msg.to_string());
    IEStatus::ErrorInvalidArgument
}

/// Store `class` in `*class_out` when it fits a C `int`.
unsafe fn store_class(class: usize, class_out: *mut i32) -> IEStatus {
    let Ok(class) = i32::try_from(class) else {
        set_last_error(format!("class index {} does not fit in an i32", class));
        return IEStatus::ErrorInternal;
    };
    if !class_out.is_null() {
        *class_out = class;
    }
    IEStatus::Ok
}

/// Resolve nullable params to a config, defaulting when null.
unsafe fn config_from(params: *const IESessionParams) -> SessionConfig {
    match params.as_ref() {
        Some(p) => SessionConfig::from(p),
        None => SessionConfig::from(&IESessionParams::default()),
    }
}

unsafe fn finish_create(
    result: ie_session::Result<InferenceSession>,
    session_out: *mut *mut IESession,
) -> IEStatus {
    match result {
        Ok(session) => {
            *session_out = Box::into_raw(Box::new(IESession::new(session)));
            IEStatus::Ok
        }
        Err(e) => fail(e),
    }
}

/// Default construction parameters: softmax post-processing, one priming
/// run, format detected from the source.
#[no_mangle]
pub extern "C" fn ie_default_params() -> IESessionParams {
    IESessionParams::default()
}

/// Load a model from `path` and build a primed session.
///
/// `params` may be null for defaults. On success, writes a heap-allocated
/// `IESession` pointer into `*session_out`; free it with
/// `ie_session_destroy`.
#[no_mangle]
pub unsafe extern "C" fn ie_session_create(
    path: *const c_char,
    params: *const IESessionParams,
    session_out: *mut *mut IESession,
) -> IEStatus {
    catch_panic(|| {
        if path.is_null() || session_out.is_null() {
            return invalid("null argument");
        }
        let path_str = match unsafe { CStr::from_ptr(path) }.to_str() {
            Ok(s) => s,
            Err(e) => {
                set_last_error(format!("invalid path: {}", e));
                return IEStatus::ErrorInvalidArgument;
            }
        };
        let config = unsafe { config_from(params) };
        let result = InferenceSession::create(ModelSource::Path(Path::new(path_str)), config);
        unsafe { finish_create(result, session_out) }
    })
}

/// Build a primed session from an in-memory model of `len` bytes.
///
/// The buffer is only read during this call and may be freed afterwards.
#[no_mangle]
pub unsafe extern "C" fn ie_session_create_from_buffer(
    data: *const u8,
    len: usize,
    params: *const IESessionParams,
    session_out: *mut *mut IESession,
) -> IEStatus {
    catch_panic(|| {
        if data.is_null() || session_out.is_null() {
            return invalid("null argument");
        }
        let bytes = unsafe { std::slice::from_raw_parts(data, len) };
        let config = unsafe { config_from(params) };
        let result = InferenceSession::create(ModelSource::Bytes(bytes), config);
        unsafe { finish_create(result, session_out) }
    })
}

/// Destroy a session previously created by `ie_session_create*`.
///
/// Passing a null pointer is a no-op and returns `IEStatus::Ok`.
#[no_mangle]
pub unsafe extern "C" fn ie_session_destroy(session: *mut IESession) -> IEStatus {
    if session.is_null() {
        return IEStatus::Ok;
    }
    drop(Box::from_raw(session));
    IEStatus::Ok
}

/// Run one inference.
///
/// Reads `input_len` floats from `input`, writes `output_len` post-processed
/// floats to `output`, and stores the selected class in `*class_out` (or -1
/// on failure). `class_out` may be null. Does not allocate on success.
#[no_mangle]
pub unsafe extern "C" fn ie_invoke(
    session: *mut IESession,
    input: *const f32,
    input_len: usize,
    output: *mut f32,
    output_len: usize,
    class_out: *mut i32,
) -> IEStatus {
    if !class_out.is_null() {
        *class_out = -1;
    }
    catch_panic(|| {
        if session.is_null() || input.is_null() || output.is_null() {
            return invalid("null argument");
        }
        let session = unsafe { &mut *session };
        let input = unsafe { std::slice::from_raw_parts(input, input_len) };
        let output = unsafe { std::slice::from_raw_parts_mut(output, output_len) };
        match session.inner.invoke(input, output) {
            Ok(class) => unsafe { store_class(class, class_out) },
            Err(e) => fail(e),
        }
    })
}

/// Number of input elements the session expects, or 0 for a null session.
#[no_mangle]
pub unsafe extern "C" fn ie_input_size(session: *const IESession) -> usize {
    session.as_ref().map_or(0, |s| s.inner.input_size())
}

/// Number of output elements the session produces, or 0 for a null session.
#[no_mangle]
pub unsafe extern "C" fn ie_output_size(session: *const IESession) -> usize {
    session.as_ref().map_or(0, |s| s.inner.output_size())
}

/// Rows and columns of a 2-D model input.
///
/// Returns `IEStatus::ErrorShape` when the input is not 2-D.
#[no_mangle]
pub unsafe extern "C" fn ie_input_size_2d(
    session: *const IESession,
    rows_out: *mut usize,
    cols_out: *mut usize,
) -> IEStatus {
    let Some(session) = session.as_ref() else {
        return invalid("null session");
    };
    if rows_out.is_null() || cols_out.is_null() {
        return invalid("null argument");
    }
    match session.inner.input_size_2d() {
        Some((rows, cols)) => {
            *rows_out = rows;
            *cols_out = cols;
            IEStatus::Ok
        }
        None => {
            set_last_error(format!(
                "model input {} is not 2-D",
                session.inner.descriptor().input_shape
            ));
            IEStatus::ErrorShape
        }
    }
}

/// Retrieve the last error message.
///
/// Returns a pointer to a C string describing the most recent error on this
/// thread, or null if there is none. The caller must free the returned
/// string with `ie_free_string`.
#[no_mangle]
pub extern "C" fn ie_last_error() -> *const c_char {
    match error::take_last_error() {
        Some(e) => e.into_raw(),
        None => std::ptr::null(),
    }
}

/// Free a string previously returned by `ie_last_error`.
#[no_mangle]
pub unsafe extern "C" fn ie_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}
