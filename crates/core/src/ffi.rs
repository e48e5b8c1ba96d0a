//! C ABI for hosting runtimes.
//!
//! Handles are plain `u64` tokens from a process-wide [`SessionRegistry`]; zero
//! means "no session". Strings returned by [`speech_bridge_process`] are owned
//! by the caller and must go back through [`speech_bridge_string_free`].

use std::ffi::{c_char, CStr, CString};
use std::ptr;
use std::sync::{Arc, OnceLock};

use crate::inference::infrastructure::whisper_engine::WhisperEngine;
use crate::session::inference_session::InferenceRequest;
use crate::session::session_logger::LogSessionLogger;
use crate::session::session_registry::{SessionHandle, SessionRegistry};

fn registry() -> &'static SessionRegistry {
    static REGISTRY: OnceLock<SessionRegistry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        SessionRegistry::new(
            Arc::new(WhisperEngine::default()),
            Arc::new(LogSessionLogger::new()),
        )
    })
}

/// Copies a nullable C string into an owned value.
///
/// # Safety
/// `value` must be null or point to a NUL-terminated string.
unsafe fn owned_string(value: *const c_char) -> Option<String> {
    if value.is_null() {
        return None;
    }
    Some(CStr::from_ptr(value).to_string_lossy().into_owned())
}

/// Loads a model and returns its session handle, or 0 on failure.
///
/// # Safety
/// `model_path` must be null or point to a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn speech_bridge_init(model_path: *const c_char, preferred_threads: i32) -> u64 {
    match owned_string(model_path) {
        Some(path) => registry().init(&path, preferred_threads).as_raw(),
        None => SessionHandle::NULL.as_raw(),
    }
}

/// Transcribes `audio_len` bytes of s16le PCM and returns a JSON payload.
///
/// # Safety
/// `audio` must be null or valid for `audio_len` bytes; the language pointers
/// must be null or NUL-terminated strings.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn speech_bridge_process(
    handle: u64,
    audio: *const u8,
    audio_len: usize,
    sample_rate: i32,
    source_language: *const c_char,
    target_language: *const c_char,
    translate: bool,
    thread_override: i32,
) -> *mut c_char {
    let audio = if audio.is_null() || audio_len == 0 {
        Vec::new()
    } else {
        std::slice::from_raw_parts(audio, audio_len).to_vec()
    };
    let request = InferenceRequest {
        audio,
        sample_rate: u32::try_from(sample_rate).unwrap_or(0),
        source_language: owned_string(source_language),
        target_language: owned_string(target_language),
        translate,
        thread_override,
    };
    let payload = registry().process(SessionHandle::from_raw(handle), &request);
    CString::new(payload)
        .map(CString::into_raw)
        .unwrap_or(ptr::null_mut())
}

/// Frees a payload returned by [`speech_bridge_process`].
///
/// # Safety
/// `payload` must be null or a pointer obtained from `speech_bridge_process`
/// that has not been freed yet.
#[no_mangle]
pub unsafe extern "C" fn speech_bridge_string_free(payload: *mut c_char) {
    if !payload.is_null() {
        drop(CString::from_raw(payload));
    }
}

/// Releases a session. Zero and already released handles are ignored.
#[no_mangle]
pub extern "C" fn speech_bridge_release(handle: u64) {
    registry().release(SessionHandle::from_raw(handle));
}
