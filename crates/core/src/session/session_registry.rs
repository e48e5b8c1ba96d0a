use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::encoding::result_encoder;
use crate::inference::domain::speech_engine::SpeechEngine;
use crate::shared::errors::BridgeError;

use super::inference_session::{InferenceRequest, InferenceResult, Session};
use super::session_logger::SessionLogger;

/// Opaque token naming a live session. Zero is the null handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionHandle(u64);

impl SessionHandle {
    pub const NULL: SessionHandle = SessionHandle(0);

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_raw(&self) -> u64 {
        self.0
    }

    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

type SharedSession = Arc<Mutex<Session>>;

/// Handle table owning every live session.
///
/// Tokens are never reused, so a released handle can not alias a newer
/// session. Each session sits behind its own mutex: calls on one handle run one
/// at a time while distinct handles proceed in parallel.
pub struct SessionRegistry {
    engine: Arc<dyn SpeechEngine>,
    logger: Arc<dyn SessionLogger>,
    sessions: Mutex<HashMap<SessionHandle, SharedSession>>,
    next_handle: AtomicU64,
}

impl SessionRegistry {
    pub fn new(engine: Arc<dyn SpeechEngine>, logger: Arc<dyn SessionLogger>) -> Self {
        Self {
            engine,
            logger,
            sessions: Mutex::new(HashMap::new()),
            next_handle: AtomicU64::new(1),
        }
    }

    /// Loads a model into a new session. Returns [`SessionHandle::NULL`] and
    /// logs the cause when loading fails.
    pub fn init(&self, model_path: &str, preferred_threads: i32) -> SessionHandle {
        let session = match Session::create(
            self.engine.as_ref(),
            Path::new(model_path),
            preferred_threads,
            self.logger.clone(),
        ) {
            Ok(session) => session,
            Err(e) => {
                self.logger
                    .error(&format!("Failed to initialize speech context for '{model_path}': {e}"));
                return SessionHandle::NULL;
            }
        };

        let handle = SessionHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        self.logger.info(&format!(
            "Loaded {model_path} as session {} ({} of {} threads)",
            handle.as_raw(),
            session.default_threads(),
            session.max_threads()
        ));
        self.table().insert(handle, Arc::new(Mutex::new(session)));
        handle
    }

    /// Runs one request and always returns a well-formed payload.
    pub fn process(&self, handle: SessionHandle, request: &InferenceRequest) -> String {
        result_encoder::encode(self.try_process(handle, request))
    }

    /// Same as [`process`](Self::process) but leaves the outcome typed.
    pub fn try_process(
        &self,
        handle: SessionHandle,
        request: &InferenceRequest,
    ) -> Result<InferenceResult, BridgeError> {
        let session = self.lookup(handle).ok_or(BridgeError::ContextNotInitialized)?;
        let mut session = session.lock().unwrap_or_else(PoisonError::into_inner);
        session.process(request)
    }

    /// Drops the session behind `handle`. Unknown and null handles are ignored.
    ///
    /// The engine context is freed once any in-flight request on it finishes.
    pub fn release(&self, handle: SessionHandle) {
        if handle.is_null() {
            return;
        }
        self.table().remove(&handle);
    }

    pub fn is_live(&self, handle: SessionHandle) -> bool {
        self.lookup(handle).is_some()
    }

    pub fn live_count(&self) -> usize {
        self.table().len()
    }

    fn lookup(&self, handle: SessionHandle) -> Option<SharedSession> {
        if handle.is_null() {
            return None;
        }
        self.table().get(&handle).cloned()
    }

    fn table(&self) -> MutexGuard<'_, HashMap<SessionHandle, SharedSession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
