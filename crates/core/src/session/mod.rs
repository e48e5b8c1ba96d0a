pub mod inference_session;
pub mod session_logger;
pub mod session_pool;
pub mod session_registry;
