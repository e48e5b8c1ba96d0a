pub mod inference_params;
pub mod language_selection;
pub mod speech_engine;
pub mod thread_resolver;
