pub mod result_encoder;
pub mod result_payload;
