pub mod audio_segment;
pub mod pcm_decoder;
