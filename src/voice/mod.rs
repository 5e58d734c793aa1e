//! Voice processing adapters (speech-to-text, text-to-speech)

pub mod stt;
pub mod tts;

pub use stt::SpeechToText;
pub use tts::TextToSpeech;
