pub mod model;
pub mod whisper;

pub use model::{default_model_path, ensure_model, SUPPORTED_MODELS};
pub use whisper::transcribe;
