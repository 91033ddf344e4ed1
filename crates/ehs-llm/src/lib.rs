pub mod media;
pub mod protocol;
pub mod provider;
pub mod providers;

pub use media::{DataUri, MediaPart};
pub use protocol::{ProtocolError, ProtocolResult};
pub use provider::{
    GenerationProvider, GenerationRequest, GenerationResponse, ModelInvocationError, Result,
};
pub use providers::GeminiProvider;
