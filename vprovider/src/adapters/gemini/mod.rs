mod provider;
mod transport;
mod types;

pub use provider::GeminiProvider;
pub use transport::{GEMINI_DEFAULT_BASE_URL, GeminiHttpTransport, GeminiTransport};
pub use types::{
    GeminiCandidate, GeminiContent, GeminiFunctionCall, GeminiFunctionResponse,
    GeminiGenerationConfig, GeminiPart, GeminiRequest, GeminiResponse, GeminiResponseContent,
    GeminiTool, GeminiUsage,
};
