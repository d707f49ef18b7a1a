#[cfg(any(
    feature = "provider-openai",
    feature = "provider-anthropic",
    feature = "provider-gemini"
))]
pub(crate) mod http;

#[cfg(feature = "provider-openai")]
pub mod openai;

#[cfg(feature = "provider-anthropic")]
pub mod anthropic;

#[cfg(feature = "provider-gemini")]
pub mod gemini;
