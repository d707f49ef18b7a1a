//! The contract every model-callable tool implements.
//!
//! ```rust
//! use serde_json::json;
//! use vcommon::BoxFuture;
//! use vprovider::ToolSpec;
//! use vtooling::{Tool, ToolError, ToolExecutionContext};
//!
//! struct SpokenLanguage;
//!
//! impl Tool for SpokenLanguage {
//!     fn spec(&self) -> ToolSpec {
//!         ToolSpec::new("spoken_language", "Language the driver is using", json!({"type": "object"}))
//!     }
//!
//!     fn invoke<'a>(
//!         &'a self,
//!         _args_json: &'a str,
//!         context: &'a ToolExecutionContext,
//!     ) -> BoxFuture<'a, Result<String, ToolError>> {
//!         Box::pin(async move { Ok(context.language.clone()) })
//!     }
//! }
//!
//! assert_eq!(SpokenLanguage.spec().name, "spoken_language");
//! ```

use vcommon::BoxFuture;
use vprovider::ToolSpec;

use crate::{ToolError, ToolExecutionContext};

pub trait Tool: Send + Sync {
    /// Name, description and JSON schema advertised to the model.
    fn spec(&self) -> ToolSpec;

    /// Runs one call. `args_json` is the raw argument string the model produced.
    fn invoke<'a>(
        &'a self,
        args_json: &'a str,
        context: &'a ToolExecutionContext,
    ) -> BoxFuture<'a, Result<String, ToolError>>;
}
