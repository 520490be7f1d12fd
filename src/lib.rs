//! Default-behavior core of a JavaScript engine: completion records, the
//! `Object.prototype` methods, the sync and async iterator protocols and the
//! IsDestructuring static semantics.

pub mod ast;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod static_semantics;
pub mod types;

pub use config::Config;
pub use error::EngineError;
pub use interpreter::{Completion, Interpreter, JsResult};
pub use types::{JsObject, JsString, JsValue, PropertyKey};
