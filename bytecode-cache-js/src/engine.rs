//! The interface this crate consumes from the embedded script engine.
//!
//! Parsing, compiling, executing and serializing are the engine's business. The cache layer
//! only decides when to ask for them, under which lock, and where the artifact goes.

use crate::result::HeapSnapshot;
use std::fmt;
use std::fmt::Display;
use std::fs::File;
use std::sync::Arc;

/// Classification of a compilation unit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnitKind {
  /// Classic script; top-level `import`/`export` is a syntax error.
  Script,
  /// ES module; parsed with `import`/`export` support.
  Module,
}

impl UnitKind {
  /// Origin label used when the caller supplies none.
  pub fn default_origin(self) -> &'static str {
    match self {
      UnitKind::Script => "script.js",
      UnitKind::Module => "module.js",
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      UnitKind::Script => "script",
      UnitKind::Module => "module",
    }
  }
}

/// Engine-ready source for one compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCode {
  pub text: Arc<str>,
  /// Diagnostic origin, used verbatim.
  pub origin: Arc<str>,
  pub kind: UnitKind,
}

/// Opaque serialized artifact. Only its byte size is observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachedBytecode {
  size: usize,
}

impl CachedBytecode {
  pub fn new(size: usize) -> Self {
    Self { size }
  }

  pub fn size(&self) -> usize {
    self.size
  }
}

/// Structured compile/serialize error reported by the engine. The engine may leave the
/// message out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BytecodeCacheError {
  pub message: Option<String>,
}

impl BytecodeCacheError {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: Some(message.into()),
    }
  }

  pub fn without_message() -> Self {
    Self { message: None }
  }
}

/// An uncaught exception escaping evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exception {
  /// Constructor name of the thrown value, e.g. `SyntaxError`.
  pub name: Option<String>,
  pub message: String,
}

impl Exception {
  pub fn new(name: Option<String>, message: impl Into<String>) -> Self {
    Self {
      name,
      message: message.into(),
    }
  }
}

impl Display for Exception {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match (&self.name, self.message.is_empty()) {
      (Some(name), false) => write!(f, "{name}: {message}", message = self.message),
      (Some(name), true) => f.write_str(name),
      (None, false) => f.write_str(&self.message),
      (None, true) => f.write_str("uncaught exception"),
    }
  }
}

/// One script-engine instance: its global environment and virtual machine.
///
/// Implementations are driven only while the owning context's execution lock is held.
pub trait ScriptEngine: Send + 'static {
  /// Whether the global execution environment is still alive.
  fn has_global(&self) -> bool;

  /// Compile and run `source`.
  fn evaluate(&mut self, source: &SourceCode) -> Result<(), Exception>;

  /// Current heap counters, in bytes.
  fn heap_counters(&self) -> HeapSnapshot;
}

/// An engine build that exposes bytecode generation and serialization.
pub trait BytecodeEngine: ScriptEngine {
  /// Compile `source` and stream the serialized artifact into `sink`.
  ///
  /// `Ok(None)` means the engine produced no artifact without describing why.
  fn generate_bytecode(
    &mut self,
    source: &SourceCode,
    sink: &mut File,
  ) -> Result<Option<CachedBytecode>, BytecodeCacheError>;
}
