use crate::context::EngineContext;
use crate::engine::BytecodeEngine;
use crate::engine::ScriptEngine;
use crate::error::CacheError;
use crate::options::BackendPreference;
use crate::options::CacheOptions;
use crate::result::HeapSnapshot;
use crate::source::CompilationIdentity;
use std::path::Path;

mod full;
mod stub;

pub use full::FullBackend;
pub use stub::StubBackend;

/// Whether this build was compiled with bytecode support.
pub const BUILD_SUPPORTS_BYTECODE: bool = cfg!(feature = "bytecode");

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BackendKind {
  Full,
  Stub,
}

/// The uniform call surface shared by every backend.
///
/// Callers never branch on which backend they hold; they only handle failures.
pub trait BytecodeBackend<E: ScriptEngine>: Send + Sync {
  fn kind(&self) -> BackendKind;

  /// In-memory generation. The serializer needs a streaming file sink, so this never
  /// succeeds.
  fn generate_program_bytecode(
    &self,
    ctx: &EngineContext<E>,
    identity: &CompilationIdentity<'_>,
  ) -> Result<usize, CacheError>;

  /// Generate bytecode for `identity` (script or module, per its kind) into `output_path`,
  /// returning the artifact size.
  fn generate_bytecode_to_file(
    &self,
    ctx: &EngineContext<E>,
    identity: &CompilationIdentity<'_>,
    output_path: &Path,
  ) -> Result<usize, CacheError>;

  fn evaluate_with_cache(
    &self,
    ctx: &EngineContext<E>,
    identity: &CompilationIdentity<'_>,
    bytecode_path: &Path,
  ) -> Result<(), CacheError>;

  fn heap_stats(&self, ctx: &EngineContext<E>) -> Result<HeapSnapshot, CacheError>;
}

/// Backend for an engine build that may support bytecode.
///
/// Builds without the `bytecode` feature, or options asking for the stub, get
/// [`StubBackend`]; everything else gets [`FullBackend`].
pub fn default_backend<E: BytecodeEngine>(options: &CacheOptions) -> Box<dyn BytecodeBackend<E>> {
  if options.backend == BackendPreference::Stub || !BUILD_SUPPORTS_BYTECODE {
    return Box::new(StubBackend);
  }
  Box::new(FullBackend::new(options.clone()))
}

/// Backend for an engine that cannot serialize bytecode at all.
pub fn stub_backend<E: ScriptEngine>() -> Box<dyn BytecodeBackend<E>> {
  Box::new(StubBackend)
}
