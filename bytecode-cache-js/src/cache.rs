use crate::backend::default_backend;
use crate::backend::stub_backend;
use crate::backend::BackendKind;
use crate::backend::BytecodeBackend;
use crate::context::EngineContext;
use crate::engine::BytecodeEngine;
use crate::engine::ScriptEngine;
use crate::error::CacheError;
use crate::options::CacheOptions;
use crate::result::HeapSnapshot;
use crate::source::CompilationIdentity;
use std::fmt;
use std::path::Path;

/// Bytecode cache entry points bound to one backend.
///
/// The backend is chosen once, when the cache is constructed, and every call routes through
/// it.
pub struct BytecodeCache<E: ScriptEngine> {
  backend: Box<dyn BytecodeBackend<E>>,
}

impl<E: BytecodeEngine> BytecodeCache<E> {
  pub fn new(options: CacheOptions) -> Self {
    Self::with_backend(default_backend(&options))
  }
}

impl<E: BytecodeEngine> Default for BytecodeCache<E> {
  fn default() -> Self {
    Self::new(CacheOptions::default())
  }
}

impl<E: ScriptEngine> BytecodeCache<E> {
  /// A cache for an engine without bytecode support; every operation fails with
  /// [`CacheError::Unavailable`].
  pub fn unavailable() -> Self {
    Self::with_backend(stub_backend())
  }

  pub fn with_backend(backend: Box<dyn BytecodeBackend<E>>) -> Self {
    Self { backend }
  }

  pub fn backend_kind(&self) -> BackendKind {
    self.backend.kind()
  }

  pub fn backend(&self) -> &dyn BytecodeBackend<E> {
    self.backend.as_ref()
  }

  /// In-memory script generation. Always fails; use
  /// [`BytecodeCache::generate_program_bytecode_to_file`].
  pub fn generate_program_bytecode(
    &self,
    ctx: &EngineContext<E>,
    source: &str,
    filename: Option<&str>,
  ) -> Result<usize, CacheError> {
    self
      .backend
      .generate_program_bytecode(ctx, &CompilationIdentity::script(source, filename))
  }

  pub fn generate_program_bytecode_to_file(
    &self,
    ctx: &EngineContext<E>,
    source: &str,
    filename: Option<&str>,
    output_path: impl AsRef<Path>,
  ) -> Result<usize, CacheError> {
    self.backend.generate_bytecode_to_file(
      ctx,
      &CompilationIdentity::script(source, filename),
      output_path.as_ref(),
    )
  }

  pub fn generate_module_bytecode_to_file(
    &self,
    ctx: &EngineContext<E>,
    source: &str,
    filename: Option<&str>,
    output_path: impl AsRef<Path>,
  ) -> Result<usize, CacheError> {
    self.backend.generate_bytecode_to_file(
      ctx,
      &CompilationIdentity::module(source, filename),
      output_path.as_ref(),
    )
  }

  /// Evaluate a script, degrading to compilation from source when the cache cannot be used.
  pub fn evaluate_with_cache(
    &self,
    ctx: &EngineContext<E>,
    source: &str,
    filename: Option<&str>,
    bytecode_path: impl AsRef<Path>,
  ) -> Result<(), CacheError> {
    self.backend.evaluate_with_cache(
      ctx,
      &CompilationIdentity::script(source, filename),
      bytecode_path.as_ref(),
    )
  }

  pub fn heap_stats(&self, ctx: &EngineContext<E>) -> Result<HeapSnapshot, CacheError> {
    self.backend.heap_stats(ctx)
  }

  pub fn heap_snapshot(&self, ctx: &EngineContext<E>) -> Option<HeapSnapshot> {
    self.heap_stats(ctx).ok()
  }
}

impl<E: ScriptEngine> fmt::Debug for BytecodeCache<E> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("BytecodeCache")
      .field("backend", &self.backend.kind())
      .finish()
  }
}
