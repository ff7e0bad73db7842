use super::BackendKind;
use super::BytecodeBackend;
use crate::context::EngineContext;
use crate::engine::BytecodeEngine;
use crate::error::CacheError;
use crate::generate;
use crate::hydrate;
use crate::options::CacheOptions;
use crate::result::HeapSnapshot;
use crate::source::CompilationIdentity;
use crate::telemetry;
use std::path::Path;

/// Backend driving an engine build that exposes bytecode serialization.
#[derive(Debug, Clone, Default)]
pub struct FullBackend {
  options: CacheOptions,
}

impl FullBackend {
  pub fn new(options: CacheOptions) -> Self {
    Self { options }
  }

  pub fn options(&self) -> &CacheOptions {
    &self.options
  }
}

impl<E: BytecodeEngine> BytecodeBackend<E> for FullBackend {
  fn kind(&self) -> BackendKind {
    BackendKind::Full
  }

  fn generate_program_bytecode(
    &self,
    ctx: &EngineContext<E>,
    _identity: &CompilationIdentity<'_>,
  ) -> Result<usize, CacheError> {
    ctx.lock().ensure_live()?;
    Err(CacheError::RequiresFileSink)
  }

  fn generate_bytecode_to_file(
    &self,
    ctx: &EngineContext<E>,
    identity: &CompilationIdentity<'_>,
    output_path: &Path,
  ) -> Result<usize, CacheError> {
    generate::generate_to_file(ctx, identity, output_path, &self.options)
  }

  fn evaluate_with_cache(
    &self,
    ctx: &EngineContext<E>,
    identity: &CompilationIdentity<'_>,
    bytecode_path: &Path,
  ) -> Result<(), CacheError> {
    hydrate::evaluate_with_cache(ctx, identity, bytecode_path)
  }

  fn heap_stats(&self, ctx: &EngineContext<E>) -> Result<HeapSnapshot, CacheError> {
    telemetry::heap_snapshot(ctx)
  }
}
