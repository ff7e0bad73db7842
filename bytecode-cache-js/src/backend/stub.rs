use super::BackendKind;
use super::BytecodeBackend;
use crate::context::EngineContext;
use crate::engine::ScriptEngine;
use crate::error::CacheError;
use crate::result::HeapSnapshot;
use crate::source::CompilationIdentity;
use std::path::Path;

const GENERATION_UNAVAILABLE: &str = "Bytecode generation not available with this engine build";
const EVALUATION_UNAVAILABLE: &str =
  "Bytecode cache evaluation not available with this engine build";
const HEAP_STATS_UNAVAILABLE: &str = "Heap statistics not available with this engine build";

/// Backend for engine builds without bytecode serialization.
///
/// Every operation fails immediately with [`CacheError::Unavailable`]. The context is never
/// locked or touched and no file is opened.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubBackend;

impl<E: ScriptEngine> BytecodeBackend<E> for StubBackend {
  fn kind(&self) -> BackendKind {
    BackendKind::Stub
  }

  fn generate_program_bytecode(
    &self,
    _ctx: &EngineContext<E>,
    _identity: &CompilationIdentity<'_>,
  ) -> Result<usize, CacheError> {
    Err(CacheError::unavailable(GENERATION_UNAVAILABLE))
  }

  fn generate_bytecode_to_file(
    &self,
    _ctx: &EngineContext<E>,
    _identity: &CompilationIdentity<'_>,
    _output_path: &Path,
  ) -> Result<usize, CacheError> {
    Err(CacheError::unavailable(GENERATION_UNAVAILABLE))
  }

  fn evaluate_with_cache(
    &self,
    _ctx: &EngineContext<E>,
    _identity: &CompilationIdentity<'_>,
    _bytecode_path: &Path,
  ) -> Result<(), CacheError> {
    Err(CacheError::unavailable(EVALUATION_UNAVAILABLE))
  }

  fn heap_stats(&self, _ctx: &EngineContext<E>) -> Result<HeapSnapshot, CacheError> {
    Err(CacheError::unavailable(HEAP_STATS_UNAVAILABLE))
  }
}
