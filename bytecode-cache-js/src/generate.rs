//! Bytecode generation: compile one unit under the execution lock and stream the artifact to
//! a file.

use crate::context::EngineContext;
use crate::context::ExecutionLock;
use crate::engine::BytecodeCacheError;
use crate::engine::BytecodeEngine;
use crate::engine::CachedBytecode;
use crate::engine::SourceCode;
use crate::engine::UnitKind;
use crate::error::CacheError;
use crate::options::CacheOptions;
use crate::source::CompilationIdentity;
use std::fs::File;
use std::fs::OpenOptions;
use std::path::Path;
use std::time::Instant;
use tracing::debug;
use tracing::debug_span;
use tracing::warn;

fn generic_failure(kind: UnitKind) -> &'static str {
  match kind {
    UnitKind::Script => "Bytecode generation failed",
    UnitKind::Module => "Module bytecode generation failed",
  }
}

fn open_truncated(path: &Path) -> Result<File, CacheError> {
  OpenOptions::new()
    .write(true)
    .create(true)
    .truncate(true)
    .open(path)
    .map_err(|err| CacheError::Io {
      path: path.display().to_string(),
      reason: err.to_string(),
    })
}

/// Map the engine's answer onto the cache taxonomy.
fn artifact_size(
  kind: UnitKind,
  outcome: Result<Option<CachedBytecode>, BytecodeCacheError>,
) -> Result<usize, CacheError> {
  match outcome {
    Ok(Some(bytecode)) => Ok(bytecode.size()),
    Ok(None) => Err(CacheError::Compile {
      message: generic_failure(kind).to_string(),
    }),
    Err(err) => Err(CacheError::Compile {
      message: err
        .message
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| generic_failure(kind).to_string()),
    }),
  }
}

fn generate_locked<E: BytecodeEngine>(
  lock: &ExecutionLock<'_, E>,
  source: &SourceCode,
  output_path: &Path,
  options: &CacheOptions,
) -> Result<usize, CacheError> {
  // Nothing has been written if this fails, so there is no partial file to clean up.
  let mut file = open_truncated(output_path)?;

  let outcome = lock.engine()?.generate_bytecode(source, &mut file);
  let result = artifact_size(source.kind, outcome);

  if result.is_err() && options.truncate_failed_output {
    if let Err(err) = file.set_len(0) {
      warn!(path = %output_path.display(), %err, "could not truncate failed bytecode output");
    }
  }
  drop(file);
  result
}

/// Compile `identity` and write its serialized artifact to `output_path`, returning the
/// artifact's size in bytes.
///
/// On failure the file at `output_path` may exist but must be treated as invalid.
pub fn generate_to_file<E: BytecodeEngine>(
  ctx: &EngineContext<E>,
  identity: &CompilationIdentity<'_>,
  output_path: &Path,
  options: &CacheOptions,
) -> Result<usize, CacheError> {
  let lock = ctx.lock();
  lock.ensure_live()?;

  let source = identity.to_source_code();
  let span = debug_span!(
    "bytecode_cache.generate",
    kind = source.kind.as_str(),
    origin = &*source.origin,
    path = %output_path.display(),
    size = tracing::field::Empty,
    duration_ms = tracing::field::Empty,
  );
  let _enter = span.enter();
  let start = Instant::now();

  let result = generate_locked(&lock, &source, output_path, options);
  span.record("duration_ms", start.elapsed().as_secs_f64() * 1000.0);
  match &result {
    Ok(size) => {
      span.record("size", *size);
      debug!(size, "bytecode written");
    }
    Err(err) => warn!(kind = ?err.kind(), %err, "bytecode generation failed"),
  }
  result
}
