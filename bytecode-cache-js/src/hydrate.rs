//! Cache-aware evaluation.
//!
//! A missing or stale cache file must never turn into an error; evaluation degrades to
//! compiling from source. Loading an artifact back into the engine is not implemented, so
//! every call currently takes the degraded path and the cache path is not read.

use crate::context::EngineContext;
use crate::engine::ScriptEngine;
use crate::error::CacheError;
use crate::source::CompilationIdentity;
use std::path::Path;
use std::time::Instant;
use tracing::debug;
use tracing::debug_span;
use tracing::warn;

pub fn evaluate_with_cache<E: ScriptEngine>(
  ctx: &EngineContext<E>,
  identity: &CompilationIdentity<'_>,
  bytecode_path: &Path,
) -> Result<(), CacheError> {
  let lock = ctx.lock();
  lock.ensure_live()?;

  let source = identity.to_source_code();
  let span = debug_span!(
    "bytecode_cache.evaluate",
    kind = source.kind.as_str(),
    origin = &*source.origin,
    cache_path = %bytecode_path.display(),
    cache_hit = false,
    duration_ms = tracing::field::Empty,
  );
  let _enter = span.enter();
  let start = Instant::now();

  let result = lock.engine().and_then(|mut engine| {
    engine
      .evaluate(&source)
      .map_err(|exception| CacheError::Execution {
        message: exception.to_string(),
      })
  });

  span.record("duration_ms", start.elapsed().as_secs_f64() * 1000.0);
  match &result {
    Ok(()) => debug!("evaluated from source"),
    Err(err) => warn!(%err, "evaluation failed"),
  }
  result
}
