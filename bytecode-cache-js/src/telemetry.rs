use crate::context::EngineContext;
use crate::engine::ScriptEngine;
use crate::error::CacheError;
use crate::result::HeapSnapshot;

/// Read the engine's heap counters. Read-only.
pub fn heap_snapshot<E: ScriptEngine>(ctx: &EngineContext<E>) -> Result<HeapSnapshot, CacheError> {
  let lock = ctx.lock();
  lock.ensure_live()?;
  let counters = lock.engine()?.heap_counters();
  Ok(counters)
}
