//! Raw-buffer entry points.
//!
//! These mirror a C-style call surface: every buffer may be missing, and outcomes are written
//! into a caller-provided [`BytecodeResult`]. Missing required buffers or a missing context
//! are reported as "Invalid arguments" before the engine or the filesystem is touched. A
//! missing result record cannot be reported at all, so the call does nothing and returns
//! `false`.

use crate::cache::BytecodeCache;
use crate::context::ContextRef;
use crate::engine::ScriptEngine;
use crate::engine::UnitKind;
use crate::error::CacheError;
use crate::result::BytecodeResult;
use crate::result::HeapSnapshot;
use crate::source::path_from_raw;
use crate::source::CompilationIdentity;

fn dispatch(
  out: Option<&mut BytecodeResult>,
  call: impl FnOnce() -> Result<usize, CacheError>,
) -> bool {
  let Some(out) = out else {
    return false;
  };
  out.record(&call())
}

/// In-memory script generation; never succeeds.
pub fn generate_program_bytecode<E: ScriptEngine>(
  cache: &BytecodeCache<E>,
  ctx: Option<&ContextRef<E>>,
  source: Option<&[u8]>,
  filename: Option<&[u8]>,
  out: Option<&mut BytecodeResult>,
) -> bool {
  dispatch(out, || {
    let ctx = ctx.ok_or(CacheError::InvalidArguments)?;
    let identity = CompilationIdentity::from_raw(source, filename, UnitKind::Script)?;
    let ctx = ctx.resolve()?;
    cache.backend().generate_program_bytecode(&ctx, &identity)
  })
}

fn generate_to_file<E: ScriptEngine>(
  cache: &BytecodeCache<E>,
  kind: UnitKind,
  ctx: Option<&ContextRef<E>>,
  source: Option<&[u8]>,
  filename: Option<&[u8]>,
  output_path: Option<&[u8]>,
  out: Option<&mut BytecodeResult>,
) -> bool {
  dispatch(out, || {
    let ctx = ctx.ok_or(CacheError::InvalidArguments)?;
    let identity = CompilationIdentity::from_raw(source, filename, kind)?;
    let output_path = path_from_raw(output_path)?;
    let ctx = ctx.resolve()?;
    cache
      .backend()
      .generate_bytecode_to_file(&ctx, &identity, &output_path)
  })
}

pub fn generate_program_bytecode_to_file<E: ScriptEngine>(
  cache: &BytecodeCache<E>,
  ctx: Option<&ContextRef<E>>,
  source: Option<&[u8]>,
  filename: Option<&[u8]>,
  output_path: Option<&[u8]>,
  out: Option<&mut BytecodeResult>,
) -> bool {
  generate_to_file(
    cache,
    UnitKind::Script,
    ctx,
    source,
    filename,
    output_path,
    out,
  )
}

pub fn generate_module_bytecode_to_file<E: ScriptEngine>(
  cache: &BytecodeCache<E>,
  ctx: Option<&ContextRef<E>>,
  source: Option<&[u8]>,
  filename: Option<&[u8]>,
  output_path: Option<&[u8]>,
  out: Option<&mut BytecodeResult>,
) -> bool {
  generate_to_file(
    cache,
    UnitKind::Module,
    ctx,
    source,
    filename,
    output_path,
    out,
  )
}

/// Evaluate a script with an optional bytecode cache. `size` is always zero on success.
pub fn evaluate_with_cache<E: ScriptEngine>(
  cache: &BytecodeCache<E>,
  ctx: Option<&ContextRef<E>>,
  source: Option<&[u8]>,
  filename: Option<&[u8]>,
  bytecode_path: Option<&[u8]>,
  out: Option<&mut BytecodeResult>,
) -> bool {
  dispatch(out, || {
    let ctx = ctx.ok_or(CacheError::InvalidArguments)?;
    let identity = CompilationIdentity::from_raw(source, filename, UnitKind::Script)?;
    let bytecode_path = path_from_raw(bytecode_path)?;
    let ctx = ctx.resolve()?;
    cache
      .backend()
      .evaluate_with_cache(&ctx, &identity, &bytecode_path)
      .map(|()| 0)
  })
}

/// Fill `out` with the context's heap counters. On failure `out` is zeroed.
pub fn heap_stats<E: ScriptEngine>(
  cache: &BytecodeCache<E>,
  ctx: Option<&ContextRef<E>>,
  out: Option<&mut HeapSnapshot>,
) -> bool {
  let Some(out) = out else {
    return false;
  };
  let snapshot = ctx
    .ok_or(CacheError::InvalidArguments)
    .and_then(|ctx| ctx.resolve())
    .and_then(|ctx| cache.heap_stats(&ctx));
  match snapshot {
    Ok(snapshot) => {
      *out = snapshot;
      true
    }
    Err(_) => {
      *out = HeapSnapshot::default();
      false
    }
  }
}
