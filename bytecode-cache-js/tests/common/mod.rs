#![allow(dead_code)]

use bytecode_cache_js::BytecodeCache;
use bytecode_cache_js::BytecodeCacheError;
use bytecode_cache_js::BytecodeEngine;
use bytecode_cache_js::CacheOptions;
use bytecode_cache_js::CachedBytecode;
use bytecode_cache_js::EngineContext;
use bytecode_cache_js::Exception;
use bytecode_cache_js::FullBackend;
use bytecode_cache_js::HeapSnapshot;
use bytecode_cache_js::ScriptEngine;
use bytecode_cache_js::SourceCode;
use bytecode_cache_js::UnitKind;
use std::fs::File;
use std::io::Write;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub const ARTIFACT_MAGIC: &[u8] = b"FAKEJSC\0";
const CHUNK: usize = 16;

/// How the fake engine should misbehave during bytecode generation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum GenerateFault {
  #[default]
  None,
  /// Return neither an artifact nor an error.
  NoArtifact,
  /// Stream part of the artifact, then report an error.
  FailAfterPartialWrite,
  /// Report an error with this many `x` characters as its message.
  LongMessage(usize),
}

/// Tracks whether two threads are ever inside the engine at once.
#[derive(Clone, Default)]
pub struct Occupancy {
  inside: Arc<AtomicBool>,
  overlaps: Arc<AtomicUsize>,
}

impl Occupancy {
  fn enter(&self) {
    if self.inside.swap(true, Ordering::SeqCst) {
      self.overlaps.fetch_add(1, Ordering::SeqCst);
    }
  }

  fn exit(&self) {
    self.inside.store(false, Ordering::SeqCst);
  }

  pub fn overlaps(&self) -> usize {
    self.overlaps.load(Ordering::SeqCst)
  }
}

/// Scripted stand-in for a real engine.
///
/// It understands just enough syntax to tell scripts from modules: balanced brackets,
/// top-level `import`/`export` statements, and top-level `throw` statements.
#[derive(Default)]
pub struct FakeEngine {
  pub dead: bool,
  pub fault: GenerateFault,
  pub generate_calls: usize,
  pub evaluate_calls: usize,
  pub last_origin: Option<String>,
  pub evaluated: Vec<String>,
  pub occupancy: Occupancy,
  /// Time spent inside each engine call, to widen race windows.
  pub dwell: Duration,
}

impl FakeEngine {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn dead() -> Self {
    Self {
      dead: true,
      ..Self::default()
    }
  }

  pub fn with_fault(fault: GenerateFault) -> Self {
    Self {
      fault,
      ..Self::default()
    }
  }

  pub fn engine_calls(&self) -> usize {
    self.generate_calls + self.evaluate_calls
  }

  fn enter(&self) {
    self.occupancy.enter();
    if !self.dwell.is_zero() {
      thread::sleep(self.dwell);
    }
  }
}

fn syntax_error(message: impl Into<String>) -> Exception {
  Exception::new(Some("SyntaxError".to_string()), message)
}

fn check_brackets(text: &str) -> Result<(), Exception> {
  let mut stack = Vec::new();
  for ch in text.chars() {
    match ch {
      '(' | '[' | '{' => stack.push(ch),
      ')' | ']' | '}' => {
        let open = match ch {
          ')' => '(',
          ']' => '[',
          _ => '{',
        };
        if stack.pop() != Some(open) {
          return Err(syntax_error(format!("Unexpected token '{ch}'")));
        }
      }
      _ => {}
    }
  }
  if stack.is_empty() {
    Ok(())
  } else {
    Err(syntax_error("Unexpected end of script"))
  }
}

fn top_level_statements(text: &str) -> impl Iterator<Item = &str> {
  text
    .split(|c| c == ';' || c == '\n')
    .map(str::trim)
    .filter(|stmt| !stmt.is_empty())
}

fn starts_with_keyword(stmt: &str, keyword: &str) -> bool {
  stmt
    .strip_prefix(keyword)
    .and_then(|rest| rest.chars().next())
    .is_some_and(|c| c.is_whitespace() || c == '{' || c == '*' || c == '"' || c == '\'')
}

/// Parse `source`, returning its top-level statements.
fn parse(source: &SourceCode) -> Result<Vec<String>, Exception> {
  check_brackets(&source.text)?;
  let mut statements = Vec::new();
  for stmt in top_level_statements(&source.text) {
    if source.kind == UnitKind::Script {
      if starts_with_keyword(stmt, "import") {
        return Err(syntax_error(
          "Cannot use import statement outside a module",
        ));
      }
      if starts_with_keyword(stmt, "export") {
        return Err(syntax_error("Unexpected keyword 'export'"));
      }
    }
    statements.push(stmt.to_string());
  }
  Ok(statements)
}

fn serialize(source: &SourceCode) -> Vec<u8> {
  let mut artifact = Vec::new();
  artifact.extend_from_slice(ARTIFACT_MAGIC);
  artifact.push(match source.kind {
    UnitKind::Script => 0,
    UnitKind::Module => 1,
  });
  artifact.extend_from_slice(&(source.origin.len() as u32).to_le_bytes());
  artifact.extend_from_slice(source.origin.as_bytes());
  artifact.extend_from_slice(source.text.as_bytes());
  artifact
}

impl ScriptEngine for FakeEngine {
  fn has_global(&self) -> bool {
    !self.dead
  }

  fn evaluate(&mut self, source: &SourceCode) -> Result<(), Exception> {
    self.enter();
    self.evaluate_calls += 1;
    self.last_origin = Some(source.origin.to_string());
    let result = parse(source).and_then(|statements| {
      for stmt in statements {
        if let Some(thrown) = stmt.strip_prefix("throw ") {
          return Err(Exception::new(
            Some("Error".to_string()),
            thrown.trim().trim_matches('"'),
          ));
        }
        self.evaluated.push(stmt);
      }
      Ok(())
    });
    self.occupancy.exit();
    result
  }

  fn heap_counters(&self) -> HeapSnapshot {
    let heap_size = 1024 + 64 * self.evaluated.len();
    HeapSnapshot {
      heap_size,
      heap_capacity: (heap_size * 2).max(4096),
      extra_memory_size: 0,
      array_buffer_size: 16 * self.evaluate_calls,
    }
  }
}

impl BytecodeEngine for FakeEngine {
  fn generate_bytecode(
    &mut self,
    source: &SourceCode,
    sink: &mut File,
  ) -> Result<Option<CachedBytecode>, BytecodeCacheError> {
    self.enter();
    self.generate_calls += 1;
    self.last_origin = Some(source.origin.to_string());
    let result = self.generate_inner(source, sink);
    self.occupancy.exit();
    result
  }
}

impl FakeEngine {
  fn generate_inner(
    &mut self,
    source: &SourceCode,
    sink: &mut File,
  ) -> Result<Option<CachedBytecode>, BytecodeCacheError> {
    if let Err(exception) = parse(source) {
      return Err(BytecodeCacheError::new(exception.to_string()));
    }
    let artifact = serialize(source);
    match self.fault {
      GenerateFault::None => {}
      GenerateFault::NoArtifact => return Ok(None),
      GenerateFault::FailAfterPartialWrite => {
        sink
          .write_all(&artifact[..artifact.len() / 2])
          .map_err(|err| BytecodeCacheError::new(err.to_string()))?;
        return Err(BytecodeCacheError::new("serialization interrupted"));
      }
      GenerateFault::LongMessage(len) => return Err(BytecodeCacheError::new("x".repeat(len))),
    }
    for chunk in artifact.chunks(CHUNK) {
      sink
        .write_all(chunk)
        .map_err(|err| BytecodeCacheError::new(err.to_string()))?;
    }
    Ok(Some(CachedBytecode::new(artifact.len())))
  }
}

pub fn context() -> Arc<EngineContext<FakeEngine>> {
  EngineContext::new(FakeEngine::new())
}

/// A cache bound to the full backend regardless of build features.
pub fn full_cache() -> BytecodeCache<FakeEngine> {
  full_cache_with(CacheOptions::default())
}

pub fn full_cache_with(options: CacheOptions) -> BytecodeCache<FakeEngine> {
  BytecodeCache::with_backend(Box::new(FullBackend::new(options)))
}

pub fn calls(ctx: &EngineContext<FakeEngine>) -> usize {
  let lock = ctx.lock();
  let calls = lock.engine().unwrap().engine_calls();
  calls
}
