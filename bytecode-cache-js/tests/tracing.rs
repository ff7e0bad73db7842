mod common;

use common::context;
use common::full_cache;
use std::io;
use std::sync::Arc;
use std::sync::Mutex;
use tempfile::tempdir;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct SharedWriter {
  buffer: Arc<Mutex<Vec<u8>>>,
}

impl SharedWriter {
  fn contents(&self) -> String {
    String::from_utf8(self.buffer.lock().unwrap().clone()).unwrap()
  }
}

struct SharedWriterGuard<'a> {
  buffer: &'a Arc<Mutex<Vec<u8>>>,
}

impl<'a> io::Write for SharedWriterGuard<'a> {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    self.buffer.lock().unwrap().extend_from_slice(buf);
    Ok(buf.len())
  }

  fn flush(&mut self) -> io::Result<()> {
    Ok(())
  }
}

impl<'a> MakeWriter<'a> for SharedWriter {
  type Writer = SharedWriterGuard<'a>;

  fn make_writer(&'a self) -> Self::Writer {
    SharedWriterGuard {
      buffer: &self.buffer,
    }
  }
}

#[test]
fn generation_and_evaluation_emit_spans() {
  let writer = SharedWriter::default();
  let subscriber = tracing_subscriber::fmt()
    .with_span_events(FmtSpan::CLOSE)
    .with_max_level(tracing::Level::DEBUG)
    .with_ansi(false)
    .with_writer(writer.clone())
    .finish();
  let guard = tracing::subscriber::set_default(subscriber);

  let dir = tempdir().unwrap();
  let ctx = context();
  let cache = full_cache();
  cache
    .generate_module_bytecode_to_file(&ctx, "export const a = 1;", Some("a.mjs"), dir.path().join("a.jsc"))
    .unwrap();
  cache
    .generate_program_bytecode_to_file(&ctx, "(", Some("bad.js"), dir.path().join("bad.jsc"))
    .unwrap_err();
  cache
    .evaluate_with_cache(&ctx, "1;", None, dir.path().join("missing.jsc"))
    .unwrap();

  drop(guard);
  let output = writer.contents();
  assert!(
    output.contains("bytecode_cache.generate"),
    "expected generate span output, got: {output}"
  );
  assert!(output.contains("bytecode_cache.evaluate"));
  assert!(output.contains("a.mjs"));
  assert!(output.contains("duration_ms"));
  assert!(output.contains("bytecode generation failed"));
}
