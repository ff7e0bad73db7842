use crate::engine::SourceCode;
use crate::engine::UnitKind;
use crate::error::CacheError;
use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;

/// What is being compiled and under which origin label.
///
/// The identity is a diagnostic origin tag only. It is not a cache key: validity of a cache
/// file is entirely managed by the caller through the path it chooses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompilationIdentity<'a> {
  pub source: &'a [u8],
  /// Origin label; `None` or empty selects the per-kind default.
  pub origin: Option<&'a [u8]>,
  pub kind: UnitKind,
}

impl<'a> CompilationIdentity<'a> {
  pub fn new(source: &'a [u8], origin: Option<&'a [u8]>, kind: UnitKind) -> Self {
    Self {
      source,
      origin,
      kind,
    }
  }

  pub fn script(source: &'a str, origin: Option<&'a str>) -> Self {
    Self::new(source.as_bytes(), origin.map(str::as_bytes), UnitKind::Script)
  }

  pub fn module(source: &'a str, origin: Option<&'a str>) -> Self {
    Self::new(source.as_bytes(), origin.map(str::as_bytes), UnitKind::Module)
  }

  /// Build an identity from raw buffers. A missing source buffer is an argument error.
  pub fn from_raw(
    source: Option<&'a [u8]>,
    origin: Option<&'a [u8]>,
    kind: UnitKind,
  ) -> Result<Self, CacheError> {
    let source = source.ok_or(CacheError::InvalidArguments)?;
    Ok(Self::new(source, origin, kind))
  }

  pub fn source_len(&self) -> usize {
    self.source.len()
  }

  /// The origin label as handed to the engine, used verbatim apart from the empty-label
  /// default.
  pub fn origin_label(&self) -> Cow<'a, str> {
    match self.origin {
      Some(origin) if !origin.is_empty() => String::from_utf8_lossy(origin),
      _ => Cow::Borrowed(self.kind.default_origin()),
    }
  }

  /// Decode into engine-ready strings.
  ///
  /// Source text is expected to be UTF-8. Malformed sequences are replaced with U+FFFD and
  /// left for the engine's parser to reject or accept.
  pub fn to_source_code(&self) -> SourceCode {
    SourceCode {
      text: Arc::from(String::from_utf8_lossy(self.source)),
      origin: Arc::from(self.origin_label()),
      kind: self.kind,
    }
  }
}

/// Decode a raw path buffer. A missing buffer is an argument error.
///
/// The bytes name the file exactly; they are never repaired. On Unix any byte string is a
/// path. Elsewhere the buffer must be UTF-8, and anything else is reported as an I/O failure
/// since no file by that name can be opened.
pub fn path_from_raw(path: Option<&[u8]>) -> Result<PathBuf, CacheError> {
  let path = path.ok_or(CacheError::InvalidArguments)?;
  decode_path(path)
}

#[cfg(unix)]
fn decode_path(path: &[u8]) -> Result<PathBuf, CacheError> {
  use std::os::unix::ffi::OsStrExt;

  Ok(PathBuf::from(std::ffi::OsStr::from_bytes(path)))
}

#[cfg(not(unix))]
fn decode_path(path: &[u8]) -> Result<PathBuf, CacheError> {
  match std::str::from_utf8(path) {
    Ok(path) => Ok(PathBuf::from(path)),
    Err(err) => Err(CacheError::Io {
      path: String::from_utf8_lossy(path).into_owned(),
      reason: err.to_string(),
    }),
  }
}
