use std::fmt;
use std::fmt::Debug;
use std::fmt::Formatter;

/// Capacity of the fixed error-message buffer, including the trailing NUL.
pub const ERROR_MESSAGE_CAPACITY: usize = 256;

/// Stable classification of cache failures.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
  /// A required argument was missing. Reported before any engine interaction.
  InvalidArguments,
  /// The context handle does not resolve to a live engine environment.
  InvalidContext,
  /// The destination path could not be opened for writing.
  Io,
  /// The engine failed to compile or serialize the unit.
  Compile,
  /// An uncaught script-level exception during evaluation.
  Execution,
  /// The linked engine build cannot provide the capability.
  Unavailable,
  /// The engine serializer needs a streaming file sink rather than a returned buffer.
  RequiresFileSink,
  /// The engine is already being driven further up the calling thread's stack.
  EngineBusy,
}

/// Errors produced by the bytecode cache layer.
///
/// Every failure is captured and converted into one of these; engine-native exception
/// objects never cross this boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
  #[error("Invalid arguments")]
  InvalidArguments,

  #[error("Invalid context")]
  InvalidContext,

  #[error("Failed to open output file: {path}")]
  Io { path: String, reason: String },

  /// Message forwarded verbatim from the engine.
  #[error("{message}")]
  Compile { message: String },

  /// The string conversion of the uncaught exception.
  #[error("{message}")]
  Execution { message: String },

  #[error("{message}")]
  Unavailable { message: &'static str },

  #[error("Bytecode generation requires file handle - use generate_program_bytecode_to_file instead")]
  RequiresFileSink,

  #[error("Engine is already in use on this thread")]
  EngineBusy,
}

impl CacheError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      CacheError::InvalidArguments => ErrorKind::InvalidArguments,
      CacheError::InvalidContext => ErrorKind::InvalidContext,
      CacheError::Io { .. } => ErrorKind::Io,
      CacheError::Compile { .. } => ErrorKind::Compile,
      CacheError::Execution { .. } => ErrorKind::Execution,
      CacheError::Unavailable { .. } => ErrorKind::Unavailable,
      CacheError::RequiresFileSink => ErrorKind::RequiresFileSink,
      CacheError::EngineBusy => ErrorKind::EngineBusy,
    }
  }

  pub(crate) fn unavailable(message: &'static str) -> Self {
    CacheError::Unavailable { message }
  }
}

/// A NUL-terminated message stored inline in a fixed buffer.
///
/// At most `ERROR_MESSAGE_CAPACITY - 1` bytes are kept. Longer messages are cut silently at
/// the last UTF-8 character boundary that fits.
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct BoundedMessage([u8; ERROR_MESSAGE_CAPACITY]);

impl BoundedMessage {
  pub const fn empty() -> Self {
    Self([0; ERROR_MESSAGE_CAPACITY])
  }

  pub fn new(message: &str) -> Self {
    let mut bounded = Self::empty();
    bounded.set(message);
    bounded
  }

  /// Overwrite the stored text, truncating when needed.
  pub fn set(&mut self, message: &str) {
    let mut end = message.len().min(ERROR_MESSAGE_CAPACITY - 1);
    while !message.is_char_boundary(end) {
      end -= 1;
    }
    self.0 = [0; ERROR_MESSAGE_CAPACITY];
    self.0[..end].copy_from_slice(&message.as_bytes()[..end]);
  }

  pub fn clear(&mut self) {
    self.0 = [0; ERROR_MESSAGE_CAPACITY];
  }

  pub fn len(&self) -> usize {
    self.0.iter().position(|&b| b == 0).unwrap_or(self.0.len())
  }

  pub fn is_empty(&self) -> bool {
    self.0[0] == 0
  }

  pub fn as_bytes(&self) -> &[u8] {
    &self.0[..self.len()]
  }

  /// The stored text. Bytes written through the raw buffer that are not valid UTF-8 are
  /// replaced.
  pub fn to_string_lossy(&self) -> String {
    String::from_utf8_lossy(self.as_bytes()).into_owned()
  }

  pub fn raw(&self) -> &[u8; ERROR_MESSAGE_CAPACITY] {
    &self.0
  }
}

impl Default for BoundedMessage {
  fn default() -> Self {
    Self::empty()
  }
}

impl Debug for BoundedMessage {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    Debug::fmt(&self.to_string_lossy(), f)
  }
}

impl From<&CacheError> for BoundedMessage {
  fn from(err: &CacheError) -> Self {
    BoundedMessage::new(&err.to_string())
  }
}
