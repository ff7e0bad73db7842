use crate::error::BoundedMessage;
use crate::error::CacheError;
use crate::error::ERROR_MESSAGE_CAPACITY;
use serde::Serialize;

/// Fixed-layout outcome record for one cache operation.
///
/// `data` is always null: artifacts are only ever written to disk. When `success` is false
/// the message is non-empty and `size` is zero; when it is true the message is empty.
#[repr(C)]
#[derive(Clone, Debug)]
pub struct BytecodeResult {
  pub success: bool,
  pub data: *const u8,
  pub size: usize,
  pub error_message: BoundedMessage,
}

impl Default for BytecodeResult {
  fn default() -> Self {
    Self {
      success: false,
      data: std::ptr::null(),
      size: 0,
      error_message: BoundedMessage::empty(),
    }
  }
}

impl BytecodeResult {
  pub fn succeeded(size: usize) -> Self {
    Self {
      success: true,
      size,
      ..Self::default()
    }
  }

  pub fn failed(err: &CacheError) -> Self {
    let mut result = Self::default();
    result.set_failure(err);
    result
  }

  pub fn set_success(&mut self, size: usize) {
    self.success = true;
    self.data = std::ptr::null();
    self.size = size;
    self.error_message.clear();
  }

  pub fn set_failure(&mut self, err: &CacheError) {
    self.success = false;
    self.data = std::ptr::null();
    self.size = 0;
    self.error_message = BoundedMessage::from(err);
  }

  /// Record `outcome`, returning the success flag.
  pub fn record(&mut self, outcome: &Result<usize, CacheError>) -> bool {
    match outcome {
      Ok(size) => self.set_success(*size),
      Err(err) => self.set_failure(err),
    }
    self.success
  }

  /// Error message as a string. Empty on success.
  pub fn error(&self) -> String {
    self.error_message.to_string_lossy()
  }

  pub fn error_bytes(&self) -> &[u8; ERROR_MESSAGE_CAPACITY] {
    self.error_message.raw()
  }

  pub fn into_result(self) -> Result<usize, String> {
    if self.success {
      Ok(self.size)
    } else {
      Err(self.error())
    }
  }
}

/// Engine heap counters, in bytes.
///
/// Each counter is read from the same context query; the four reads are not atomic with
/// respect to each other.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HeapSnapshot {
  pub heap_size: usize,
  pub heap_capacity: usize,
  pub extra_memory_size: usize,
  pub array_buffer_size: usize,
}
