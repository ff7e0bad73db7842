use crate::engine::ScriptEngine;
use crate::error::CacheError;
use parking_lot::ReentrantMutex;
use parking_lot::ReentrantMutexGuard;
use std::cell::RefCell;
use std::cell::RefMut;
use std::fmt;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Weak;

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(pub u64);

/// A caller-owned engine instance plus the execution lock guarding its VM state.
///
/// The cache layer never creates or destroys contexts; it borrows one for the duration of a
/// call. Any thread that drives the engine must do so through [`EngineContext::lock`].
pub struct EngineContext<E> {
  id: ContextId,
  vm: ReentrantMutex<RefCell<E>>,
}

impl<E: ScriptEngine> EngineContext<E> {
  pub fn new(engine: E) -> Arc<Self> {
    Arc::new(Self {
      id: ContextId(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed)),
      vm: ReentrantMutex::new(RefCell::new(engine)),
    })
  }

  pub fn id(&self) -> ContextId {
    self.id
  }

  /// Acquire the execution lock. Reentrant on the owning thread; released when the guard
  /// drops.
  pub fn lock(&self) -> ExecutionLock<'_, E> {
    ExecutionLock {
      guard: self.vm.lock(),
    }
  }

  pub fn is_locked(&self) -> bool {
    self.vm.is_locked()
  }

  /// A weak handle for callers that only borrow the context.
  pub fn handle(self: &Arc<Self>) -> ContextRef<E> {
    ContextRef {
      inner: Arc::downgrade(self),
    }
  }
}

impl<E> fmt::Debug for EngineContext<E> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("EngineContext")
      .field("id", &self.id)
      .field("locked", &self.vm.is_locked())
      .finish()
  }
}

/// Scoped hold on a context's execution lock.
pub struct ExecutionLock<'a, E> {
  guard: ReentrantMutexGuard<'a, RefCell<E>>,
}

impl<'a, E: ScriptEngine> ExecutionLock<'a, E> {
  /// Mutable access to the engine.
  ///
  /// The lock is reentrant but the engine is not: if a caller further up this thread's stack
  /// is still driving the engine, this fails with [`CacheError::EngineBusy`].
  pub fn engine(&self) -> Result<RefMut<'_, E>, CacheError> {
    self
      .guard
      .try_borrow_mut()
      .map_err(|_| CacheError::EngineBusy)
  }

  /// Fail with [`CacheError::InvalidContext`] unless the engine still has a live global.
  pub fn ensure_live(&self) -> Result<(), CacheError> {
    let engine = self
      .guard
      .try_borrow()
      .map_err(|_| CacheError::EngineBusy)?;
    if engine.has_global() {
      Ok(())
    } else {
      Err(CacheError::InvalidContext)
    }
  }
}

/// Borrowed handle to an [`EngineContext`], as passed across the raw call surface.
///
/// The handle does not keep the context alive. Resolving a handle whose context has been
/// dropped, or that never pointed at one, fails with [`CacheError::InvalidContext`].
pub struct ContextRef<E> {
  inner: Weak<EngineContext<E>>,
}

impl<E: ScriptEngine> ContextRef<E> {
  /// A handle that resolves to nothing.
  pub fn dangling() -> Self {
    Self { inner: Weak::new() }
  }

  /// Upgrade to the owning context. Whether its engine still has a live global is checked
  /// later, under the execution lock.
  pub fn resolve(&self) -> Result<Arc<EngineContext<E>>, CacheError> {
    self.inner.upgrade().ok_or(CacheError::InvalidContext)
  }
}

impl<E> Clone for ContextRef<E> {
  fn clone(&self) -> Self {
    Self {
      inner: self.inner.clone(),
    }
  }
}

impl<E> fmt::Debug for ContextRef<E> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ContextRef")
      .field("live", &(self.inner.strong_count() > 0))
      .finish()
  }
}
