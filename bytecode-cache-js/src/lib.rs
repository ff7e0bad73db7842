//! Bytecode cache orchestration for embedded JavaScript engines.
//!
//! The embedding engine compiles source into an engine-specific serialized artifact; this
//! crate decides when to ask for one, holds the engine's execution lock while it does, and
//! writes the artifact to a caller-chosen file. It provides:
//! - One call surface ([`BytecodeCache`]) over two backends: [`FullBackend`] for engine builds
//!   implementing [`BytecodeEngine`], and [`StubBackend`] for builds that cannot serialize
//!   bytecode, which fails every call with [`CacheError::Unavailable`].
//! - Scoped, reentrant locking of shared engine state ([`EngineContext::lock`]).
//! - Typed errors ([`CacheError`], [`ErrorKind`]) and a fixed-layout result record
//!   ([`BytecodeResult`]) for the raw-buffer entry points in [`boundary`].
//!
//! # Cache files
//!
//! Cache files are opaque engine-defined blobs. This crate adds no header, version or
//! checksum, and does not key files by source content: choosing, invalidating and deleting
//! cache paths is the caller's responsibility. A file left behind by a failed generation call
//! is invalid and must not be loaded.
//!
//! [`BytecodeCache::evaluate_with_cache`] does not yet load artifacts back into the engine.
//! It always compiles from source, which is also its required behavior when the cache file
//! is missing or stale.
//!
//! # Features
//!
//! - `bytecode` (default): select [`FullBackend`] for engines implementing
//!   [`BytecodeEngine`]. Without it, [`default_backend`] always yields [`StubBackend`].

pub mod boundary;

mod backend;
mod cache;
mod context;
mod engine;
mod error;
mod generate;
mod hydrate;
mod options;
mod result;
mod source;
mod telemetry;

pub use crate::backend::default_backend;
pub use crate::backend::stub_backend;
pub use crate::backend::BackendKind;
pub use crate::backend::BytecodeBackend;
pub use crate::backend::FullBackend;
pub use crate::backend::StubBackend;
pub use crate::backend::BUILD_SUPPORTS_BYTECODE;
pub use crate::cache::BytecodeCache;
pub use crate::context::ContextId;
pub use crate::context::ContextRef;
pub use crate::context::EngineContext;
pub use crate::context::ExecutionLock;
pub use crate::engine::BytecodeCacheError;
pub use crate::engine::BytecodeEngine;
pub use crate::engine::CachedBytecode;
pub use crate::engine::Exception;
pub use crate::engine::ScriptEngine;
pub use crate::engine::SourceCode;
pub use crate::engine::UnitKind;
pub use crate::error::BoundedMessage;
pub use crate::error::CacheError;
pub use crate::error::ErrorKind;
pub use crate::error::ERROR_MESSAGE_CAPACITY;
pub use crate::generate::generate_to_file;
pub use crate::hydrate::evaluate_with_cache;
pub use crate::options::BackendPreference;
pub use crate::options::CacheOptions;
pub use crate::result::BytecodeResult;
pub use crate::result::HeapSnapshot;
pub use crate::source::path_from_raw;
pub use crate::source::CompilationIdentity;
pub use crate::telemetry::heap_snapshot;
