//! Memory model for the LearnScript interpreter
//!
//! This module provides the core runtime abstractions:
//! - [`value`]: Runtime value representation and JavaScript conversions
//! - [`scope`]: Lexical environments with `let`/`const` initialization tracking
//! - [`heap`]: Registry of allocations, emptied on teardown to break cycles
//!
//! # Reference Semantics
//!
//! Arrays, objects and closures are shared through `Rc<RefCell<_>>` handles,
//! single-threaded by construction: a run never leaves the thread it started on.

pub mod heap;
pub mod scope;
pub mod value;

pub use heap::Heap;
pub use scope::{Binding, BindingKind, Scope, ScopeError, ScopeRef};
pub use value::{ArrayRef, Closure, NativeFunction, Object, ObjectClass, ObjectRef, Value};
