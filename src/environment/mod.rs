//! Lexical environments: the frame chain scripts resolve identifiers
//! against.

pub mod lexical_environment;

pub use self::lexical_environment::{Environment, LexicalEnvironment, Scope, ScopeKind};
