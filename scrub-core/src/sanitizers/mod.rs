//! Rule compilation for the regex engine.
//!
//! Turns the declarative `RuleConfig` entries from `config` into compiled
//! rules, attaching the replacement policy and any programmatic validator
//! from `validators`.

pub mod compiler;
