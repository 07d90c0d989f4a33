// scrub/src/commands/mod.rs
pub mod scrub;
