// scrub/src/utils/mod.rs
pub mod io;
