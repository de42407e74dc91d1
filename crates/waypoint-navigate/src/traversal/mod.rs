pub mod trace;
pub mod traverser;
