pub mod path;
pub mod paths;

pub use path::{path_of, Path, PathStep};
pub use paths::Paths;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("index {index} out of range for path of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}
