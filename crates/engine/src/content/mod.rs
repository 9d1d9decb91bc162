mod color;
mod level;
mod types;

pub use level::{load_level_file, parse_level_document, LevelLayout};
pub use types::{LevelErrorCode, LevelLoadError, SourceLocation};
