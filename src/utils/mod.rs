pub mod environment;
pub mod paths;

pub use environment::{default_history_root, history_root_from_env};
pub use paths::{
    PathScheme, extension, file_name, matches_category, parse_timestamp, search_pattern,
    validate_category,
};
