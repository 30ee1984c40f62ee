//! Error types for import closure resolution.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::parser::ParseError;

/// Fatal errors during closure resolution. Any of these aborts the run;
/// there is no partial output.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The root schema file does not exist or is unreadable.
    #[error("schema file not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// A transitively imported file does not exist or is unreadable.
    #[error("schema file not found: {} (imported from {})", path.display(), imported_from.display())]
    FileNotFound {
        path: PathBuf,
        imported_from: PathBuf,
    },

    /// A file in the closure is not parseable as a schema document.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// An import/include directive carries no schemaLocation.
    #[error("import in {} is missing a schemaLocation", .0.display())]
    MissingLocation(PathBuf),
}

impl ImportError {
    /// Wrap a parse failure with the path of the offending file.
    pub fn parse(path: impl AsRef<Path>, source: ParseError) -> Self {
        Self::Parse {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
