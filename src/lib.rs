//! # tsbind - TypeScript declaration to ReasonML binding generator
//!
//! Translates TypeScript declaration files (`.d.ts`) into ReasonML
//! (BuckleScript) foreign binding source text.
//!
//! tsbind provides:
//! - A normalized, closed-variant declaration model (`TsNode`/`TsType`)
//! - A tree-sitter based builder that walks `.d.ts` syntax trees
//! - A namespace index grouping declarations by container path
//! - An emitter producing nested, deterministically ordered module blocks

pub mod builder;
pub mod emitter;
pub mod model;
pub mod names;
pub mod namespace;

// Re-exports for convenient access
pub use builder::build_model;
pub use emitter::{EmitOptions, Emitter};
pub use model::{TsNode, TsNodeKind, TsParameter, TsType};
pub use names::NameAllocator;
pub use namespace::NamespaceIndex;

/// Result type alias for tsbind operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for tsbind operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("source not found: {path}")]
    SourceNotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("grammar error: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the full pipeline on declaration source text.
///
/// The builder runs to completion before the index or emitter observe any
/// data; re-running on identical input produces byte-identical output.
pub fn generate(source: &str, options: &EmitOptions) -> Result<String> {
    let nodes = build_model(source)?;
    tracing::info!("model built: {} top-level declarations", nodes.len());
    let emitter = Emitter::new(&nodes, options);
    Ok(emitter.emit())
}

/// Read a declaration file and run the full pipeline on its contents.
pub fn generate_file(path: &std::path::Path, options: &EmitOptions) -> Result<String> {
    let source = std::fs::read_to_string(path).map_err(|e| Error::SourceNotFound {
        path: path.display().to_string(),
        source: e,
    })?;
    generate(&source, options)
}
