pub mod config;
pub mod document;
pub mod part;

pub use config::{ConfigParameters, DataKeySelector, EncodingConfig, PartDecl};
pub use document::RenderedDocument;
pub use part::{KeyRef, PartSpec, ResolvedPart, SourceKind, DEFAULT_DATA_KEY};
