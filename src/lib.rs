pub mod diagnostic;
pub mod error;
pub mod extractor;
pub mod metadata;
pub mod report;
pub mod script;
pub mod source;

pub use diagnostic::Diagnostic;
pub use error::Error;
pub use extractor::Extractor;
pub use metadata::{DurationMode, Length, TrackMetadata};
pub use script::Script;
