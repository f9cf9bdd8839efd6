pub mod emit;
pub mod label;
pub mod merge;
pub mod output;
pub mod plate;
pub mod slug;

pub use emit::{emit, EmitReport};
pub use merge::merge_revoked_versions;
pub use output::write_document;
