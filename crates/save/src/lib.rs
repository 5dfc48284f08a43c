pub mod compat;
pub mod doc_path;
pub mod document;
mod load_pipeline;
pub mod load_session;
pub mod loader;
pub mod save_error;
pub mod save_file;
pub mod setting_compat;

#[cfg(test)]
mod test_fixtures;

pub use document::{Document, Value};
pub use load_pipeline::{load_savegame, upgrade_document, LoadedGame};
pub use load_session::{CompatReport, FormatClass, LoadOptions, LoadSession, StrictnessMode};
pub use save_error::SaveError;
