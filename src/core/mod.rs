pub mod coerce;
pub mod context;
pub mod engine;
pub mod entry;
pub mod mappers;
pub mod markup;
pub mod pipeline;
pub mod provision;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::domain::model::{DocumentPayload, NormalizedRecord};
pub use crate::domain::ports::{Archive, DocumentStore, FileStore};
pub use crate::utils::error::Result;
