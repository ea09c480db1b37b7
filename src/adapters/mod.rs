pub mod archive;
pub mod documents;
pub mod storage;

pub use archive::ZipArchiveSource;
pub use documents::JsonDocumentStore;
pub use storage::LocalFileStore;
