//! Internal domain modules for the Strata core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod connections;
pub mod delete;
pub mod entry;
pub mod error;
pub mod filter;
pub mod frontmatter;
pub mod notebook;
pub mod ordering;
pub mod search_index;
pub mod settings;
pub mod storage;
pub mod vault;

#[doc(inline)]
pub use connections::{Connection, ConnectionGraph, ConnectionsDocument};
#[doc(inline)]
pub use delete::DeleteResult;
#[doc(inline)]
pub use entry::{Entry, EntryMeta, Pressure, Structure};
#[doc(inline)]
pub use error::{Result, StrataError};
#[doc(inline)]
pub use filter::{apply_filter, EntryFilter, HierarchySelection};
#[doc(inline)]
pub use frontmatter::Decoded;
#[doc(inline)]
pub use notebook::NotebookPath;
#[doc(inline)]
pub use ordering::SortUpdate;
#[doc(inline)]
pub use search_index::SearchIndex;
#[doc(inline)]
pub use settings::{AppConfig, VaultSettings};
#[doc(inline)]
pub use storage::EntryStore;
#[doc(inline)]
pub use vault::Vault;
