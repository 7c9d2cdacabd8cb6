//! Address-bar persistence for the catalog view: a pure codec between
//! [`ViewConfig`](shared::domain::ViewConfig) and a query string, plus the
//! injected location the controller reads from and replaces.

pub mod codec;
pub mod location;

pub use codec::{decode, encode, ViewConfigPatch};
pub use location::{LocationStore, MemoryLocation};
