//! Catalog view controller: owns the view configuration, keeps it mirrored
//! into the location, and derives what to render from the cached page.

pub mod controller;
pub mod pagination;
pub mod pipeline;
pub mod session;
pub mod snapshot;

pub use controller::{ViewAction, ViewController, ViewSettings};
pub use pagination::Pagination;
pub use session::CatalogSession;
pub use snapshot::ViewSnapshot;
