//! Session state: the hidden container and the live URL index.
//!
//! Both pieces are shared mutable state owned by [`SessionManager`]; the rest
//! of the engine reaches them only through its methods.

/// Hidden container creation, reconciliation, and the focus/removal watcher.
pub mod container;
/// URL → live tab index.
pub mod index;
/// Lifetime owner wiring the two together.
pub mod manager;

pub use container::{ContainerState, HiddenContainerManager, Reconciliation, pick_container};
pub use index::SessionIndex;
pub use manager::SessionManager;
