//! Collaborator services used by the actions.

pub mod clock;
pub mod l10n;
pub mod local;
pub mod memory;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use l10n::{Catalog, Localizer, Passthrough};
pub use local::LocalStorage;
pub use memory::{MemoryStorage, StorageCall};
pub use storage::Storage;
