//! Domain Module
//!
//! Records stored by the catalog. Every record carries an identifier, a
//! soft-delete flag, a row version and an audit stamp.

use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

pub use auction::{Auction, AuctionStatus};
pub use audit::{Actor, AuditStamp, Clock, FixedClock, SharedClock, SystemClock};
pub use bookmark::Bookmark;
pub use review::{Review, RATING_RANGE};

// == Record Trait ==
/// A persisted entity the query and cache layers can work with.
pub trait Record: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Resource tag used in cache keys and error messages.
    const RESOURCE: &'static str;

    fn id(&self) -> Uuid;

    fn is_deleted(&self) -> bool;

    fn mark_deleted(&mut self);

    /// Row version, bumped on every successful write.
    fn version(&self) -> u64;

    fn set_version(&mut self, version: u64);

    fn audit(&self) -> &AuditStamp;

    fn audit_mut(&mut self) -> &mut AuditStamp;
}

/// Implements `Record` for a struct with `id`, `is_deleted`, `version` and
/// `audit` fields.
macro_rules! impl_record {
    ($ty:ty, $resource:literal) => {
        impl $crate::domain::Record for $ty {
            const RESOURCE: &'static str = $resource;

            fn id(&self) -> ::uuid::Uuid {
                self.id
            }

            fn is_deleted(&self) -> bool {
                self.is_deleted
            }

            fn mark_deleted(&mut self) {
                self.is_deleted = true;
            }

            fn version(&self) -> u64 {
                self.version
            }

            fn set_version(&mut self, version: u64) {
                self.version = version;
            }

            fn audit(&self) -> &$crate::domain::AuditStamp {
                &self.audit
            }

            fn audit_mut(&mut self) -> &mut $crate::domain::AuditStamp {
                &mut self.audit
            }
        }
    };
}

pub(crate) use impl_record;

mod auction;
mod audit;
mod bookmark;
mod review;
