//! Audit stamps and the time/identity collaborators that fill them.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// == Audit Stamp ==
/// Who created and last touched a record, and when.
/// The default stamp is a placeholder; stores overwrite it on create.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditStamp {
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

impl AuditStamp {
    /// Stamp for a freshly created record.
    pub fn new(now: DateTime<Utc>, actor: &Actor) -> Self {
        Self {
            created_at: now,
            created_by: actor.to_string(),
            updated_at: now,
            updated_by: actor.to_string(),
        }
    }

    /// Records a modification, leaving the creation fields alone.
    pub fn touch(&mut self, now: DateTime<Utc>, actor: &Actor) {
        self.updated_at = now;
        self.updated_by = actor.to_string();
    }
}

// == Actor ==
/// Identity performing a write.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Actor(String);

impl Actor {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Actor used when a request carries no identity.
    pub fn anonymous() -> Self {
        Self("anonymous".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// == Clock ==
/// Time provider used for audit stamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Shared clock handle.
pub type SharedClock = Arc<dyn Clock>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_touch_keeps_creation_fields() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();

        let mut stamp = AuditStamp::new(created, &Actor::new("alice"));
        stamp.touch(later, &Actor::new("bob"));

        assert_eq!(stamp.created_at, created);
        assert_eq!(stamp.created_by, "alice");
        assert_eq!(stamp.updated_at, later);
        assert_eq!(stamp.updated_by, "bob");
    }

    #[test]
    fn test_fixed_clock() {
        let instant = Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(FixedClock(instant).now(), instant);
    }
}
