//! Canonical cache keys.
//!
//! Keys have the shape `resource:operation:field=value:field=value...`.
//! Reserved characters inside tags and values are percent-escaped, and an
//! unset field is written as the bare field name, so two different parameter
//! sets can never produce the same key.

use std::fmt::{Display, Write};

/// Operation tag for single-record keys.
pub const ENTITY_OP: &str = "id";

/// Operation tag for list/page keys.
pub const LIST_OP: &str = "list";

// == Cache Key Builder ==
#[derive(Debug, Clone)]
pub struct CacheKey {
    key: String,
}

impl CacheKey {
    /// Starts a key for `resource` and `operation`.
    pub fn new(resource: &str, operation: &str) -> Self {
        let mut key = String::with_capacity(64);
        escape_into(&mut key, resource);
        key.push(':');
        escape_into(&mut key, operation);
        key.push(':');
        Self { key }
    }

    /// Appends `field=value`.
    pub fn field(mut self, name: &str, value: impl Display) -> Self {
        self.push_name(name);
        self.key.push('=');
        let mut rendered = String::new();
        // Writing to a String cannot fail
        let _ = write!(rendered, "{}", value);
        escape_into(&mut self.key, &rendered);
        self
    }

    /// Appends `field=value` when set, or the bare `field` when unset.
    pub fn optional(mut self, name: &str, value: Option<impl Display>) -> Self {
        match value {
            Some(value) => self.field(name, value),
            None => {
                self.push_name(name);
                self
            }
        }
    }

    /// Appends every `(field, value)` pair in order.
    pub fn fields<'a>(self, pairs: impl IntoIterator<Item = (&'a str, Option<String>)>) -> Self {
        pairs
            .into_iter()
            .fold(self, |key, (name, value)| key.optional(name, value))
    }

    pub fn build(self) -> String {
        self.key
    }

    fn push_name(&mut self, name: &str) {
        if !self.key.ends_with(':') {
            self.key.push(':');
        }
        escape_into(&mut self.key, name);
    }
}

/// Key for a single record.
pub fn entity_key(resource: &str, id: impl Display) -> String {
    CacheKey::new(resource, ENTITY_OP).field("id", id).build()
}

/// Prefix shared by every list/page key of `resource`.
pub fn list_prefix(resource: &str) -> String {
    CacheKey::new(resource, LIST_OP).build()
}

fn escape_into(out: &mut String, raw: &str) {
    for ch in raw.chars() {
        match ch {
            '%' => out.push_str("%25"),
            ':' => out.push_str("%3A"),
            '=' => out.push_str("%3D"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_key() {
        assert_eq!(entity_key("auction", 42), "auction:id:id=42");
    }

    #[test]
    fn test_list_key_shape() {
        let key = CacheKey::new("auction", LIST_OP)
            .field("page", 2)
            .field("size", 10)
            .optional("status", Some("active"))
            .optional("seller", None::<&str>)
            .build();

        assert_eq!(key, "auction:list:page=2:size=10:status=active:seller");
        assert!(key.starts_with(&list_prefix("auction")));
    }

    #[test]
    fn test_unset_differs_from_empty() {
        let unset = CacheKey::new("auction", LIST_OP)
            .optional("seller", None::<&str>)
            .build();
        let empty = CacheKey::new("auction", LIST_OP)
            .optional("seller", Some(""))
            .build();

        assert_ne!(unset, empty);
    }

    #[test]
    fn test_separators_in_values_cannot_collide() {
        // Without escaping both would read "seller=a:status=b"
        let injected = CacheKey::new("auction", LIST_OP)
            .optional("seller", Some("a:status=b"))
            .optional("status", None::<&str>)
            .build();
        let honest = CacheKey::new("auction", LIST_OP)
            .optional("seller", Some("a"))
            .optional("status", Some("b"))
            .build();

        assert_ne!(injected, honest);
        assert!(injected.contains("a%3Astatus%3Db"));
    }

    #[test]
    fn test_fields_preserves_order() {
        let key = CacheKey::new("review", LIST_OP)
            .fields(vec![
                ("page", Some("1".to_string())),
                ("minRating", None),
            ])
            .build();

        assert_eq!(key, "review:list:page=1:minRating");
    }
}
