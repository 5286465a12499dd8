use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global string interner for node and shape ids.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Source of fresh id suffixes. Shared by every prefix so an id is never
/// handed out twice within a process, even across regenerations.
static COUNTER: AtomicU64 = AtomicU64::new(0);

/// An interned identifier for diagram nodes and the canvas shapes that
/// render them. 4 bytes, Copy, Eq and Hash in O(1).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Spur);

/// Shapes are addressed with the same id type as nodes: the hub and spoke
/// labels reuse their node's id, connectors and the ring get their own.
pub type ShapeId = NodeId;

impl NodeId {
    /// Intern a string as a NodeId, or return the existing one.
    pub fn intern(s: &str) -> Self {
        NodeId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Generate a fresh id with a role prefix (e.g. `hub_0`, `spoke_3`).
    /// Names already interned elsewhere (say, a host shape called `hub_7`)
    /// are skipped, so the result is always new.
    ///
    /// Interned strings live for the whole process: every regeneration adds
    /// `2 + 2n` short names, so memory grows with the number of redraws.
    pub fn with_prefix(prefix: &str) -> Self {
        loop {
            let n = COUNTER.fetch_add(1, Ordering::Relaxed);
            let name = format!("{prefix}_{n}");
            if INTERNER.get(name.as_str()).is_none() {
                return Self::intern(&name);
            }
        }
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.as_str())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(NodeId::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = NodeId::intern("hub_42");
        let b = NodeId::intern("hub_42");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "hub_42");
    }

    #[test]
    fn prefixed_ids_are_never_reused() {
        let a = NodeId::with_prefix("spoke");
        let b = NodeId::with_prefix("spoke");
        let c = NodeId::with_prefix("hub");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("spoke_"));
        assert!(c.as_str().starts_with("hub_"));
    }

    #[test]
    fn prefixed_ids_skip_names_taken_by_intern() {
        let next = COUNTER.load(Ordering::Relaxed);
        let taken: Vec<NodeId> = (next..next + 64)
            .map(|n| NodeId::intern(&format!("taken_{n}")))
            .collect();
        let fresh = NodeId::with_prefix("taken");
        assert!(!taken.contains(&fresh), "{fresh:?} was already interned");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = NodeId::intern("link_7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"link_7\"");
        let back: NodeId = serde_json::from_str("\"link_7\"").unwrap();
        assert_eq!(back, id);
    }
}
