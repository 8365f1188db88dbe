//! Mapping pointer hits to interactive regions.
//!
//! The renderer reports the chain of node names from the hit node up to the
//! scene root; the first name that carries a region id wins.

use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};

/// Identifier of the content an interactive region opens (a video index).
pub type ContentId = u32;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionDef {
    pub name: String,
    pub content: ContentId,
}

#[derive(Clone, Debug, Default)]
pub struct InteractiveRegions {
    by_name: FnvHashMap<String, ContentId>,
}

impl InteractiveRegions {
    pub fn new(defs: &[RegionDef]) -> Self {
        Self {
            by_name: defs.iter().map(|d| (d.name.clone(), d.content)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Look up a single node name. Zero-padded numbered names (`P05`) match
    /// their unpadded registration (`P5`).
    pub fn lookup(&self, name: &str) -> Option<ContentId> {
        if let Some(id) = self.by_name.get(name) {
            return Some(*id);
        }
        let split = name.find(|c: char| c.is_ascii_digit())?;
        let (prefix, digits) = name.split_at(split);
        if !digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            return None;
        }
        self.by_name.get(&format!("{prefix}{trimmed}")).copied()
    }

    /// Walk from the hit node toward the root and return the nearest region.
    pub fn resolve<'a, I>(&self, ancestry: I) -> Option<ContentId>
    where
        I: IntoIterator<Item = &'a str>,
    {
        ancestry.into_iter().find_map(|name| self.lookup(name))
    }
}
