//! Action name normalization.
//!
//! Scripts name actions loosely ("Chop", "pick up", "watering"). The
//! [`ActionAliases`] resource maps those free-form strings onto the canonical
//! [`ActionName`] used as the base of layout lookups. Anything unrecognized
//! normalizes to `idle`.

use bevy_ecs::prelude::Resource;
use log::debug;
use rustc_hash::FxHashMap;

use crate::components::animationstate::ActionName;

/// Stock synonym table: (alias, canonical action).
const STOCK_ALIASES: &[(&str, &str)] = &[
    ("idle", "idle"),
    ("walk", "walk"),
    ("run", "run"),
    ("pickup", "pickup"),
    ("pick up", "pickup"),
    ("pick-up", "pickup"),
    ("pick", "pickup"),
    ("pickaxe", "pickaxe"),
    ("pick axe", "pickaxe"),
    ("mining", "pickaxe"),
    ("axe_chop", "axe_chop"),
    ("chop", "axe_chop"),
    ("chopping", "axe_chop"),
    ("plant", "plant"),
    ("sow", "plant"),
    ("seed", "plant"),
    ("water", "water"),
    ("watering", "water"),
    ("reap", "reap"),
    ("scythe", "reap"),
    ("axe_strike", "axe_strike"),
    ("hoe", "hoe"),
];

/// Case-insensitive synonym table for action names.
#[derive(Resource, Debug, Clone)]
pub struct ActionAliases {
    map: FxHashMap<String, ActionName>,
}

impl Default for ActionAliases {
    fn default() -> Self {
        let mut aliases = Self {
            map: FxHashMap::default(),
        };
        for (alias, canonical) in STOCK_ALIASES {
            aliases.insert(alias, canonical);
        }
        aliases
    }
}

impl ActionAliases {
    /// Register `alias` for `canonical`. The canonical name maps to itself too.
    pub fn insert(&mut self, alias: &str, canonical: &str) {
        let canonical = canonical.trim().to_ascii_lowercase();
        self.map
            .entry(canonical.clone())
            .or_insert_with(|| ActionName::new(canonical.clone()));
        self.map
            .insert(alias.trim().to_ascii_lowercase(), ActionName::new(canonical));
    }

    /// Canonical action for a free-form name, `idle` when unknown.
    pub fn normalize(&self, raw: &str) -> ActionName {
        let key = raw.trim().to_ascii_lowercase();
        match self.map.get(&key) {
            Some(action) => action.clone(),
            None => {
                debug!("Unknown action '{}', using idle", raw);
                ActionName::idle()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synonyms_normalize() {
        let aliases = ActionAliases::default();
        assert_eq!(aliases.normalize("Chop").as_str(), "axe_chop");
        assert_eq!(aliases.normalize("sow").as_str(), "plant");
        assert_eq!(aliases.normalize("  Pick Up ").as_str(), "pickup");
        assert_eq!(aliases.normalize("WATERING").as_str(), "water");
    }

    #[test]
    fn test_unknown_is_idle() {
        let aliases = ActionAliases::default();
        assert!(aliases.normalize("foo").is_idle());
        assert!(aliases.normalize("").is_idle());
    }

    #[test]
    fn test_custom_alias() {
        let mut aliases = ActionAliases::default();
        aliases.insert("Dig", "hoe");
        aliases.insert("boogie", "dance");
        assert_eq!(aliases.normalize("dig").as_str(), "hoe");
        assert_eq!(aliases.normalize("Boogie").as_str(), "dance");
        assert_eq!(aliases.normalize("dance").as_str(), "dance");
    }
}
