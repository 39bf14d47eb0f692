//! Account registry: the ordered set of tracked usernames
//!
//! Usernames keep insertion order, compare by exact string equality, and are
//! only removed through the sync engine's singleton-batch pruning rule.

use serde::{Deserialize, Serialize};

/// Outcome of an add attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// Name (trimmed) was appended; the caller should sync it
    Added(String),
    /// Trimmed name was empty; nothing changed
    Empty,
    /// Exact name is already tracked; nothing changed
    AlreadyExists(String),
}

/// Ordered set of tracked usernames
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccountRegistry {
    usernames: Vec<String>,
}

impl AccountRegistry {
    /// Create a registry seeded with the given usernames
    ///
    /// Seeds are taken as-is (they come from config, not user input);
    /// duplicates among seeds are dropped, order of first occurrence wins.
    pub fn new(seeds: &[String]) -> Self {
        let mut registry = Self::default();
        for seed in seeds {
            if !registry.contains(seed) {
                registry.usernames.push(seed.clone());
            }
        }
        registry
    }

    /// Add a username from user input
    ///
    /// Trims surrounding whitespace and rejects empty or duplicate names
    /// without mutating the registry.
    pub fn add(&mut self, name: &str) -> AddOutcome {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return AddOutcome::Empty;
        }
        if self.contains(trimmed) {
            return AddOutcome::AlreadyExists(trimmed.to_string());
        }

        self.usernames.push(trimmed.to_string());
        AddOutcome::Added(trimmed.to_string())
    }

    /// Remove a username; returns whether it was present
    ///
    /// Only the sync engine calls this, and only after a singleton batch
    /// confirmed the account has zero submissions.
    pub fn prune(&mut self, name: &str) -> bool {
        let before = self.usernames.len();
        self.usernames.retain(|u| u != name);
        self.usernames.len() != before
    }

    /// Exact-match membership check
    pub fn contains(&self, name: &str) -> bool {
        self.usernames.iter().any(|u| u == name)
    }

    /// Tracked usernames in insertion order
    pub fn usernames(&self) -> &[String] {
        &self.usernames
    }

    pub fn len(&self) -> usize {
        self.usernames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.usernames.is_empty()
    }
}
