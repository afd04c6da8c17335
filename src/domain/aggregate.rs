//! Grouping normalized observations by canonical symbol.

use std::collections::HashMap;

use super::observation::NormalizedObservation;
use super::symbol::Symbol;

/// Observations of one canonical symbol across exchanges, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolGroup {
    symbol: Symbol,
    observations: Vec<NormalizedObservation>,
}

impl SymbolGroup {
    fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            observations: Vec::new(),
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn observations(&self) -> &[NormalizedObservation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Whether the group has enough independent quotes to form a spread.
    pub fn has_spread(&self) -> bool {
        self.observations.len() >= 2
    }

    pub fn into_observations(self) -> Vec<NormalizedObservation> {
        self.observations
    }
}

/// All symbol groups of a poll cycle.
///
/// Groups iterate in the order their symbol was first seen, so downstream
/// stable sorting is deterministic for a given input order.
#[derive(Debug, Clone, Default)]
pub struct SymbolGroups {
    groups: Vec<SymbolGroup>,
    index: HashMap<Symbol, usize>,
}

impl SymbolGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an observation to its symbol's group.
    pub fn push(&mut self, observation: NormalizedObservation) {
        let slot = match self.index.get(&observation.symbol) {
            Some(&slot) => slot,
            None => {
                let slot = self.groups.len();
                self.index.insert(observation.symbol.clone(), slot);
                self.groups.push(SymbolGroup::new(observation.symbol.clone()));
                slot
            }
        };
        self.groups[slot].observations.push(observation);
    }

    pub fn get(&self, symbol: &Symbol) -> Option<&SymbolGroup> {
        self.index.get(symbol).map(|&slot| &self.groups[slot])
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolGroup> {
        self.groups.iter()
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl IntoIterator for SymbolGroups {
    type Item = SymbolGroup;
    type IntoIter = std::vec::IntoIter<SymbolGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

impl FromIterator<NormalizedObservation> for SymbolGroups {
    fn from_iter<I: IntoIterator<Item = NormalizedObservation>>(iter: I) -> Self {
        let mut groups = Self::new();
        for observation in iter {
            groups.push(observation);
        }
        groups
    }
}

/// Group observations by canonical symbol, discarding unrecognized ones.
pub fn group_by_symbol<I>(observations: I) -> SymbolGroups
where
    I: IntoIterator<Item = Option<NormalizedObservation>>,
{
    observations.into_iter().flatten().collect()
}
