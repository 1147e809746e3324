//! Source column to target field assignment.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Partial function from source column name to target field id.
///
/// No target id appears more than once as a value. The invariant holds by
/// construction: every mutation goes through [`Mapping::assign`] or
/// [`Mapping::remove`], which keep the forward and reverse indexes in sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    by_source: BTreeMap<String, String>,
    by_target: BTreeMap<String, String>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point `source` at `target`.
    ///
    /// A different source previously pointing at `target` is unmapped first
    /// and returned. A previous target of `source` is released.
    pub fn assign(&mut self, source: impl Into<String>, target: impl Into<String>) -> Option<String> {
        let source = source.into();
        let target = target.into();

        let displaced = match self.by_target.get(&target) {
            Some(owner) if *owner != source => Some(owner.clone()),
            _ => None,
        };
        if let Some(owner) = &displaced {
            self.by_source.remove(owner);
        }
        if let Some(previous) = self.by_source.insert(source.clone(), target.clone()) {
            self.by_target.remove(&previous);
        }
        self.by_target.insert(target, source);
        displaced
    }

    /// Remove the entry for `source`, returning its target if it was mapped.
    pub fn remove(&mut self, source: &str) -> Option<String> {
        let target = self.by_source.remove(source)?;
        self.by_target.remove(&target);
        Some(target)
    }

    pub fn clear(&mut self) {
        self.by_source.clear();
        self.by_target.clear();
    }

    pub fn target_for(&self, source: &str) -> Option<&str> {
        self.by_source.get(source).map(String::as_str)
    }

    pub fn source_for(&self, target: &str) -> Option<&str> {
        self.by_target.get(target).map(String::as_str)
    }

    pub fn is_source_mapped(&self, source: &str) -> bool {
        self.by_source.contains_key(source)
    }

    pub fn is_target_mapped(&self, target: &str) -> bool {
        self.by_target.contains_key(target)
    }

    /// Entries as `(source, target)`, ordered by source name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_source
            .iter()
            .map(|(source, target)| (source.as_str(), target.as_str()))
    }

    pub fn len(&self) -> usize {
        self.by_source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_source.is_empty()
    }

    pub fn to_config(&self) -> MappingConfig {
        MappingConfig {
            entries: self.by_source.clone(),
        }
    }
}

impl TryFrom<MappingConfig> for Mapping {
    type Error = ModelError;

    fn try_from(config: MappingConfig) -> Result<Self, Self::Error> {
        let mut mapping = Mapping::new();
        for (source, target) in config.entries {
            if source.trim().is_empty() {
                return Err(ModelError::InvalidColumnName(source));
            }
            if target.trim().is_empty() {
                return Err(ModelError::InvalidFieldId(target));
            }
            if let Some(first) = mapping.source_for(&target) {
                return Err(ModelError::DuplicateTarget {
                    first: first.to_string(),
                    second: source,
                    target,
                });
            }
            mapping.assign(source, target);
        }
        Ok(mapping)
    }
}

impl Serialize for Mapping {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.by_source.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Mapping {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let config = MappingConfig::deserialize(deserializer)?;
        Mapping::try_from(config).map_err(serde::de::Error::custom)
    }
}

/// Unchecked mapping entries as supplied from outside (e.g. a saved file).
///
/// Unlike [`Mapping`] this may point several sources at one target; the
/// validator reports such entries as duplicate mappings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingConfig {
    pub entries: BTreeMap<String, String>,
}

impl MappingConfig {
    /// Targets claimed by more than one source, with the claiming sources.
    pub fn duplicate_targets(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut claims: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (source, target) in &self.entries {
            claims.entry(target.as_str()).or_default().push(source.as_str());
        }
        claims.retain(|_, sources| sources.len() > 1);
        claims
    }
}

impl FromIterator<(String, String)> for MappingConfig {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
