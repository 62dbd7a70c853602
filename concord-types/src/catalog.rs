//! Static or admin-authored catalog of merge groups and their source mappings.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::{MergeGroup, SourceMapping};
use crate::error::ConcordError;

/// One merge group together with the sources mapped into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDefinition {
    /// Group definition.
    pub group: MergeGroup,
    /// Source mappings for the group.
    #[serde(default)]
    pub sources: Vec<SourceMapping>,
}

impl GroupDefinition {
    /// Pair a group with its mappings; mappings without a group slug inherit this one.
    #[must_use]
    pub fn new(group: MergeGroup, sources: Vec<SourceMapping>) -> Self {
        let mut def = Self { group, sources };
        def.inherit_group_slug();
        def
    }

    fn inherit_group_slug(&mut self) {
        for m in &mut self.sources {
            if m.group.is_empty() {
                m.group.clone_from(&self.group.slug);
            }
        }
    }

    /// Validate the group and its mappings.
    ///
    /// # Errors
    /// See [`GroupDefinition::validate_parts`].
    pub fn validate(&self) -> Result<(), ConcordError> {
        Self::validate_parts(&self.group, &self.sources)
    }

    /// Validate a group against a set of mappings.
    ///
    /// # Errors
    /// Returns `ConcordError::Configuration` if the group is malformed, any
    /// mapping is malformed or bound to another group, or a source id appears
    /// more than once.
    pub fn validate_parts(group: &MergeGroup, sources: &[SourceMapping]) -> Result<(), ConcordError> {
        group.validate()?;
        let mut seen = HashSet::with_capacity(sources.len());
        for m in sources {
            m.validate(&group.slug)?;
            if !seen.insert(m.source.as_str()) {
                return Err(ConcordError::config(format!(
                    "group {}: source {} is mapped more than once",
                    group.slug, m.source
                )));
            }
        }
        Ok(())
    }
}

/// Collection of group definitions, keyed by slug.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupCatalog {
    /// Group definitions in declaration order.
    pub groups: Vec<GroupDefinition>,
}

impl GroupCatalog {
    /// Parse and validate a catalog from JSON.
    ///
    /// # Errors
    /// Returns `ConcordError::Configuration` if the JSON is malformed (including
    /// unknown enum values) or the catalog fails [`GroupCatalog::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConcordError> {
        let mut catalog: Self = serde_json::from_str(json)?;
        for def in &mut catalog.groups {
            def.inherit_group_slug();
        }
        catalog.validate()?;
        Ok(catalog)
    }

    /// Add a definition, replacing any existing one with the same slug.
    pub fn insert(&mut self, def: GroupDefinition) {
        if let Some(existing) = self
            .groups
            .iter_mut()
            .find(|d| d.group.slug == def.group.slug)
        {
            *existing = def;
        } else {
            self.groups.push(def);
        }
    }

    /// Look up a definition by slug.
    #[must_use]
    pub fn get(&self, slug: &str) -> Option<&GroupDefinition> {
        self.groups.iter().find(|d| d.group.slug == slug)
    }

    /// Validate every definition and slug uniqueness.
    ///
    /// # Errors
    /// Returns the first `ConcordError::Configuration` encountered.
    pub fn validate(&self) -> Result<(), ConcordError> {
        let mut slugs = HashSet::with_capacity(self.groups.len());
        for def in &self.groups {
            def.validate()?;
            if !slugs.insert(def.group.slug.as_str()) {
                return Err(ConcordError::config(format!(
                    "merge group {} is defined more than once",
                    def.group.slug
                )));
            }
        }
        Ok(())
    }
}
