//! Element-name rules
//!
//! Maps XML local names to the role they play for the rewriter. Built once
//! per run from [`RulesConfig`] and shared by every document.

use crate::config::RulesConfig;
use std::collections::{HashMap, HashSet};

/// What an element means to the rewriter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementRole {
    /// Carries the identifier type (`EGN`, `LNCH`, ...)
    IdentifierType,
    /// Carries the raw identifier value
    IdentifierValue,
    /// Passport block, removed entirely
    Passport,
    /// Address block
    Address,
    /// Element whose nested addresses are personal
    AddressParent,
    /// Free-text element removed entirely
    Ignored,
    /// Delimits one person's identifier record
    Person,
    /// Anything else
    Other,
}

impl ElementRole {
    /// Whether the element's own tags are suppressed along with its content
    pub fn hides_self(self) -> bool {
        matches!(self, ElementRole::Passport | ElementRole::Ignored)
    }
}

/// Lookup tables built from [`RulesConfig`]
#[derive(Debug, Clone)]
pub struct ElementRules {
    roles: HashMap<Vec<u8>, ElementRole>,
    stripped_attributes: HashSet<Vec<u8>>,
    identifier_output_element: String,
    keep_identifier_type: bool,
}

impl ElementRules {
    /// Builds the lookup tables
    ///
    /// Roles are assumed disjoint (checked by config validation); if a name is
    /// listed twice the later role wins.
    pub fn from_config(config: &RulesConfig) -> Self {
        let mut roles = HashMap::new();
        let assignments = [
            (&config.identifier_type_elements, ElementRole::IdentifierType),
            (&config.identifier_value_elements, ElementRole::IdentifierValue),
            (&config.passport_elements, ElementRole::Passport),
            (&config.address_elements, ElementRole::Address),
            (&config.address_parent_elements, ElementRole::AddressParent),
            (&config.ignored_elements, ElementRole::Ignored),
            (&config.person_elements, ElementRole::Person),
        ];
        for (names, role) in assignments {
            for name in names {
                roles.insert(name.as_bytes().to_vec(), role);
            }
        }

        Self {
            roles,
            stripped_attributes: config
                .stripped_attributes
                .iter()
                .map(|a| a.as_bytes().to_vec())
                .collect(),
            identifier_output_element: config.identifier_output_element.clone(),
            keep_identifier_type: config.keep_identifier_type,
        }
    }

    /// Role of the element with the given local name
    pub fn role(&self, local_name: &[u8]) -> ElementRole {
        self.roles
            .get(local_name)
            .copied()
            .unwrap_or(ElementRole::Other)
    }

    /// Whether an attribute with the given local name is removed
    pub fn is_stripped_attribute(&self, local_name: &[u8]) -> bool {
        self.stripped_attributes.contains(local_name)
    }

    /// Local name of the replacement identifier element
    pub fn identifier_output_element(&self) -> &str {
        &self.identifier_output_element
    }

    /// Whether identifier-type elements are written to the output
    pub fn keeps_identifier_type(&self) -> bool {
        self.keep_identifier_type
    }

    /// Whether the element's own tags are suppressed along with its content
    pub fn hides_self(&self, role: ElementRole) -> bool {
        role.hides_self() || (role == ElementRole::IdentifierType && !self.keep_identifier_type)
    }
}

impl Default for ElementRules {
    fn default() -> Self {
        Self::from_config(&RulesConfig::default())
    }
}
