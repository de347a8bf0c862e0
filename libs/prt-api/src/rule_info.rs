//! # Rule File Metadata
//!
//! Rules, attributes and their annotations as reported by the engine for a
//! compiled rule file.

use serde::{Deserialize, Serialize};

/// A single annotation such as `@StartRule` or `@Hidden`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Metadata of one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleInfo {
    pub name: String,
    /// Names of the rule parameters; start rules take none.
    pub parameters: Vec<String>,
    pub annotations: Vec<Annotation>,
}

impl RuleInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.parameters.push(parameter.into());
        self
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(Annotation::new(annotation));
        self
    }

    /// Returns true if an annotation with this name is attached.
    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a.name == name)
    }
}

/// Metadata of one rule attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeInfo {
    pub name: String,
    pub annotations: Vec<Annotation>,
}

impl AttributeInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotations: Vec::new(),
        }
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(Annotation::new(annotation));
        self
    }

    /// Returns true if an annotation with this name is attached.
    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a.name == name)
    }
}

/// Rules and attributes of a compiled rule file.
///
/// # Example
///
/// ```rust
/// use prt_api::{AttributeInfo, RuleFileInfo, RuleInfo};
///
/// let info = RuleFileInfo {
///     rules: vec![RuleInfo::new("Default$Lot").with_annotation("@StartRule")],
///     attributes: vec![AttributeInfo::new("Default$height")],
/// };
/// assert_eq!(info.rules.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFileInfo {
    pub rules: Vec<RuleInfo>,
    pub attributes: Vec<AttributeInfo>,
}
