//! Domain entities: core data structures

use std::borrow::Borrow;
use std::fmt;

use regex::Regex;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::error::{DomainError, DomainResult};

/// Resource type used in parent references unless configured otherwise.
pub const DEFAULT_RESOURCE_TYPE: &str = "Location";

/// Opaque location identifier, usually a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(String);

impl LocationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LocationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for LocationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for LocationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for LocationId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Structured reference to another resource, e.g. `{ "reference": "Location/<id>" }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Reference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            display: None,
        }
    }
}

/// A node of the location hierarchy.
///
/// Fields other than `resourceType`, `id`, `name` and `partOf` are kept in
/// `extra` so a record serializes back to what was loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    pub id: LocationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of: Option<Reference>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LocationRecord {
    /// Root record without parent.
    pub fn new(id: impl Into<LocationId>) -> Self {
        Self {
            resource_type: Some(DEFAULT_RESOURCE_TYPE.to_string()),
            id: id.into(),
            name: None,
            part_of: None,
            extra: Map::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Link to a parent using the default `Location/<id>` reference form.
    pub fn with_parent(self, parent: &str) -> Self {
        self.with_reference(format!("{}/{}", DEFAULT_RESOURCE_TYPE, parent))
    }

    /// Set the raw `partOf.reference`, malformed values included.
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.part_of = Some(Reference::new(reference));
        self
    }

    /// `id (name)` when a name is present, `id` otherwise.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("{} ({})", self.id, name),
            None => self.id.to_string(),
        }
    }
}

impl fmt::Display for LocationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Extracts parent ids from `<ResourceType>/<id>` references.
#[derive(Debug, Clone)]
pub struct ReferenceParser {
    resource_type: String,
    pattern: Regex,
}

impl Default for ReferenceParser {
    fn default() -> Self {
        Self {
            resource_type: DEFAULT_RESOURCE_TYPE.to_string(),
            pattern: Regex::new(r"^Location/([^/\s]+)$").unwrap(),
        }
    }
}

impl ReferenceParser {
    pub fn new(resource_type: &str) -> DomainResult<Self> {
        let resource_type = resource_type.trim();
        if resource_type.is_empty()
            || resource_type.contains('/')
            || resource_type.contains(char::is_whitespace)
        {
            return Err(DomainError::InvalidResourceType(resource_type.to_string()));
        }
        let pattern = Regex::new(&format!(r"^{}/([^/\s]+)$", regex::escape(resource_type)))
            .map_err(|_| DomainError::InvalidResourceType(resource_type.to_string()))?;
        Ok(Self {
            resource_type: resource_type.to_string(),
            pattern,
        })
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Parent id carried by a reference, `None` when absent or malformed.
    pub fn parent_id<'a>(&self, reference: &'a Reference) -> Option<&'a str> {
        let reference = reference.reference.as_deref()?;
        self.pattern
            .captures(reference)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    pub fn parent_of<'a>(&self, record: &'a LocationRecord) -> Option<&'a str> {
        record.part_of.as_ref().and_then(|r| self.parent_id(r))
    }

    /// Whether a resource of this type holds location records.
    ///
    /// Resources without `resourceType` are accepted as well.
    pub fn accepts(&self, resource_type: Option<&str>) -> bool {
        resource_type.map_or(true, |t| t == self.resource_type)
    }
}

/// `resourceType` marking a FHIR bundle document.
pub const BUNDLE_RESOURCE_TYPE: &str = "Bundle";

fn resource_type_of(resource: &Value) -> Option<&str> {
    resource.get("resourceType").and_then(Value::as_str)
}

/// A JSON document holding location resources.
///
/// The document kind is read from its shape and `resourceType`: an array of
/// resources, a `Bundle`, or a single resource. Resources stay raw JSON until
/// [`LocationDocument::into_records`] filters and parses them.
#[derive(Debug, Clone)]
pub enum LocationDocument {
    Records(Vec<Value>),
    Bundle(Bundle),
    Single(Value),
}

impl<'de> Deserialize<'de> for LocationDocument {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Array(resources) => Ok(LocationDocument::Records(resources)),
            value @ Value::Object(_) => {
                if resource_type_of(&value) == Some(BUNDLE_RESOURCE_TYPE) {
                    Bundle::deserialize(value)
                        .map(LocationDocument::Bundle)
                        .map_err(de::Error::custom)
                } else {
                    Ok(LocationDocument::Single(value))
                }
            }
            _ => Err(de::Error::custom(
                "expected a location resource, an array of resources or a Bundle",
            )),
        }
    }
}

/// FHIR bundle; only `entry[].resource` is read.
#[derive(Debug, Clone, Deserialize)]
pub struct Bundle {
    #[serde(default)]
    pub entry: Vec<BundleEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BundleEntry {
    #[serde(default)]
    pub resource: Option<Value>,
}

impl LocationDocument {
    /// Parse the accepted resources into records, skipping other resource types.
    ///
    /// Parse errors name the position of the failing resource in the document.
    pub fn into_records(self, parser: &ReferenceParser) -> serde_json::Result<Vec<LocationRecord>> {
        let resources = match self {
            LocationDocument::Records(resources) => resources,
            LocationDocument::Bundle(bundle) => {
                bundle.entry.into_iter().filter_map(|e| e.resource).collect()
            }
            LocationDocument::Single(resource) => vec![resource],
        };

        let mut records = Vec::with_capacity(resources.len());
        for (position, resource) in resources.into_iter().enumerate() {
            if !parser.accepts(resource_type_of(&resource)) {
                continue;
            }
            let record = serde_json::from_value(resource).map_err(|e| {
                <serde_json::Error as de::Error>::custom(format!("resource {}: {}", position, e))
            })?;
            records.push(record);
        }
        Ok(records)
    }
}
