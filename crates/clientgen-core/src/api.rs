//! Normalized API description consumed by the generator.
//!
//! These types are the hand-off point from the OpenAPI parser,
//! which lives outside this workspace. The generator treats them as
//! read-only input.
//!
//! # Examples
//!
//! ```
//! use clientgen_core::{ApiDescription, CrudAction};
//!
//! let api = ApiDescription::from_json_str(
//!     r#"{
//!         "entities": [
//!             {"name": "Pet", "fields": [{"name": "id", "schema": {"type": "long"}}]}
//!         ],
//!         "operations": [
//!             {
//!                 "name": "getPetById",
//!                 "verb": "GET",
//!                 "path": "/pet/{petId}",
//!                 "entity": "Pet",
//!                 "parameters": [
//!                     {"name": "petId", "in": "path", "schema": {"type": "long"}, "required": true}
//!                 ],
//!                 "returns": {"type": "ref", "name": "Pet"}
//!             }
//!         ]
//!     }"#,
//! )
//! .unwrap();
//!
//! assert_eq!(api.operations[0].action(), CrudAction::Read);
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP method of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl HttpVerb {
    /// Returns the upper-case method name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a parameter is carried in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// URI template variable
    Path,
    /// Query string
    Query,
    /// Request header
    Header,
    /// JSON request body
    Body,
    /// Form field (urlencoded or multipart)
    Form,
}

/// Schema type of a field or parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    /// 32-bit integer
    Integer,
    /// 64-bit integer
    Long,
    /// Floating point number
    Number,
    /// UTF-8 string
    String,
    /// Boolean
    Boolean,
    /// Ordered list of items
    Array {
        /// Item type
        items: Box<FieldType>,
    },
    /// Reference to another entity
    Ref {
        /// Referenced entity name
        name: String,
    },
    /// Uploaded file content
    File,
}

impl FieldType {
    /// Returns the entity referenced by this type, looking through arrays.
    ///
    /// # Examples
    ///
    /// ```
    /// use clientgen_core::FieldType;
    ///
    /// let tags = FieldType::Array {
    ///     items: Box::new(FieldType::Ref { name: "Tag".to_string() }),
    /// };
    /// assert_eq!(tags.referenced_entity(), Some("Tag"));
    /// assert_eq!(FieldType::String.referenced_entity(), None);
    /// ```
    #[must_use]
    pub fn referenced_entity(&self) -> Option<&str> {
        match self {
            Self::Ref { name } => Some(name),
            Self::Array { items } => items.referenced_entity(),
            _ => None,
        }
    }

    /// Returns `true` for file content, looking through arrays.
    #[must_use]
    pub fn is_file(&self) -> bool {
        match self {
            Self::File => true,
            Self::Array { items } => items.is_file(),
            _ => false,
        }
    }
}

/// One request parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Wire name
    pub name: String,
    /// Location in the request
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// Value type
    pub schema: FieldType,
    /// Whether the parameter is mandatory
    #[serde(default)]
    pub required: bool,
}

/// Documented error response of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status code
    pub status: u16,
    /// Human-readable meaning
    #[serde(default)]
    pub description: String,
}

/// Role an operation plays for its entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrudAction {
    /// Creates a new entity
    Create,
    /// Reads one entity by id
    Read,
    /// Replaces an entity
    UpdateFull,
    /// Updates some fields of an entity
    UpdatePartial,
    /// Deletes an entity by id
    Delete,
    /// Uploads a file attached to an entity
    Upload,
    /// Anything else (searches, listings)
    Query,
}

impl CrudAction {
    /// Returns the kebab-case name used in template requirements.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::UpdateFull => "update-full",
            Self::UpdatePartial => "update-partial",
            Self::Delete => "delete",
            Self::Upload => "upload",
            Self::Query => "query",
        }
    }
}

impl fmt::Display for CrudAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One API operation as delivered by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSpec {
    /// Operation id, used as the generated method name
    pub name: String,
    /// HTTP method
    pub verb: HttpVerb,
    /// URI template
    pub path: String,
    /// Entity the operation belongs to
    pub entity: String,
    /// Short description
    #[serde(default)]
    pub summary: Option<String>,
    /// Request parameters in declaration order
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
    /// Success response body type; `None` means no body
    #[serde(default)]
    pub returns: Option<FieldType>,
    /// Documented error responses
    #[serde(default)]
    pub errors: Vec<ErrorResponse>,
    /// Explicit role; inferred from verb and parameters when absent
    #[serde(default)]
    pub action: Option<CrudAction>,
}

impl OperationSpec {
    /// Returns the role of this operation.
    ///
    /// An explicit `action` wins. Otherwise: any file parameter means upload,
    /// POST without path parameters creates, GET with a path parameter reads,
    /// PUT replaces, PATCH (or POST with a path parameter and form fields)
    /// updates partially, DELETE deletes, and everything else is a query.
    #[must_use]
    pub fn action(&self) -> CrudAction {
        if let Some(action) = self.action {
            return action;
        }
        if self.is_multipart() {
            return CrudAction::Upload;
        }

        let has_path = self.has_location(ParameterLocation::Path);
        let has_form = self.has_location(ParameterLocation::Form);

        match self.verb {
            HttpVerb::Post if !has_path => CrudAction::Create,
            HttpVerb::Post if has_form => CrudAction::UpdatePartial,
            HttpVerb::Get if has_path => CrudAction::Read,
            HttpVerb::Put => CrudAction::UpdateFull,
            HttpVerb::Patch => CrudAction::UpdatePartial,
            HttpVerb::Delete => CrudAction::Delete,
            _ => CrudAction::Query,
        }
    }

    /// Returns `true` if any parameter carries file content.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.parameters.iter().any(|p| p.schema.is_file())
    }

    fn has_location(&self, location: ParameterLocation) -> bool {
        self.parameters.iter().any(|p| p.location == location)
    }
}

/// One field of an entity schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name (camelCase)
    pub name: String,
    /// Field type
    pub schema: FieldType,
    /// Whether the field is mandatory
    #[serde(default)]
    pub required: bool,
}

/// Schema of one entity (model class).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySchema {
    /// Entity name (PascalCase)
    pub name: String,
    /// Fields in declaration order
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl EntitySchema {
    /// Returns the field named `id`, if any.
    #[must_use]
    pub fn id_field(&self) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == "id")
    }
}

/// The normalized API description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiDescription {
    /// Entity schemas in declaration order
    #[serde(default)]
    pub entities: Vec<EntitySchema>,
    /// Operations in declaration order
    #[serde(default)]
    pub operations: Vec<OperationSpec>,
}

impl ApiDescription {
    /// Parses a description from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SerializationError`] if the JSON does not match.
    pub fn from_json_str(source: &str) -> Result<Self> {
        serde_json::from_str(source).map_err(|e| Error::SerializationError {
            message: format!("Failed to parse API description: {e}"),
            source: Some(e),
        })
    }

    /// Looks up an entity schema by name.
    #[must_use]
    pub fn entity(&self, name: &str) -> Option<&EntitySchema> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Iterates the operations that belong to an entity, in order.
    pub fn operations_for<'a>(&'a self, entity: &'a str) -> impl Iterator<Item = &'a OperationSpec> {
        self.operations.iter().filter(move |op| op.entity == entity)
    }
}
