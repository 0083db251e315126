use std::fmt;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// Name of the section that receives assignments made before any `[section]` header.
pub const GLOBAL_SECTION: &str = "global";

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        if let Value::Array(items) = self {
            Some(items)
        } else {
            None
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        if let Value::Object(items) = self {
            Some(items)
        } else {
            None
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short name of the variant, used in conversion errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

/// Renders the value back into literal syntax, so that scalars re-coerce to the same variant.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => {
                let text = n.to_string();
                if text.contains('.') {
                    write!(f, "{}", text)
                } else {
                    write!(f, "{}.0", text)
                }
            }
            Value::String(s) => write!(f, "\"{}\"", s.replace('"', "\\\"")),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Object(items) => {
                write!(f, "{{")?;
                for (i, (key, item)) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, item)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(items) => {
                let mut map = serializer.serialize_map(Some(items.len()))?;
                for (key, item) in items {
                    map.serialize_entry(key, item)?;
                }
                map.end()
            }
        }
    }
}

pub type Section = IndexMap<String, Value>;

/// A parsed document-dialect file: section name -> key -> value.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub sections: IndexMap<String, Section>,
}

impl Document {
    /// An empty document holding only the `global` section.
    pub fn new() -> Self {
        let mut sections = IndexMap::new();
        sections.insert(GLOBAL_SECTION.to_string(), Section::new());
        Self { sections }
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    pub fn value(&self, section: &str, key: &str) -> Option<&Value> {
        self.sections.get(section).and_then(|s| s.get(key))
    }

    pub fn section_names(&self) -> Vec<&str> {
        self.sections.keys().map(|k| k.as_str()).collect()
    }

    pub(crate) fn section_mut(&mut self, name: &str) -> &mut Section {
        self.sections.entry(name.to_string()).or_default()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for (name, section) in &self.sections {
            map.serialize_entry(name, section)?;
        }
        map.end()
    }
}

// --- schema dialect ---

/// A constraint annotation on a field: `required` or `min(0)`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Modifier {
    Flag(String),
    Call { name: String, params: String },
}

impl Modifier {
    pub fn name(&self) -> &str {
        match self {
            Modifier::Flag(name) => name,
            Modifier::Call { name, .. } => name,
        }
    }
}

/// Structure recovered from a field's type token beyond its raw text.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldShape {
    Scalar,
    Object {
        fields: IndexMap<String, String>,
    },
    Array {
        item_type: String,
        options: IndexMap<String, Value>,
    },
    Enum {
        values: Vec<Value>,
    },
    Relation {
        target: String,
        options: IndexMap<String, Value>,
    },
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct FieldDeclaration {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub modifiers: Vec<Modifier>,
    pub shape: FieldShape,
    #[serde(skip)]
    pub line: usize,
}

impl FieldDeclaration {
    pub fn has_modifier(&self, name: &str) -> bool {
        self.modifiers.iter().any(|m| m.name() == name)
    }
}

pub type IndexDefinition = IndexMap<String, Value>;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Permission {
    Roles(Vec<String>),
    /// `{...}` kept verbatim; conditional permissions are not decomposed.
    Conditional(String),
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ValidationRule {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip)]
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum SchemaSection {
    Object(Vec<FieldDeclaration>),
    Indexes(IndexMap<String, IndexDefinition>),
    Permissions(IndexMap<String, Permission>),
    Validations(Vec<ValidationRule>),
    Generic(IndexMap<String, Value>),
}

impl SchemaSection {
    pub fn as_fields(&self) -> Option<&Vec<FieldDeclaration>> {
        if let SchemaSection::Object(fields) = self {
            Some(fields)
        } else {
            None
        }
    }

    pub fn as_indexes(&self) -> Option<&IndexMap<String, IndexDefinition>> {
        if let SchemaSection::Indexes(indexes) = self {
            Some(indexes)
        } else {
            None
        }
    }

    pub fn as_permissions(&self) -> Option<&IndexMap<String, Permission>> {
        if let SchemaSection::Permissions(permissions) = self {
            Some(permissions)
        } else {
            None
        }
    }

    pub fn as_validations(&self) -> Option<&Vec<ValidationRule>> {
        if let SchemaSection::Validations(rules) = self {
            Some(rules)
        } else {
            None
        }
    }

    pub fn as_generic(&self) -> Option<&IndexMap<String, Value>> {
        if let SchemaSection::Generic(entries) = self {
            Some(entries)
        } else {
            None
        }
    }
}

/// A parsed schema-dialect file: section name -> section contents, in file order.
pub type SchemaMap = IndexMap<String, SchemaSection>;
