//! Core field descriptor types.
//!
//! A descriptor is the metadata of a single form field as delivered by the
//! form definition API. Descriptors serialize to/from JSON or YAML via serde;
//! attributes this crate does not interpret are kept in `extra` so nothing
//! is lost when a descriptor is written back out.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Type tags classified as simple single-value fields.
pub const SIMPLE_VALUE_TYPES: &[&str] = &[
    "SINGLE_LINE_TEXT",
    "MULTI_LINE_TEXT",
    "RICH_TEXT",
    "DATE",
    "NUMBER",
    "DATETIME",
    "TIME",
    "CREATED_TIME",
    "UPDATED_TIME",
    "RECORD_NUMBER",
    "DROP_DOWN",
    "LINK",
    "CALC",
    "RADIO_BUTTON",
];

/// Type tags holding a single user reference.
pub const USER_TYPES: &[&str] = &["CREATOR", "MODIFIER"];

/// Type tags holding a list of strings.
pub const STRING_LIST_TYPES: &[&str] = &["CHECK_BOX", "MULTI_SELECT"];

/// Type tags holding a list of users, groups or organizations.
pub const ENTITY_LIST_TYPES: &[&str] = &["USER_SELECT", "GROUP_SELECT", "ORGANIZATION_SELECT"];

/// Type tag of attachment fields.
pub const FILE_TYPE: &str = "FILE";

/// Type tag of table fields, the only fields that carry children.
pub const SUBTABLE_TYPE: &str = "SUBTABLE";

/// The `type` tag of a field descriptor.
///
/// Unrecognized tags are kept verbatim in `Other` so they survive a
/// parse/serialize cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    SingleLineText,
    MultiLineText,
    RichText,
    Date,
    Number,
    Datetime,
    Time,
    CreatedTime,
    UpdatedTime,
    RecordNumber,
    DropDown,
    Link,
    Calc,
    RadioButton,
    Creator,
    Modifier,
    CheckBox,
    MultiSelect,
    UserSelect,
    GroupSelect,
    OrganizationSelect,
    File,
    Subtable,
    Other(String),
}

impl FieldType {
    /// Parse a raw type tag. Never fails: unknown tags become `Other`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "SINGLE_LINE_TEXT" => Self::SingleLineText,
            "MULTI_LINE_TEXT" => Self::MultiLineText,
            "RICH_TEXT" => Self::RichText,
            "DATE" => Self::Date,
            "NUMBER" => Self::Number,
            "DATETIME" => Self::Datetime,
            "TIME" => Self::Time,
            "CREATED_TIME" => Self::CreatedTime,
            "UPDATED_TIME" => Self::UpdatedTime,
            "RECORD_NUMBER" => Self::RecordNumber,
            "DROP_DOWN" => Self::DropDown,
            "LINK" => Self::Link,
            "CALC" => Self::Calc,
            "RADIO_BUTTON" => Self::RadioButton,
            "CREATOR" => Self::Creator,
            "MODIFIER" => Self::Modifier,
            "CHECK_BOX" => Self::CheckBox,
            "MULTI_SELECT" => Self::MultiSelect,
            "USER_SELECT" => Self::UserSelect,
            "GROUP_SELECT" => Self::GroupSelect,
            "ORGANIZATION_SELECT" => Self::OrganizationSelect,
            "FILE" => Self::File,
            "SUBTABLE" => Self::Subtable,
            other => Self::Other(other.to_owned()),
        }
    }

    /// The raw tag as it appears on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            Self::SingleLineText => "SINGLE_LINE_TEXT",
            Self::MultiLineText => "MULTI_LINE_TEXT",
            Self::RichText => "RICH_TEXT",
            Self::Date => "DATE",
            Self::Number => "NUMBER",
            Self::Datetime => "DATETIME",
            Self::Time => "TIME",
            Self::CreatedTime => "CREATED_TIME",
            Self::UpdatedTime => "UPDATED_TIME",
            Self::RecordNumber => "RECORD_NUMBER",
            Self::DropDown => "DROP_DOWN",
            Self::Link => "LINK",
            Self::Calc => "CALC",
            Self::RadioButton => "RADIO_BUTTON",
            Self::Creator => "CREATOR",
            Self::Modifier => "MODIFIER",
            Self::CheckBox => "CHECK_BOX",
            Self::MultiSelect => "MULTI_SELECT",
            Self::UserSelect => "USER_SELECT",
            Self::GroupSelect => "GROUP_SELECT",
            Self::OrganizationSelect => "ORGANIZATION_SELECT",
            Self::File => "FILE",
            Self::Subtable => SUBTABLE_TYPE,
            Self::Other(tag) => tag.as_str(),
        }
    }

    /// The category this type belongs to, or `None` for unrecognized tags.
    pub fn category(&self) -> Option<Category> {
        match self {
            Self::SingleLineText
            | Self::MultiLineText
            | Self::RichText
            | Self::Date
            | Self::Number
            | Self::Datetime
            | Self::Time
            | Self::CreatedTime
            | Self::UpdatedTime
            | Self::RecordNumber
            | Self::DropDown
            | Self::Link
            | Self::Calc
            | Self::RadioButton => Some(Category::Simple),
            Self::Creator | Self::Modifier => Some(Category::User),
            Self::CheckBox | Self::MultiSelect => Some(Category::StringList),
            Self::UserSelect | Self::GroupSelect | Self::OrganizationSelect => {
                Some(Category::EntityList)
            }
            Self::File => Some(Category::File),
            Self::Subtable => Some(Category::Table),
            Self::Other(_) => None,
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self, Self::Subtable)
    }
}

impl From<&str> for FieldType {
    fn from(tag: &str) -> Self {
        Self::from_tag(tag)
    }
}

impl From<String> for FieldType {
    fn from(tag: String) -> Self {
        match Self::from_tag(&tag) {
            Self::Other(_) => Self::Other(tag),
            known => known,
        }
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Other(tag) => tag,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The semantic bucket a field is sorted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Simple,
    User,
    StringList,
    EntityList,
    File,
    Table,
}

impl Category {
    /// Every category, in output order.
    pub const ALL: [Category; 6] = [
        Category::Simple,
        Category::User,
        Category::StringList,
        Category::EntityList,
        Category::File,
        Category::Table,
    ];

    /// The type tags that map to this category.
    pub const fn type_tags(self) -> &'static [&'static str] {
        match self {
            Category::Simple => SIMPLE_VALUE_TYPES,
            Category::User => USER_TYPES,
            Category::StringList => STRING_LIST_TYPES,
            Category::EntityList => ENTITY_LIST_TYPES,
            Category::File => &[FILE_TYPE],
            Category::Table => &[SUBTABLE_TYPE],
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Simple => "simple",
            Category::User => "user",
            Category::StringList => "string-list",
            Category::EntityList => "entity-list",
            Category::File => "file",
            Category::Table => "table",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-table field.
///
/// `field_type` is never `SUBTABLE` when built by deserialization; tables
/// always come out as [`TableField`].
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub code: String,
    pub field_type: FieldType,
    pub label: Option<String>,
    /// Derived/lookup marker. Presence alone excludes the field from
    /// classification, whatever the value.
    pub related_app: Option<Value>,
    pub extra: Map<String, Value>,
}

impl Field {
    pub fn new(code: impl Into<String>, field_type: impl Into<FieldType>) -> Self {
        Self {
            code: code.into(),
            field_type: field_type.into(),
            label: None,
            related_app: None,
            extra: Map::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Mark the field as derived from a linked record.
    pub fn with_related_app(mut self, related_app: Value) -> Self {
        self.related_app = Some(related_app);
        self
    }
}

/// A table field. Its children are keyed by code and keep insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct TableField {
    pub code: String,
    pub label: Option<String>,
    pub related_app: Option<Value>,
    pub fields: IndexMap<String, FieldDescriptor>,
    pub extra: Map<String, Value>,
}

impl TableField {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: None,
            related_app: None,
            fields: IndexMap::new(),
            extra: Map::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_related_app(mut self, related_app: Value) -> Self {
        self.related_app = Some(related_app);
        self
    }

    /// Add a child, keyed by its code. A child with the same code is replaced
    /// in place.
    pub fn with_field(mut self, field: impl Into<FieldDescriptor>) -> Self {
        let field = field.into();
        self.fields.insert(field.code().to_owned(), field);
        self
    }
}

static SUBTABLE: FieldType = FieldType::Subtable;

/// Metadata of one form field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawDescriptor")]
pub enum FieldDescriptor {
    Field(Field),
    Table(TableField),
}

impl FieldDescriptor {
    /// Build a descriptor from a code and type. `SUBTABLE` yields an empty
    /// table.
    pub fn new(code: impl Into<String>, field_type: impl Into<FieldType>) -> Self {
        let field_type = field_type.into();
        if field_type.is_table() {
            Self::Table(TableField::new(code))
        } else {
            Self::Field(Field::new(code, field_type))
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::Field(field) => &field.code,
            Self::Table(table) => &table.code,
        }
    }

    pub fn field_type(&self) -> &FieldType {
        match self {
            Self::Field(field) => &field.field_type,
            Self::Table(_) => &SUBTABLE,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Field(field) => field.label.as_deref(),
            Self::Table(table) => table.label.as_deref(),
        }
    }

    pub fn related_app(&self) -> Option<&Value> {
        match self {
            Self::Field(field) => field.related_app.as_ref(),
            Self::Table(table) => table.related_app.as_ref(),
        }
    }

    /// True when the derived/lookup marker is present.
    pub fn is_derived(&self) -> bool {
        self.related_app().is_some()
    }

    pub fn extra(&self) -> &Map<String, Value> {
        match self {
            Self::Field(field) => &field.extra,
            Self::Table(table) => &table.extra,
        }
    }

    pub fn as_table(&self) -> Option<&TableField> {
        match self {
            Self::Table(table) => Some(table),
            Self::Field(_) => None,
        }
    }

    /// Child descriptors in insertion order. Empty for non-table fields.
    pub fn children(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.as_table()
            .into_iter()
            .flat_map(|table| table.fields.values())
    }

    pub(crate) fn set_code(&mut self, code: String) {
        match self {
            Self::Field(field) => field.code = code,
            Self::Table(table) => table.code = code,
        }
    }
}

impl From<Field> for FieldDescriptor {
    fn from(field: Field) -> Self {
        Self::Field(field)
    }
}

impl From<TableField> for FieldDescriptor {
    fn from(table: TableField) -> Self {
        Self::Table(table)
    }
}

/// Fill in missing codes from the keys of the mapping that holds them.
pub(crate) fn backfill_codes(fields: &mut IndexMap<String, FieldDescriptor>) {
    for (key, field) in fields.iter_mut() {
        if field.code().is_empty() {
            field.set_code(key.clone());
        }
    }
}

/// Wire shape of a descriptor before it is split into field or table.
#[derive(Deserialize)]
struct RawDescriptor {
    #[serde(default)]
    code: String,
    #[serde(rename = "type")]
    field_type: FieldType,
    #[serde(default)]
    label: Option<String>,
    #[serde(
        rename = "relatedApp",
        default,
        deserialize_with = "deserialize_marker"
    )]
    related_app: Option<Value>,
    #[serde(default)]
    fields: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// A present marker is `Some` even when its value is `null`.
fn deserialize_marker<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl TryFrom<RawDescriptor> for FieldDescriptor {
    type Error = serde_json::Error;

    fn try_from(raw: RawDescriptor) -> Result<Self, Self::Error> {
        let RawDescriptor {
            code,
            field_type,
            label,
            related_app,
            fields,
            mut extra,
        } = raw;

        if !field_type.is_table() {
            // `fields` means nothing outside a table; keep it untouched.
            if let Some(fields) = fields {
                extra.insert("fields".to_owned(), fields);
            }
            return Ok(Self::Field(Field {
                code,
                field_type,
                label,
                related_app,
                extra,
            }));
        }

        let mut children: IndexMap<String, FieldDescriptor> = match fields {
            Some(Value::Null) | None => IndexMap::new(),
            Some(value) => serde_json::from_value(value)?,
        };
        backfill_codes(&mut children);

        Ok(Self::Table(TableField {
            code,
            label,
            related_app,
            fields: children,
            extra,
        }))
    }
}

#[derive(Serialize)]
struct DescriptorRef<'a> {
    code: &'a str,
    #[serde(rename = "type")]
    field_type: &'a FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<&'a str>,
    #[serde(rename = "relatedApp", skip_serializing_if = "Option::is_none")]
    related_app: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a IndexMap<String, FieldDescriptor>>,
    #[serde(flatten)]
    extra: &'a Map<String, Value>,
}

impl Serialize for FieldDescriptor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        DescriptorRef {
            code: self.code(),
            field_type: self.field_type(),
            label: self.label(),
            related_app: self.related_app(),
            fields: self.as_table().map(|table| &table.fields),
            extra: self.extra(),
        }
        .serialize(serializer)
    }
}
