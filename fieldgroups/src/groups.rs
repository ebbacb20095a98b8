//! The classification result.

use serde::{Deserialize, Serialize};

use crate::types::{Category, FieldDescriptor, FieldType};

/// Field descriptors sorted into six semantic buckets.
///
/// Every bucket keeps the input order of its entries. Tables are listed as
/// [`TableFieldGroups`], each carrying the grouping of its own children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldGroups {
    pub simple_fields: Vec<FieldDescriptor>,
    pub user_fields: Vec<FieldDescriptor>,
    pub string_list_fields: Vec<FieldDescriptor>,
    pub entity_list_fields: Vec<FieldDescriptor>,
    #[serde(rename = "fileTypeFields")]
    pub file_fields: Vec<FieldDescriptor>,
    #[serde(rename = "subTableFields")]
    pub table_fields: Vec<TableFieldGroups>,
}

/// A table field together with the grouping of its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableFieldGroups {
    pub code: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub fields: FieldGroups,
}

impl FieldGroups {
    /// Descriptors in a non-table bucket. Tables live in `table_fields`, so
    /// `Category::Table` yields an empty slice.
    pub fn fields(&self, category: Category) -> &[FieldDescriptor] {
        match category {
            Category::Simple => &self.simple_fields,
            Category::User => &self.user_fields,
            Category::StringList => &self.string_list_fields,
            Category::EntityList => &self.entity_list_fields,
            Category::File => &self.file_fields,
            Category::Table => &[],
        }
    }

    /// Number of entries in a bucket, tables included.
    pub fn len(&self, category: Category) -> usize {
        match category {
            Category::Table => self.table_fields.len(),
            other => self.fields(other).len(),
        }
    }

    /// Number of top-level entries across all six buckets.
    pub fn total(&self) -> usize {
        Category::ALL.iter().map(|c| self.len(*c)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Codes of the entries in a bucket, in order.
    pub fn codes(&self, category: Category) -> Vec<&str> {
        match category {
            Category::Table => self.table_fields.iter().map(|t| t.code.as_str()).collect(),
            other => self.fields(other).iter().map(FieldDescriptor::code).collect(),
        }
    }

    /// Find a table entry by code.
    pub fn table(&self, code: &str) -> Option<&TableFieldGroups> {
        self.table_fields.iter().find(|t| t.code == code)
    }
}
