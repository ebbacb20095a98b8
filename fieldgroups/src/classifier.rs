//! Field classification.
//!
//! `classify` is a pure function: descriptors in, [`FieldGroups`] out. Each
//! descriptor lands in at most one bucket. Derived/lookup descriptors and
//! unrecognized types land in none. Tables are classified recursively, with
//! no bound on nesting depth.

use tracing::{debug, trace};

use crate::groups::{FieldGroups, TableFieldGroups};
use crate::types::{Category, FieldDescriptor, FieldType};

/// Sort descriptors into semantic buckets.
///
/// Accepts anything that iterates `&FieldDescriptor` in a stable order: a
/// slice, a `Vec`, or the values of an ordered map.
///
/// ```
/// use fieldgroups::{classify, Field, FieldDescriptor, FieldType};
///
/// let fields: Vec<FieldDescriptor> = vec![
///     Field::new("title", FieldType::SingleLineText).into(),
///     Field::new("tags", FieldType::CheckBox).into(),
/// ];
/// let groups = classify(&fields);
/// assert_eq!(groups.simple_fields.len(), 1);
/// assert_eq!(groups.string_list_fields.len(), 1);
/// ```
pub fn classify<'a, I>(fields: I) -> FieldGroups
where
    I: IntoIterator<Item = &'a FieldDescriptor>,
{
    let mut groups = FieldGroups::default();

    for field in fields {
        // Derived tables are dropped here too, so their children are never visited.
        if field.is_derived() {
            trace!(code = %field.code(), "skipping derived field");
            continue;
        }

        let Some(category) = field.field_type().category() else {
            trace!(code = %field.code(), field_type = %field.field_type(), "skipping unrecognized field type");
            continue;
        };

        match category {
            Category::Simple => groups.simple_fields.push(field.clone()),
            Category::User => groups.user_fields.push(field.clone()),
            Category::StringList => groups.string_list_fields.push(field.clone()),
            Category::EntityList => groups.entity_list_fields.push(field.clone()),
            Category::File => groups.file_fields.push(field.clone()),
            Category::Table => groups.table_fields.push(table_groups(field)),
        }
    }

    debug!(
        simple = groups.simple_fields.len(),
        user = groups.user_fields.len(),
        string_list = groups.string_list_fields.len(),
        entity_list = groups.entity_list_fields.len(),
        file = groups.file_fields.len(),
        table = groups.table_fields.len(),
        "classified fields"
    );

    groups
}

/// Build the entry for one table, recursing into its children.
fn table_groups(table: &FieldDescriptor) -> TableFieldGroups {
    TableFieldGroups {
        code: table.code().to_owned(),
        field_type: table.field_type().clone(),
        fields: classify(table.children()),
    }
}

/// Non-derived descriptors whose type belongs to `category`, in order.
///
/// Agrees with the matching bucket of [`classify`] for every non-table
/// category. For `Category::Table` it returns the table descriptors
/// themselves.
pub fn select_category<'a, I>(category: Category, fields: I) -> Vec<FieldDescriptor>
where
    I: IntoIterator<Item = &'a FieldDescriptor>,
{
    fields
        .into_iter()
        .filter(|field| !field.is_derived())
        .filter(|field| field.field_type().category() == Some(category))
        .cloned()
        .collect()
}

/// Non-derived descriptors of exactly `field_type`, in order.
pub fn select_type<'a, I>(field_type: &FieldType, fields: I) -> Vec<FieldDescriptor>
where
    I: IntoIterator<Item = &'a FieldDescriptor>,
{
    fields
        .into_iter()
        .filter(|field| !field.is_derived())
        .filter(|field| field.field_type() == field_type)
        .cloned()
        .collect()
}

/// One [`TableFieldGroups`] per non-derived table descriptor, in order.
pub fn classify_tables<'a, I>(fields: I) -> Vec<TableFieldGroups>
where
    I: IntoIterator<Item = &'a FieldDescriptor>,
{
    fields
        .into_iter()
        .filter(|field| !field.is_derived() && field.field_type().is_table())
        .map(table_groups)
        .collect()
}
