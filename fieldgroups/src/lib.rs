//! Form field classification
//!
//! `fieldgroups` sorts form field metadata into semantic buckets so that a
//! renderer or validator can pick per-category behavior without looking at
//! raw type tags again. It works on in-memory metadata only.
//!
//! # Architecture
//!
//! - **Descriptors**: [`FieldDescriptor`] is a closed sum type; only tables carry children
//! - **Classifier**: [`classify`] is pure and total, and recurses into tables
//! - **Derived fields**: a present `relatedApp` marker excludes a field, and a derived table is never recursed
//! - **Loading**: [`FormProperties`] reads JSON or YAML form metadata, the only fallible step

pub mod classifier;
pub mod error;
pub mod groups;
pub mod properties;
pub mod types;

pub use classifier::{classify, classify_tables, select_category, select_type};
pub use error::{FieldsError, Result};
pub use groups::{FieldGroups, TableFieldGroups};
pub use properties::FormProperties;
pub use types::{Category, Field, FieldDescriptor, FieldType, TableField};
