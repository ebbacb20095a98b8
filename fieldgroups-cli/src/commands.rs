//! Command implementations. Each renders to a `String` so output can be
//! tested without capturing stdout.

use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, Table};
use fieldgroups::{Category, FieldGroups, FormProperties};
use serde::Serialize;

use crate::cli::OutputFormat;

/// Load form metadata from a file, or from stdin when `input` is `-`.
pub fn load_input(input: &Path) -> Result<FormProperties> {
    if input.as_os_str() == "-" {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .context("failed to read stdin")?;
        return FormProperties::from_json_str(&content).context("failed to parse stdin");
    }

    FormProperties::from_path(input)
        .with_context(|| format!("failed to load {}", input.display()))
}

/// Render classified groups in the requested format.
pub fn render_groups(groups: &FieldGroups, format: OutputFormat, compact: bool) -> Result<String> {
    let output = match format {
        OutputFormat::Json if compact => serde_json::to_string(groups)?,
        OutputFormat::Json => serde_json::to_string_pretty(groups)?,
        OutputFormat::Yaml => serde_yaml_ng::to_string(groups)?,
    };
    Ok(output)
}

/// One line of the summary: a scope (form or table path), a category and a count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub scope: String,
    pub category: Category,
    pub count: usize,
}

/// Counts for every category of the form, then for each table, depth-first.
///
/// Top-level rows have the scope `form`; table rows are scoped by the path
/// of table codes, e.g. `lines` or `lines/details`.
pub fn summary_rows(groups: &FieldGroups) -> Vec<SummaryRow> {
    let mut rows = Vec::new();
    collect_rows(None, groups, &mut rows);
    rows
}

/// `path` is `None` for the form itself and the table path below it.
fn collect_rows(path: Option<&str>, groups: &FieldGroups, rows: &mut Vec<SummaryRow>) {
    let scope = path.unwrap_or("form");
    for category in Category::ALL {
        rows.push(SummaryRow {
            scope: scope.to_owned(),
            category,
            count: groups.len(category),
        });
    }
    for table in &groups.table_fields {
        let nested = match path {
            Some(parent) => format!("{parent}/{}", table.code),
            None => table.code.clone(),
        };
        collect_rows(Some(&nested), &table.fields, rows);
    }
}

pub fn render_summary(rows: &[SummaryRow], json: bool) -> Result<String> {
    if json {
        let output = serde_json::json!({ "summary": rows });
        return Ok(serde_json::to_string_pretty(&output)?);
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Scope", "Category", "Fields"]);
    for row in rows {
        table.add_row(vec![
            row.scope.clone(),
            row.category.to_string(),
            row.count.to_string(),
        ]);
    }
    Ok(table.to_string())
}

pub fn render_types(json: bool) -> Result<String> {
    if json {
        let entries: Vec<serde_json::Value> = Category::ALL
            .iter()
            .map(|c| serde_json::json!({ "category": c, "types": c.type_tags() }))
            .collect();
        return Ok(serde_json::to_string_pretty(&entries)?);
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Category", "Type tags"]);
    for category in Category::ALL {
        table.add_row(vec![
            category.to_string(),
            category.type_tags().join(", "),
        ]);
    }
    Ok(table.to_string())
}

pub fn run_classify(input: &Path, format: OutputFormat, compact: bool) -> Result<()> {
    let form = load_input(input)?;
    let groups = form.classify();
    tracing::debug!(fields = form.len(), grouped = groups.total(), "form classified");
    println!("{}", render_groups(&groups, format, compact)?);
    Ok(())
}

pub fn run_summary(input: &Path, json: bool) -> Result<()> {
    let form = load_input(input)?;
    let rows = summary_rows(&form.classify());
    println!("{}", render_summary(&rows, json)?);
    Ok(())
}

pub fn run_types(json: bool) -> Result<()> {
    println!("{}", render_types(json)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_form() -> FormProperties {
        FormProperties::from_json_str(
            r#"{
                "properties": {
                    "title": { "code": "title", "type": "SINGLE_LINE_TEXT" },
                    "lines": {
                        "code": "lines",
                        "type": "SUBTABLE",
                        "fields": {
                            "qty": { "code": "qty", "type": "NUMBER" },
                            "details": {
                                "code": "details",
                                "type": "SUBTABLE",
                                "fields": {
                                    "photo": { "code": "photo", "type": "FILE" }
                                }
                            }
                        }
                    }
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_summary_rows_walk_tables_depth_first() {
        let rows = summary_rows(&sample_form().classify());
        assert_eq!(rows.len(), 18);

        let scopes: Vec<&str> = rows
            .iter()
            .step_by(Category::ALL.len())
            .map(|r| r.scope.as_str())
            .collect();
        assert_eq!(scopes, vec!["form", "lines", "lines/details"]);

        let count = |scope: &str, category: Category| {
            rows.iter()
                .find(|r| r.scope == scope && r.category == category)
                .map(|r| r.count)
                .unwrap()
        };
        assert_eq!(count("form", Category::Simple), 1);
        assert_eq!(count("form", Category::Table), 1);
        assert_eq!(count("lines", Category::Simple), 1);
        assert_eq!(count("lines/details", Category::File), 1);
    }

    #[test]
    fn test_summary_table_coded_form_keeps_its_path() {
        let form = FormProperties::from_value(serde_json::json!({
            "form": {
                "code": "form",
                "type": "SUBTABLE",
                "fields": {
                    "inner": {
                        "code": "inner",
                        "type": "SUBTABLE",
                        "fields": { "n": { "code": "n", "type": "NUMBER" } }
                    }
                }
            }
        }))
        .unwrap();

        let rows = summary_rows(&form.classify());
        let scopes: Vec<&str> = rows
            .iter()
            .step_by(Category::ALL.len())
            .map(|r| r.scope.as_str())
            .collect();
        assert_eq!(scopes, vec!["form", "form", "form/inner"]);

        let inner_simple = rows
            .iter()
            .find(|r| r.scope == "form/inner" && r.category == Category::Simple)
            .unwrap();
        assert_eq!(inner_simple.count, 1);
    }

    #[test]
    fn test_render_summary_table_and_json() {
        let rows = summary_rows(&sample_form().classify());

        let table = render_summary(&rows, false).unwrap();
        assert!(table.contains("Scope"));
        assert!(table.contains("lines/details"));

        let json = render_summary(&rows, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["summary"][0]["category"], "simple");
        assert_eq!(value["summary"][0]["count"], 1);
    }

    #[test]
    fn test_render_groups_formats() {
        let groups = sample_form().classify();

        let pretty = render_groups(&groups, OutputFormat::Json, false).unwrap();
        assert!(pretty.contains('\n'));
        let compact = render_groups(&groups, OutputFormat::Json, true).unwrap();
        assert!(!compact.contains('\n'));
        assert_eq!(
            serde_json::from_str::<FieldGroups>(&pretty).unwrap(),
            serde_json::from_str::<FieldGroups>(&compact).unwrap()
        );

        let yaml = render_groups(&groups, OutputFormat::Yaml, false).unwrap();
        assert!(yaml.contains("simpleFields:"));
    }

    #[test]
    fn test_render_types_lists_every_category() {
        let table = render_types(false).unwrap();
        for category in Category::ALL {
            assert!(table.contains(category.as_str()));
        }
        assert!(table.contains("ORGANIZATION_SELECT"));

        let json = render_types(true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 6);
        assert_eq!(value[5]["types"][0], "SUBTABLE");
    }

    #[test]
    fn test_load_input_reports_file_context() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.json");
        let err = load_input(&path).unwrap_err();
        assert!(format!("{err:#}").contains("missing.json"));
    }

    #[test]
    fn test_load_input_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("form.json");
        std::fs::write(&path, r#"{"n": {"code": "n", "type": "NUMBER"}}"#).unwrap();
        let form = load_input(&path).unwrap();
        assert_eq!(form.len(), 1);
    }
}
