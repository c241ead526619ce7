//! control_templates queries.

use assurance_core::errors::AssuranceResult;
use assurance_core::models::SecondaryControlTemplate;
use rusqlite::{params, Connection};

use super::{parse_enum, sqlite_error};

struct TemplateRow {
    id: String,
    code: String,
    dimension: String,
    criticality: String,
    prompt: String,
    sort_order: i64,
}

impl TemplateRow {
    fn into_model(self) -> AssuranceResult<SecondaryControlTemplate> {
        Ok(SecondaryControlTemplate {
            id: self.id,
            code: self.code,
            dimension: parse_enum(&self.dimension)?,
            criticality: parse_enum(&self.criticality)?,
            prompt: self.prompt,
            sort_order: u32::try_from(self.sort_order).unwrap_or(0),
        })
    }
}

/// Insert a template. Re-seeding an existing id is a no-op.
pub fn insert_template(conn: &Connection, template: &SecondaryControlTemplate) -> AssuranceResult<()> {
    conn.execute(
        "INSERT INTO control_templates (id, code, dimension, criticality, prompt, sort_order)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(id) DO NOTHING",
        params![
            template.id,
            template.code,
            template.dimension.as_str(),
            template.criticality.as_str(),
            template.prompt,
            i64::from(template.sort_order),
        ],
    )
    .map_err(sqlite_error)?;
    Ok(())
}

/// All templates in display order.
pub fn list_templates(conn: &Connection) -> AssuranceResult<Vec<SecondaryControlTemplate>> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, code, dimension, criticality, prompt, sort_order
             FROM control_templates
             ORDER BY CASE dimension WHEN 'D' THEN 0 WHEN 'I' THEN 1 WHEN 'M' THEN 2 ELSE 3 END,
                      sort_order, code",
        )
        .map_err(sqlite_error)?;

    let rows = stmt
        .query_map([], |row| {
            Ok(TemplateRow {
                id: row.get(0)?,
                code: row.get(1)?,
                dimension: row.get(2)?,
                criticality: row.get(3)?,
                prompt: row.get(4)?,
                sort_order: row.get(5)?,
            })
        })
        .map_err(sqlite_error)?;

    let mut result = Vec::new();
    for row in rows {
        result.push(row.map_err(sqlite_error)?.into_model()?);
    }
    Ok(result)
}
