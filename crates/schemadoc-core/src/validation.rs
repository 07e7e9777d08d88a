use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::schema::SchemaSnapshot;

/// Validate internal consistency of a schema snapshot.
///
/// This checks:
/// - duplicate `(schema, name)` table pairs
/// - duplicate column names within a table
///
/// Index and constraint columns are descriptive text (`lower(email)` is a
/// valid index entry) and are not checked against the column list.
pub fn validate_snapshot(snapshot: &SchemaSnapshot) -> Result<()> {
    let mut tables = BTreeSet::new();

    for table in &snapshot.tables {
        if !tables.insert((table.schema.clone(), table.name.clone())) {
            return Err(Error::InvalidSnapshot(format!(
                "duplicate table name: {}",
                table.qualified_name()
            )));
        }

        let mut columns = BTreeSet::new();
        for column in &table.columns {
            if !columns.insert(column.name.as_str()) {
                return Err(Error::InvalidSnapshot(format!(
                    "duplicate column name: {}.{}",
                    table.qualified_name(),
                    column.name
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::{ConstraintDescriptor, ConstraintKind, IndexDescriptor};
    use crate::schema::{ColumnDescriptor, TableDescriptor};

    fn column(name: &str) -> ColumnDescriptor {
        ColumnDescriptor {
            name: name.to_string(),
            data_type: "INTEGER".to_string(),
            nullable: false,
            default: None,
            primary_key: false,
            unique: false,
            foreign_key: None,
            comment: None,
        }
    }

    fn table(schema: Option<&str>, name: &str) -> TableDescriptor {
        TableDescriptor {
            name: name.to_string(),
            schema: schema.map(str::to_string),
            comment: None,
            columns: vec![column("id")],
            indexes: Vec::new(),
            constraints: Vec::new(),
        }
    }

    #[test]
    fn same_name_in_different_schemas_is_allowed() {
        let snapshot = SchemaSnapshot::new(vec![
            table(None, "users"),
            table(Some("sales"), "users"),
        ]);
        assert!(validate_snapshot(&snapshot).is_ok());
    }

    #[test]
    fn rejects_duplicate_table() {
        let snapshot = SchemaSnapshot::new(vec![
            table(Some("sales"), "orders"),
            table(Some("sales"), "orders"),
        ]);
        let err = validate_snapshot(&snapshot).unwrap_err();
        assert!(err.to_string().contains("duplicate table name: sales.orders"));
    }

    #[test]
    fn rejects_duplicate_column() {
        let mut users = table(None, "users");
        users.columns.push(column("id"));
        let err = validate_snapshot(&SchemaSnapshot::new(vec![users])).unwrap_err();
        assert!(err.to_string().contains("duplicate column name: users.id"));
    }

    #[test]
    fn expression_index_and_constraint_columns_are_accepted() {
        let mut users = table(None, "users");
        users.indexes.push(IndexDescriptor {
            name: "ix_users_lower_email".to_string(),
            columns: vec!["lower(email)".to_string()],
            unique: true,
        });
        users.constraints.push(ConstraintDescriptor {
            name: Some("uq_users_email".to_string()),
            kind: ConstraintKind::Unique,
            columns: vec!["email".to_string()],
            expression: None,
        });
        assert!(validate_snapshot(&SchemaSnapshot::new(vec![users])).is_ok());
    }
}
