//! Built statements and their SQL rendering.

use crate::client::GenericClient;
use crate::coerce::StorageType;
use crate::config::PlaceholderStyle;
use crate::error::BindResult;
use crate::ident::Ident;
use crate::param::{Param, ParamList};

/// INSERT or UPDATE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Insert,
    Update,
}

impl StatementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
        }
    }
}

impl std::fmt::Display for StatementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One column written by the statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: Ident,
    pub param: Param,
}

impl Assignment {
    pub fn storage(&self) -> StorageType {
        self.param.storage()
    }
}

/// `WHERE <column> = <param>` for UPDATE statements.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPredicate {
    pub column: Ident,
    pub param: Param,
}

/// A fully assembled single-table INSERT or UPDATE.
///
/// For UPDATE the primary-key assignment comes first and its parameter is the same
/// instance as the one in [`BoundStatement::key`], so the written key and the
/// matched key cannot diverge.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundStatement {
    pub(crate) entity: String,
    pub(crate) table: Ident,
    pub(crate) kind: StatementKind,
    pub(crate) assignments: Vec<Assignment>,
    pub(crate) key: Option<KeyPredicate>,
    pub(crate) placeholder: PlaceholderStyle,
}

impl BoundStatement {
    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn table(&self) -> &Ident {
        &self.table
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Identifying predicate, present for UPDATE only.
    pub fn key(&self) -> Option<&KeyPredicate> {
        self.key.as_ref()
    }

    /// Unquoted names of the written columns, in statement order.
    pub fn columns(&self) -> Vec<&str> {
        self.assignments
            .iter()
            .filter_map(|a| a.column.parts().first().map(String::as_str))
            .collect()
    }

    /// Assignment for an unquoted column name.
    pub fn assignment(&self, column: &str) -> Option<&Assignment> {
        self.assignments
            .iter()
            .find(|a| a.column.parts().first().is_some_and(|c| c == column))
    }

    /// Render the SQL text.
    pub fn to_sql(&self) -> String {
        self.render().0
    }

    /// Parameters in placeholder order.
    pub fn params(&self) -> ParamList {
        self.render().1
    }

    /// Render SQL text and the matching parameter list.
    pub fn render(&self) -> (String, ParamList) {
        self.render_with(self.placeholder)
    }

    /// Render with an explicit placeholder style, ignoring the configured one.
    pub fn render_with(&self, style: PlaceholderStyle) -> (String, ParamList) {
        let mut params = ParamList::new();
        let mut sql = String::new();
        let mut placeholders = Placeholders::new(style);

        match self.kind {
            StatementKind::Insert => {
                sql.push_str("INSERT INTO ");
                self.table.write_sql(&mut sql);
                if self.assignments.is_empty() {
                    sql.push_str(" DEFAULT VALUES");
                    return (sql, params);
                }

                sql.push_str(" (");
                for (i, a) in self.assignments.iter().enumerate() {
                    if i > 0 {
                        sql.push_str(", ");
                    }
                    a.column.write_sql(&mut sql);
                }
                sql.push_str(") VALUES (");
                for (i, a) in self.assignments.iter().enumerate() {
                    if i > 0 {
                        sql.push_str(", ");
                    }
                    placeholders.write(&mut sql, &mut params, &a.param);
                }
                sql.push(')');
            }
            StatementKind::Update => {
                sql.push_str("UPDATE ");
                self.table.write_sql(&mut sql);
                sql.push_str(" SET ");
                for (i, a) in self.assignments.iter().enumerate() {
                    if i > 0 {
                        sql.push_str(", ");
                    }
                    a.column.write_sql(&mut sql);
                    sql.push_str(" = ");
                    placeholders.write(&mut sql, &mut params, &a.param);
                }
                if let Some(key) = &self.key {
                    sql.push_str(" WHERE ");
                    key.column.write_sql(&mut sql);
                    sql.push_str(" = ");
                    placeholders.write(&mut sql, &mut params, &key.param);
                }
            }
        }

        (sql, params)
    }

    /// Execute the statement and return the number of affected rows.
    ///
    /// Always sends `$n` placeholders; the configured style only affects
    /// [`BoundStatement::to_sql`] and [`BoundStatement::render`].
    pub async fn execute(&self, conn: &impl GenericClient) -> BindResult<u64> {
        let (sql, params) = self.render_with(PlaceholderStyle::Numbered);
        tracing::debug!(
            target: "rowbind",
            entity = %self.entity,
            kind = %self.kind,
            sql = %sql,
            params = params.len(),
            "executing statement"
        );
        conn.execute(&sql, &params.as_refs()).await
    }
}

/// Hands out placeholders, reusing the index of a parameter instance that was
/// already bound when the style allows it.
struct Placeholders {
    style: PlaceholderStyle,
    bound: Vec<(Param, usize)>,
}

impl Placeholders {
    fn new(style: PlaceholderStyle) -> Self {
        Self {
            style,
            bound: Vec::new(),
        }
    }

    fn write(&mut self, sql: &mut String, params: &mut ParamList, param: &Param) {
        match self.style {
            PlaceholderStyle::Positional => {
                params.push(param.clone());
                sql.push('?');
            }
            PlaceholderStyle::Numbered => {
                let idx = match self.bound.iter().find(|(p, _)| p.same_instance(param)) {
                    Some((_, idx)) => *idx,
                    None => {
                        let idx = params.push(param.clone());
                        self.bound.push((param.clone(), idx));
                        idx
                    }
                };
                sql.push('$');
                sql.push_str(&idx.to_string());
            }
        }
    }
}
