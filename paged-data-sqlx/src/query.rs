/// SQL flavour, which decides the bind placeholder and identifier quoting style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Generic SQL using `?` placeholders (default).
    Generic,
    Sqlite,
    MySql,
    /// `$1, $2, ...` placeholders.
    Postgres,
}

impl Dialect {
    fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${index}"),
            Dialect::Generic | Dialect::Sqlite | Dialect::MySql => "?".to_string(),
        }
    }

    fn quote_char(self) -> char {
        match self {
            Dialect::MySql => '`',
            Dialect::Generic | Dialect::Sqlite | Dialect::Postgres => '"',
        }
    }
}

/// How table and column names are written into the statement.
///
/// Identifiers are always checked against `[A-Za-z_][A-Za-z0-9_]*`
/// (optionally dotted, e.g. `posts.id`) before they reach the SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentifierPolicy {
    /// Validate identifiers and write them as given.
    #[default]
    Validate,
    /// Validate and quote identifiers using the dialect quoting style.
    Quote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    InvalidIdentifier { kind: &'static str, ident: String },
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::InvalidIdentifier { kind, ident } => {
                write!(f, "Invalid {kind} identifier: {ident}")
            }
        }
    }
}

impl std::error::Error for QueryError {}

/// A fluent builder for the two statements a page needs: a filtered
/// `SELECT COUNT(*)` and the same filter with `LIMIT/OFFSET`.
///
/// Values are collected as strings and returned alongside the SQL so the
/// caller can bind them in order. Table and column names are validated
/// when the statement is built; an unusable name yields
/// [`QueryError::InvalidIdentifier`] instead of SQL.
///
/// # Example
///
/// ```ignore
/// let q = QueryBuilder::new("posts")
///     .where_eq("author", "alice")
///     .order_by("id", true);
/// let (count_sql, params) = q.build_count()?;
/// let (page_sql, params) = q.page(20, 10).build_select(&["id", "title"])?;
/// ```
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    table: String,
    conditions: Vec<Condition>,
    order: Vec<(String, bool)>,
    default_order: Option<(String, bool)>,
    limit_val: Option<u64>,
    offset_val: Option<u64>,
    dialect: Dialect,
    identifier_policy: IdentifierPolicy,
}

#[derive(Debug, Clone)]
enum Condition {
    Compare {
        column: String,
        op: &'static str,
        value: String,
    },
    In(String, Vec<String>),
    IsNull(String),
    IsNotNull(String),
}

impl QueryBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            conditions: Vec::new(),
            order: Vec::new(),
            default_order: None,
            limit_val: None,
            offset_val: None,
            dialect: Dialect::Generic,
            identifier_policy: IdentifierPolicy::default(),
        }
    }

    /// Set the SQL dialect (affects placeholder and quoting style).
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn identifier_policy(mut self, policy: IdentifierPolicy) -> Self {
        self.identifier_policy = policy;
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn where_eq(self, column: &str, value: &str) -> Self {
        self.compare(column, "=", value)
    }

    pub fn where_not_eq(self, column: &str, value: &str) -> Self {
        self.compare(column, "!=", value)
    }

    pub fn where_like(self, column: &str, pattern: &str) -> Self {
        self.compare(column, "LIKE", pattern)
    }

    pub fn where_gt(self, column: &str, value: &str) -> Self {
        self.compare(column, ">", value)
    }

    pub fn where_lt(self, column: &str, value: &str) -> Self {
        self.compare(column, "<", value)
    }

    pub fn where_in(mut self, column: &str, values: &[&str]) -> Self {
        self.conditions.push(Condition::In(
            column.to_string(),
            values.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    pub fn where_null(mut self, column: &str) -> Self {
        self.conditions.push(Condition::IsNull(column.to_string()));
        self
    }

    pub fn where_not_null(mut self, column: &str) -> Self {
        self.conditions.push(Condition::IsNotNull(column.to_string()));
        self
    }

    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        self.order.push((column.to_string(), ascending));
        self
    }

    /// Ordering applied only when no [`order_by`](Self::order_by) is given.
    pub fn default_order_by(mut self, column: &str, ascending: bool) -> Self {
        self.default_order = Some((column.to_string(), ascending));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit_val = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset_val = Some(offset);
        self
    }

    /// A copy of this query restricted to one page, replacing any limit/offset.
    pub fn page(&self, offset: u64, limit: u64) -> Self {
        self.clone().offset(offset).limit(limit)
    }

    fn compare(mut self, column: &str, op: &'static str, value: &str) -> Self {
        self.conditions.push(Condition::Compare {
            column: column.to_string(),
            op,
            value: value.to_string(),
        });
        self
    }

    /// Build a SELECT query returning `(sql, bind_values)`.
    ///
    /// `columns` may end in `*` (e.g. `&["*"]` or `&["posts.*"]`).
    pub fn build_select(&self, columns: &[&str]) -> Result<(String, Vec<String>), QueryError> {
        let table = self.identifier(&self.table, false, "table")?;
        let columns = columns
            .iter()
            .map(|col| self.identifier(col, true, "column"))
            .collect::<Result<Vec<_>, _>>()?;
        let mut sql = format!("SELECT {} FROM {table}", columns.join(", "));
        let params = self.append_where(&mut sql)?;
        self.append_order(&mut sql)?;
        if let Some(limit) = self.limit_val {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = self.offset_val {
            sql.push_str(&format!(" OFFSET {offset}"));
        }
        Ok((sql, params))
    }

    /// Build a COUNT query returning `(sql, bind_values)`.
    ///
    /// Ordering, limit, and offset do not apply to the count.
    pub fn build_count(&self) -> Result<(String, Vec<String>), QueryError> {
        let table = self.identifier(&self.table, false, "table")?;
        let mut sql = format!("SELECT COUNT(*) FROM {table}");
        let params = self.append_where(&mut sql)?;
        Ok((sql, params))
    }

    fn append_where(&self, sql: &mut String) -> Result<Vec<String>, QueryError> {
        let mut params = Vec::new();
        if self.conditions.is_empty() {
            return Ok(params);
        }
        let mut next = 1usize;
        let mut placeholder = || {
            let p = self.dialect.placeholder(next);
            next += 1;
            p
        };
        let mut clauses = Vec::with_capacity(self.conditions.len());
        for cond in &self.conditions {
            let clause = match cond {
                Condition::Compare { column, op, value } => {
                    let column = self.identifier(column, false, "column")?;
                    params.push(value.clone());
                    format!("{column} {op} {}", placeholder())
                }
                Condition::In(column, values) => {
                    let column = self.identifier(column, false, "column")?;
                    params.extend(values.iter().cloned());
                    let list: Vec<String> = values.iter().map(|_| placeholder()).collect();
                    format!("{column} IN ({})", list.join(", "))
                }
                Condition::IsNull(column) => {
                    format!("{} IS NULL", self.identifier(column, false, "column")?)
                }
                Condition::IsNotNull(column) => {
                    format!("{} IS NOT NULL", self.identifier(column, false, "column")?)
                }
            };
            clauses.push(clause);
        }
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
        Ok(params)
    }

    fn append_order(&self, sql: &mut String) -> Result<(), QueryError> {
        let order: &[(String, bool)] = match (&self.order[..], &self.default_order) {
            ([], Some(fallback)) => std::slice::from_ref(fallback),
            (explicit, _) => explicit,
        };
        if order.is_empty() {
            return Ok(());
        }
        let mut clauses = Vec::with_capacity(order.len());
        for (col, asc) in order {
            let col = self.identifier(col, false, "column")?;
            clauses.push(format!("{col} {}", if *asc { "ASC" } else { "DESC" }));
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(&clauses.join(", "));
        Ok(())
    }

    fn identifier(
        &self,
        ident: &str,
        allow_star: bool,
        kind: &'static str,
    ) -> Result<String, QueryError> {
        if !is_valid_identifier(ident, allow_star) {
            return Err(QueryError::InvalidIdentifier {
                kind,
                ident: ident.to_string(),
            });
        }
        match self.identifier_policy {
            IdentifierPolicy::Quote => Ok(quote_identifier(ident, self.dialect)),
            IdentifierPolicy::Validate => Ok(ident.to_string()),
        }
    }
}

fn is_valid_identifier(ident: &str, allow_star: bool) -> bool {
    let parts: Vec<&str> = ident.split('.').collect();
    let last = parts.len() - 1;
    parts.iter().enumerate().all(|(idx, part)| {
        (allow_star && idx == last && *part == "*") || is_valid_segment(part)
    })
}

fn is_valid_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn quote_identifier(ident: &str, dialect: Dialect) -> String {
    let quote = dialect.quote_char();
    ident
        .split('.')
        .map(|part| {
            if part == "*" {
                part.to_string()
            } else {
                format!("{quote}{part}{quote}")
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_select() {
        let (sql, params) = QueryBuilder::new("posts").build_select(&["*"]).unwrap();
        assert_eq!(sql, "SELECT * FROM posts");
        assert!(params.is_empty());
    }

    #[test]
    fn test_filtered_page() {
        let base = QueryBuilder::new("posts")
            .where_eq("status", "published")
            .where_like("title", "%rust%")
            .order_by("id", true);
        let (sql, params) = base.page(20, 10).build_select(&["id", "title"]).unwrap();
        assert_eq!(
            sql,
            "SELECT id, title FROM posts WHERE status = ? AND title LIKE ? ORDER BY id ASC LIMIT 10 OFFSET 20"
        );
        assert_eq!(params, vec!["published", "%rust%"]);

        // the base query is left untouched
        let (sql, _) = base.build_select(&["*"]).unwrap();
        assert!(!sql.contains("LIMIT"));
    }

    #[test]
    fn test_count_ignores_order_and_limit() {
        let (sql, params) = QueryBuilder::new("posts")
            .where_eq("author", "alice")
            .order_by("id", false)
            .default_order_by("id", true)
            .limit(5)
            .build_count()
            .unwrap();
        assert_eq!(sql, "SELECT COUNT(*) FROM posts WHERE author = ?");
        assert_eq!(params, vec!["alice"]);
    }

    #[test]
    fn test_postgres_placeholders() {
        let (sql, params) = QueryBuilder::new("posts")
            .dialect(Dialect::Postgres)
            .where_eq("status", "published")
            .where_in("author", &["alice", "bob"])
            .where_not_null("title")
            .build_select(&["*"])
            .unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM posts WHERE status = $1 AND author IN ($2, $3) AND title IS NOT NULL"
        );
        assert_eq!(params, vec!["published", "alice", "bob"]);
    }

    #[test]
    fn test_comparisons_and_null() {
        let (sql, params) = QueryBuilder::new("posts")
            .where_gt("id", "3")
            .where_lt("id", "9")
            .where_not_eq("author", "eve")
            .where_null("deleted_at")
            .build_count()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT COUNT(*) FROM posts WHERE id > ? AND id < ? AND author != ? AND deleted_at IS NULL"
        );
        assert_eq!(params, vec!["3", "9", "eve"]);
    }

    #[test]
    fn test_default_order_yields_to_explicit_order() {
        let base = QueryBuilder::new("posts").default_order_by("id", true);
        let (sql, _) = base.page(0, 10).build_select(&["id"]).unwrap();
        assert_eq!(sql, "SELECT id FROM posts ORDER BY id ASC LIMIT 10 OFFSET 0");

        let (sql, _) = base
            .order_by("title", false)
            .page(0, 10)
            .build_select(&["id"])
            .unwrap();
        assert_eq!(sql, "SELECT id FROM posts ORDER BY title DESC LIMIT 10 OFFSET 0");
    }

    #[test]
    fn test_quoted_identifiers() {
        let (sql, params) = QueryBuilder::new("posts")
            .dialect(Dialect::Postgres)
            .identifier_policy(IdentifierPolicy::Quote)
            .where_eq("posts.author", "alice")
            .order_by("posts.id", true)
            .build_select(&["posts.id", "posts.*"])
            .unwrap();
        assert_eq!(
            sql,
            "SELECT \"posts\".\"id\", \"posts\".* FROM \"posts\" WHERE \"posts\".\"author\" = $1 ORDER BY \"posts\".\"id\" ASC"
        );
        assert_eq!(params, vec!["alice"]);

        let (sql, _) = QueryBuilder::new("posts")
            .dialect(Dialect::MySql)
            .identifier_policy(IdentifierPolicy::Quote)
            .build_count()
            .unwrap();
        assert_eq!(sql, "SELECT COUNT(*) FROM `posts`");
    }

    #[test]
    fn test_malicious_order_by_is_rejected() {
        let err = QueryBuilder::new("p")
            .order_by("id; DROP TABLE p; --", true)
            .page(0, 10)
            .build_select(&["id"])
            .unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidIdentifier {
                kind: "column",
                ident: "id; DROP TABLE p; --".to_string(),
            }
        );
    }

    #[test]
    fn test_invalid_identifiers_are_rejected() {
        let table = QueryBuilder::new("posts;drop").build_count().unwrap_err();
        assert!(matches!(table, QueryError::InvalidIdentifier { kind: "table", .. }));

        let filter = QueryBuilder::new("posts")
            .where_eq("author = '' OR 1=1 --", "x")
            .build_count()
            .unwrap_err();
        assert!(matches!(filter, QueryError::InvalidIdentifier { kind: "column", .. }));

        let fallback = QueryBuilder::new("posts")
            .default_order_by("id desc", true)
            .build_select(&["id"])
            .unwrap_err();
        assert!(matches!(fallback, QueryError::InvalidIdentifier { kind: "column", .. }));

        assert!(QueryBuilder::new("posts").build_select(&[""]).is_err());
        assert!(QueryBuilder::new("posts").build_select(&["*.id"]).is_err());
        assert!(QueryBuilder::new("posts").build_select(&["1id"]).is_err());
    }
}
