//! Employee search query construction
//!
//! Values are always bound as parameters. Column identifiers only ever come
//! from [`EmployeeColumn`], so nothing the operator types is interpolated
//! into SQL text.

use std::fmt;
use std::str::FromStr;

use sqlx::Sqlite;
use sqlx::query::QueryAs;
use sqlx::sqlite::SqliteArguments;

/// Column list selected for every employee row
pub const EMPLOYEE_COLUMNS: &str =
    "id, name, department, position, contact, job_history, skills, owner_user_id";

/// Sortable / filterable employee columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmployeeColumn {
    Id,
    Name,
    Department,
    Position,
    Contact,
    JobHistory,
    Skills,
}

impl EmployeeColumn {
    /// Free-text columns matched by the search criteria, in bind order
    pub const SEARCHABLE: [EmployeeColumn; 6] = [
        EmployeeColumn::Name,
        EmployeeColumn::Department,
        EmployeeColumn::Position,
        EmployeeColumn::Contact,
        EmployeeColumn::JobHistory,
        EmployeeColumn::Skills,
    ];

    /// SQL identifier
    pub const fn as_sql(&self) -> &'static str {
        match self {
            EmployeeColumn::Id => "id",
            EmployeeColumn::Name => "name",
            EmployeeColumn::Department => "department",
            EmployeeColumn::Position => "position",
            EmployeeColumn::Contact => "contact",
            EmployeeColumn::JobHistory => "job_history",
            EmployeeColumn::Skills => "skills",
        }
    }
}

impl fmt::Display for EmployeeColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Error returned for a column outside the allow-list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColumn(pub String);

impl fmt::Display for UnknownColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown column '{}'", self.0)
    }
}

impl std::error::Error for UnknownColumn {}

impl FromStr for EmployeeColumn {
    type Err = UnknownColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect();
        match normalized.as_str() {
            "id" => Ok(EmployeeColumn::Id),
            "name" => Ok(EmployeeColumn::Name),
            "department" => Ok(EmployeeColumn::Department),
            "position" => Ok(EmployeeColumn::Position),
            "contact" => Ok(EmployeeColumn::Contact),
            "jobhistory" => Ok(EmployeeColumn::JobHistory),
            "skills" => Ok(EmployeeColumn::Skills),
            _ => Err(UnknownColumn(s.trim().to_string())),
        }
    }
}

/// A bound query parameter
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Text(String),
    Integer(i64),
}

/// Query builder for constructing SQL queries with dynamic WHERE conditions
#[derive(Debug, Default)]
pub struct QueryBuilder {
    conditions: Vec<String>,
    bindings: Vec<QueryValue>,
    order_by: Option<EmployeeColumn>,
    limit: Option<(i64, i64)>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add LIKE search condition for multiple fields
    ///
    /// The `%search%` pattern is bound once per field.
    pub fn add_search_condition(&mut self, fields: &[EmployeeColumn], search: &str) -> &mut Self {
        let field_conditions: Vec<String> = fields
            .iter()
            .map(|field| format!("{} LIKE ?", field.as_sql()))
            .collect();

        let condition = format!("({})", field_conditions.join(" OR "));
        self.conditions.push(condition);

        let search_pattern = format!("%{}%", search);
        for _ in fields {
            self.bindings.push(QueryValue::Text(search_pattern.clone()));
        }

        self
    }

    /// Add an equality condition on one column
    pub fn add_equals(&mut self, field: EmployeeColumn, value: &str) -> &mut Self {
        self.conditions.push(format!("{} = ?", field.as_sql()));
        let binding = match field {
            EmployeeColumn::Id => match value.trim().parse::<i64>() {
                Ok(id) => QueryValue::Integer(id),
                Err(_) => QueryValue::Text(value.to_string()),
            },
            _ => QueryValue::Text(value.to_string()),
        };
        self.bindings.push(binding);
        self
    }

    /// Sort by one column
    pub fn order_by(&mut self, field: EmployeeColumn) -> &mut Self {
        self.order_by = Some(field);
        self
    }

    /// Page through results; `page` is 1-based and not validated here
    pub fn paginate(&mut self, per_page: i64, page: i64) -> &mut Self {
        let offset = page.saturating_sub(1).saturating_mul(per_page);
        self.limit = Some((per_page, offset));
        self
    }

    /// Build WHERE clause (empty if no conditions)
    pub fn build_where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// Assemble the full statement over `table` and its ordered parameters
    pub fn build(&self, table: &str) -> SearchQuery {
        let mut sql = format!(
            "SELECT {} FROM {}{}",
            EMPLOYEE_COLUMNS,
            table,
            self.build_where_clause()
        );
        let mut params = self.bindings.clone();

        if let Some(column) = self.order_by {
            sql.push_str(&format!(" ORDER BY {}", column.as_sql()));
        }

        if let Some((limit, offset)) = self.limit {
            sql.push_str(" LIMIT ? OFFSET ?");
            params.push(QueryValue::Integer(limit));
            params.push(QueryValue::Integer(offset));
        }

        SearchQuery { sql, params }
    }
}

/// A fully parameterized statement
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub sql: String,
    pub params: Vec<QueryValue>,
}

impl SearchQuery {
    /// Apply bindings to a SQLx query_as, in order
    pub fn apply_bindings<'q, O>(
        &'q self,
        mut query: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    ) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>> {
        for binding in &self.params {
            query = match binding {
                QueryValue::Text(s) => query.bind(s.as_str()),
                QueryValue::Integer(i) => query.bind(*i),
            };
        }
        query
    }

    /// Offset bound for the page, if the query is paginated
    pub fn offset(&self) -> Option<i64> {
        match self.params.last() {
            Some(QueryValue::Integer(offset)) if self.sql.ends_with("OFFSET ?") => Some(*offset),
            _ => None,
        }
    }
}

/// Build the employee search statement.
///
/// Parameter order: six criteria patterns, optional filter value, per_page,
/// offset.
pub fn build_search(
    criteria: &str,
    sort_by: Option<EmployeeColumn>,
    filter: Option<(EmployeeColumn, &str)>,
    per_page: i64,
    page: i64,
) -> SearchQuery {
    let mut builder = QueryBuilder::new();
    builder.add_search_condition(&EmployeeColumn::SEARCHABLE, criteria);
    if let Some((column, value)) = filter {
        builder.add_equals(column, value);
    }
    if let Some(column) = sort_by {
        builder.order_by(column);
    }
    builder.paginate(per_page, page);
    builder.build("employees")
}
