//! Builder for the hosted backend's row-level query contract: column
//! selection (including embedded relations), equality filters, a
//! case-insensitive substring search OR-combined across text columns,
//! ordering, and row limits.

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone)]
pub struct SelectQuery {
    table: String,
    select: String,
    filters: Vec<(String, String)>,
    search: Option<String>,
    order: Option<(String, OrderDirection)>,
    limit: Option<usize>,
}

impl SelectQuery {
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            select: "*".to_string(),
            filters: Vec::new(),
            search: None,
            order: None,
            limit: None,
        }
    }

    pub fn select(mut self, shape: impl Into<String>) -> Self {
        self.select = shape.into();
        self
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters
            .push((column.into(), format!("eq.{}", value.into())));
        self
    }

    /// Case-insensitive substring match on any of `columns`, OR-combined:
    /// a row matches when at least one column contains `term`.
    pub fn search(mut self, columns: &[&str], term: &str) -> Self {
        let clauses: Vec<String> = columns
            .iter()
            .map(|column| format!("{column}.ilike.*{term}*"))
            .collect();
        self.search = Some(format!("({})", clauses.join(",")));
        self
    }

    pub fn order(mut self, column: impl Into<String>, direction: OrderDirection) -> Self {
        self.order = Some((column.into(), direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Query-string pairs in the backend's wire syntax.
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), self.select.clone())];
        for (column, predicate) in &self.filters {
            pairs.push((column.clone(), predicate.clone()));
        }
        if let Some(search) = &self.search {
            pairs.push(("or".to_string(), search.clone()));
        }
        if let Some((column, direction)) = &self.order {
            let suffix = match direction {
                OrderDirection::Ascending => "asc",
                OrderDirection::Descending => "desc",
            };
            pairs.push(("order".to_string(), format!("{column}.{suffix}")));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }

    /// Resolves the request URL against the backend base URL.
    pub fn url(&self, base: &Url) -> Result<Url, url::ParseError> {
        let mut url = base.join(&format!("rest/v1/{}", self.table))?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in self.pairs() {
                query.append_pair(&key, &value);
            }
        }
        Ok(url)
    }
}

/// Extracts the total from an exact-count response header of the form
/// `<lower>-<upper>/<total>` (or `*/<total>` for an empty range).
pub fn parse_content_range(value: &str) -> Option<u64> {
    let (_, total) = value.rsplit_once('/')?;
    total.parse().ok()
}
