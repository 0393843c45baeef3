//! 查詢描述：篩選條件、排序與列範圍。
//!
//! 這裡只組合參數，實際的比對由遠端資料服務執行。

use crate::domain::model::Century;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const DEFAULT_TABLE: &str = "livros";
pub const DEFAULT_PAGE_SIZE: usize = 20;
/// 搜尋時一次取回的最大列數
pub const SEARCH_ROW_LIMIT: usize = 10_000;

pub const ID_COLUMN: &str = "id";
pub const TITLE_COLUMN: &str = "titulo";
pub const AUTHOR_COLUMN: &str = "autor";
pub const PUBLISHER_COLUMN: &str = "editora";
pub const CATEGORY_COLUMN: &str = "categoria";
pub const CITY_COLUMN: &str = "cidade";
pub const YEAR_COLUMN: &str = "ano";

/// 使用者目前選擇的搜尋與篩選狀態
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookFilter {
    pub search_term: Option<String>,
    pub category: Option<String>,
    pub city: Option<String>,
    pub century: Option<Century>,
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl BookFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = normalize(Some(term.into()));
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = normalize(Some(category.into()));
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = normalize(Some(city.into()));
        self
    }

    pub fn with_century(mut self, century: Century) -> Self {
        self.century = Some(century);
        self
    }

    /// 空白字串視為未設定
    pub fn normalized(self) -> Self {
        Self {
            search_term: normalize(self.search_term),
            category: normalize(self.category),
            city: normalize(self.city),
            century: self.century,
        }
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref()
    }

    pub fn is_search(&self) -> bool {
        self.search_term.is_some()
    }

    /// 篩選欄位對應的謂詞（不含搜尋）
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();
        if let Some(category) = &self.category {
            predicates.push(Predicate::Eq {
                column: CATEGORY_COLUMN.to_string(),
                value: category.clone(),
            });
        }
        if let Some(city) = &self.city {
            predicates.push(Predicate::Eq {
                column: CITY_COLUMN.to_string(),
                value: city.clone(),
            });
        }
        if let Some(century) = self.century {
            let years = century.years();
            predicates.push(Predicate::Gte {
                column: YEAR_COLUMN.to_string(),
                value: years.start().to_string(),
            });
            predicates.push(Predicate::Lte {
                column: YEAR_COLUMN.to_string(),
                value: years.end().to_string(),
            });
        }
        predicates
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Eq { column: String, value: String },
    Gte { column: String, value: String },
    Lte { column: String, value: String },
    /// 任一欄位以不分大小寫的子字串比對
    AnyILike { columns: Vec<String>, term: String },
}

impl Predicate {
    /// 轉成 PostgREST 的查詢參數 (key, value)
    pub fn to_param(&self) -> (String, String) {
        match self {
            Predicate::Eq { column, value } => (column.clone(), format!("eq.{}", value)),
            Predicate::Gte { column, value } => (column.clone(), format!("gte.{}", value)),
            Predicate::Lte { column, value } => (column.clone(), format!("lte.{}", value)),
            Predicate::AnyILike { columns, term } => {
                let pattern = quote_value(&format!("*{}*", term));
                let clauses: Vec<String> = columns
                    .iter()
                    .map(|c| format!("{}.ilike.{}", c, pattern))
                    .collect();
                ("or".to_string(), format!("({})", clauses.join(",")))
            }
        }
    }
}

/// 含保留字元的值要用雙引號包起來
fn quote_value(value: &str) -> String {
    const RESERVED: &[char] = &[',', '.', ':', '(', ')', '"', '\\'];
    if !value.contains(RESERVED) {
        return value.to_string();
    }
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        if ch == '"' || ch == '\\' {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

/// 一次對資料服務的列查詢
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookQuery {
    pub table: String,
    pub order: OrderBy,
    pub rows: RangeInclusive<usize>,
    pub predicates: Vec<Predicate>,
}

impl BookQuery {
    fn base(table: &str, filter: &BookFilter, rows: RangeInclusive<usize>) -> Self {
        Self {
            table: table.to_string(),
            order: OrderBy {
                column: TITLE_COLUMN.to_string(),
                ascending: true,
            },
            rows,
            predicates: filter.predicates(),
        }
    }

    /// 瀏覽模式的第 `page` 頁（1 起算）
    pub fn page(table: &str, filter: &BookFilter, page: usize, page_size: usize) -> Self {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let from = (page - 1) * page_size;
        Self::base(table, filter, from..=from + page_size - 1)
    }

    /// 搜尋模式：單次取回，不分頁
    pub fn search(table: &str, filter: &BookFilter) -> Self {
        let mut query = Self::base(table, filter, 0..=SEARCH_ROW_LIMIT - 1);
        if let Some(term) = filter.search_term() {
            query.predicates.insert(
                0,
                Predicate::AnyILike {
                    columns: vec![
                        TITLE_COLUMN.to_string(),
                        AUTHOR_COLUMN.to_string(),
                        PUBLISHER_COLUMN.to_string(),
                    ],
                    term: term.to_string(),
                },
            );
        }
        query
    }

    /// 依 filter 決定走搜尋或瀏覽
    pub fn for_filter(table: &str, filter: &BookFilter, page: usize, page_size: usize) -> Self {
        if filter.is_search() {
            Self::search(table, filter)
        } else {
            Self::page(table, filter, page, page_size)
        }
    }

    /// 依位置編號查單一本書
    pub fn by_id(table: &str, id: &str) -> Self {
        let mut query = Self::base(table, &BookFilter::default(), 0..=0);
        query.predicates.push(Predicate::Eq {
            column: ID_COLUMN.to_string(),
            value: id.to_string(),
        });
        query
    }

    pub fn limit(&self) -> usize {
        self.rows.end() - self.rows.start() + 1
    }

    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("select".to_string(), "*".to_string()),
            (
                "order".to_string(),
                format!(
                    "{}.{}",
                    self.order.column,
                    if self.order.ascending { "asc" } else { "desc" }
                ),
            ),
            ("offset".to_string(), self.rows.start().to_string()),
            ("limit".to_string(), self.limit().to_string()),
        ];
        params.extend(self.predicates.iter().map(Predicate::to_param));
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(params: &'a [(String, String)], key: &str) -> Vec<&'a str> {
        params
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    #[test]
    fn test_first_page_range() {
        let q = BookQuery::page(DEFAULT_TABLE, &BookFilter::new(), 1, 20);
        assert_eq!(q.rows, 0..=19);
        assert_eq!(q.limit(), 20);

        let q = BookQuery::page(DEFAULT_TABLE, &BookFilter::new(), 3, 20);
        assert_eq!(q.rows, 40..=59);
    }

    #[test]
    fn test_page_params_without_filters() {
        let params = BookQuery::page(DEFAULT_TABLE, &BookFilter::new(), 2, 20).params();
        assert_eq!(param(&params, "select"), vec!["*"]);
        assert_eq!(param(&params, "order"), vec!["titulo.asc"]);
        assert_eq!(param(&params, "offset"), vec!["20"]);
        assert_eq!(param(&params, "limit"), vec!["20"]);
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn test_filter_predicates() {
        let filter = BookFilter::new()
            .with_category("Teologia")
            .with_city("Coimbra")
            .with_century(Century::new(17).unwrap());
        let params = BookQuery::page(DEFAULT_TABLE, &filter, 1, 20).params();

        assert_eq!(param(&params, "categoria"), vec!["eq.Teologia"]);
        assert_eq!(param(&params, "cidade"), vec!["eq.Coimbra"]);
        assert_eq!(param(&params, "ano"), vec!["gte.1601", "lte.1700"]);
        assert!(param(&params, "or").is_empty());
    }

    #[test]
    fn test_search_query_uses_or_ilike_and_full_range() {
        let filter = BookFilter::new().with_search("  camões ").with_city("Lisboa");
        let q = BookQuery::for_filter(DEFAULT_TABLE, &filter, 5, 20);
        assert_eq!(q.rows, 0..=9999);

        let params = q.params();
        assert_eq!(
            param(&params, "or"),
            vec!["(titulo.ilike.*camões*,autor.ilike.*camões*,editora.ilike.*camões*)"]
        );
        assert_eq!(param(&params, "cidade"), vec!["eq.Lisboa"]);
        assert_eq!(param(&params, "limit"), vec!["10000"]);
    }

    #[test]
    fn test_search_term_with_reserved_chars_is_quoted() {
        let filter = BookFilter::new().with_search("Vieira, A.");
        let params = BookQuery::search(DEFAULT_TABLE, &filter).params();
        assert_eq!(
            param(&params, "or"),
            vec![r#"(titulo.ilike."*Vieira, A.*",autor.ilike."*Vieira, A.*",editora.ilike."*Vieira, A.*")"#]
        );

        assert_eq!(quote_value(r#"a"b"#), r#""a\"b""#);
    }

    #[test]
    fn test_by_id_query() {
        let params = BookQuery::by_id(DEFAULT_TABLE, "E3-12").params();
        assert_eq!(param(&params, "id"), vec!["eq.E3-12"]);
        assert_eq!(param(&params, "limit"), vec!["1"]);
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let filter = BookFilter {
            search_term: Some("   ".to_string()),
            category: Some(String::new()),
            city: None,
            century: None,
        }
        .normalized();
        assert_eq!(filter, BookFilter::default());
        assert!(!filter.is_search());
        assert!(filter.predicates().is_empty());
    }
}
