use crate::utils::error::{CatalogError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// 書目記錄，欄位名稱對應資料庫 `livros` 表的欄位
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(rename = "imagem", default)]
    pub image: Option<String>,
    #[serde(rename = "titulo", default)]
    pub title: Option<String>,
    #[serde(rename = "autor", default)]
    pub author: Option<String>,
    #[serde(rename = "ano", default, deserialize_with = "string_or_number")]
    pub year: Option<String>,
    #[serde(rename = "editora", default)]
    pub publisher: Option<String>,
    #[serde(rename = "cidade", default)]
    pub city: Option<String>,
    #[serde(rename = "idioma", default)]
    pub language: Option<String>,
    #[serde(rename = "manuscritos", default)]
    pub manuscripts: Option<String>,
    #[serde(rename = "categoria", default)]
    pub category: Option<String>,
    #[serde(rename = "comentario", default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub link1: Option<String>,
    #[serde(default)]
    pub link2: Option<String>,
    #[serde(default)]
    pub link3: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl Book {
    pub fn id(&self) -> Option<&str> {
        non_blank(&self.id)
    }

    pub fn image_url(&self) -> Option<&str> {
        non_blank(&self.image)
    }

    pub fn display_title(&self) -> &str {
        non_blank(&self.title).unwrap_or("(untitled)")
    }

    /// 依序回傳非空的外部連結，附上 1 起算的編號
    pub fn links(&self) -> Vec<(usize, &str)> {
        [&self.link1, &self.link2, &self.link3]
            .into_iter()
            .enumerate()
            .filter_map(|(i, link)| non_blank(link).map(|l| (i + 1, l)))
            .collect()
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

impl FilterOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// 遠端篩選選項；缺少的鍵視為空清單
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(default)]
    pub cities: Vec<FilterOption>,
    #[serde(default)]
    pub categories: Vec<FilterOption>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Century(u8);

impl Century {
    pub const FIRST: u8 = 15;
    pub const LAST: u8 = 21;

    pub fn new(number: u8) -> Result<Self> {
        if (Self::FIRST..=Self::LAST).contains(&number) {
            Ok(Self(number))
        } else {
            Err(CatalogError::ValidationError {
                message: format!(
                    "Century must be between {} and {}, got {}",
                    Self::FIRST,
                    Self::LAST,
                    number
                ),
            })
        }
    }

    pub fn all() -> impl Iterator<Item = Century> {
        (Self::FIRST..=Self::LAST).map(Century)
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// 世紀 c 涵蓋 (c-1)*100+1 到 c*100 年
    pub fn years(self) -> RangeInclusive<u32> {
        let c = u32::from(self.0);
        (c - 1) * 100 + 1..=c * 100
    }

    pub fn roman(self) -> &'static str {
        match self.0 {
            15 => "XV",
            16 => "XVI",
            17 => "XVII",
            18 => "XVIII",
            19 => "XIX",
            20 => "XX",
            _ => "XXI",
        }
    }

    pub fn label(self) -> String {
        format!("Século {}", self.roman())
    }

    /// 下拉選單的選項，第一個是空白的佔位選項
    pub fn options() -> Vec<FilterOption> {
        std::iter::once(FilterOption::new("", "Século"))
            .chain(Self::all().map(|c| FilterOption::new(c.0.to_string(), c.label())))
            .collect()
    }
}

impl TryFrom<u8> for Century {
    type Error = CatalogError;

    fn try_from(value: u8) -> Result<Self> {
        Century::new(value)
    }
}

impl From<Century> for u8 {
    fn from(value: Century) -> Self {
        value.0
    }
}

impl std::str::FromStr for Century {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<u8>() {
            return Century::new(n);
        }
        let upper = trimmed.to_ascii_uppercase();
        Century::all()
            .find(|c| c.roman() == upper)
            .ok_or_else(|| CatalogError::ValidationError {
                message: format!("Unknown century '{}'", s),
            })
    }
}

impl fmt::Display for Century {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
