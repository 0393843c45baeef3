use crate::domain::model::{Book, Century, FilterOption};
use crate::domain::ports::{CatalogSource, FilterSource};
use crate::domain::query::{BookFilter, BookQuery, DEFAULT_PAGE_SIZE, DEFAULT_TABLE};
use crate::utils::error::{CatalogError, Result};

/// 分類、城市與世紀的下拉選項；遠端載入失敗時保持空白
#[derive(Debug, Clone, Default)]
pub struct FilterMenu {
    categories: Vec<FilterOption>,
    cities: Vec<FilterOption>,
}

impl FilterMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load<F: FilterSource + ?Sized>(&mut self, source: &F) -> bool {
        match source.fetch_filter_options().await {
            Ok(options) => {
                self.categories = options.categories;
                self.cities = options.cities;
                true
            }
            Err(e) => {
                tracing::error!("❌ Failed to load filter options: {}", e);
                false
            }
        }
    }

    pub fn categories(&self) -> &[FilterOption] {
        &self.categories
    }

    pub fn cities(&self) -> &[FilterOption] {
        &self.cities
    }

    pub fn centuries(&self) -> Vec<FilterOption> {
        Century::options()
    }
}

/// 畫廊狀態：已載入的書、分頁游標、目前的篩選與選取
///
/// 篩選改變時清空重來；瀏覽模式逐頁追加，搜尋模式一次取完。
pub struct Gallery<C: CatalogSource> {
    source: C,
    table: String,
    page_size: usize,
    books: Vec<Book>,
    page: usize,
    has_more: bool,
    filter: BookFilter,
    selected: Option<usize>,
    menu: FilterMenu,
}

impl<C: CatalogSource> Gallery<C> {
    pub fn new(source: C) -> Self {
        Self::with_settings(source, DEFAULT_TABLE, DEFAULT_PAGE_SIZE)
    }

    pub fn with_settings(source: C, table: &str, page_size: usize) -> Self {
        Self {
            source,
            table: table.to_string(),
            page_size: page_size.max(1),
            books: Vec::new(),
            page: 1,
            has_more: true,
            filter: BookFilter::default(),
            selected: None,
            menu: FilterMenu::new(),
        }
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn into_books(self) -> Vec<Book> {
        self.books
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// 下一次 `load_next` 要取的頁碼
    pub fn next_page(&self) -> usize {
        self.page
    }

    pub fn filter(&self) -> &BookFilter {
        &self.filter
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    fn reset(&mut self) {
        self.books.clear();
        self.page = 1;
        self.has_more = true;
        self.selected = None;
    }

    /// 套用新的篩選條件並載入第一批結果，回傳目前的筆數
    pub async fn apply_filter(&mut self, filter: BookFilter) -> Result<usize> {
        self.filter = filter.normalized();
        self.reset();
        tracing::debug!("🔎 Applying filter: {:?}", self.filter);

        if self.filter.is_search() {
            self.search().await
        } else {
            self.load_next().await
        }
    }

    async fn search(&mut self) -> Result<usize> {
        let query = BookQuery::search(&self.table, &self.filter);
        let result = self.source.fetch_books(&query).await;
        self.has_more = false;

        match result {
            Ok(books) => {
                tracing::info!("🔎 Search returned {} books", books.len());
                self.books = books;
                Ok(self.books.len())
            }
            Err(e) => {
                tracing::error!("❌ Search failed: {}", e);
                self.books.clear();
                Err(e)
            }
        }
    }

    /// 載入下一頁並追加；沒有更多資料時不發請求
    pub async fn load_next(&mut self) -> Result<usize> {
        if !self.has_more {
            return Ok(0);
        }

        let query = BookQuery::page(&self.table, &self.filter, self.page, self.page_size);
        let books = match self.source.fetch_books(&query).await {
            Ok(books) => books,
            Err(e) => {
                tracing::error!("❌ Loading page {} failed: {}", self.page, e);
                return Err(e);
            }
        };

        let received = books.len();
        if received < self.page_size {
            self.has_more = false;
        }
        self.books.extend(books);
        self.page += 1;

        tracing::debug!(
            "📚 Page {} brought {} books ({} loaded, more: {})",
            self.page - 1,
            received,
            self.books.len(),
            self.has_more
        );
        Ok(received)
    }

    /// 連續載入直到沒有資料或達到頁數上限
    pub async fn load_all(&mut self, max_pages: Option<usize>) -> Result<usize> {
        let mut pages = 0;
        while self.has_more {
            if max_pages.is_some_and(|max| pages >= max) {
                break;
            }
            self.load_next().await?;
            pages += 1;
        }
        Ok(self.books.len())
    }

    pub fn select_index(&mut self, index: usize) -> Option<&Book> {
        if index < self.books.len() {
            self.selected = Some(index);
            self.books.get(index)
        } else {
            None
        }
    }

    pub fn select_id(&mut self, id: &str) -> Option<&Book> {
        let index = self.books.iter().position(|b| b.id() == Some(id))?;
        self.select_index(index)
    }

    pub fn selected(&self) -> Option<&Book> {
        self.selected.and_then(|i| self.books.get(i))
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// 先找已載入的書，找不到再向資料服務查詢
    pub async fn find(&self, id: &str) -> Result<Book> {
        if let Some(book) = self.books.iter().find(|b| b.id() == Some(id)) {
            return Ok(book.clone());
        }

        let query = BookQuery::by_id(&self.table, id);
        self.source
            .fetch_books(&query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::NotFound { id: id.to_string() })
    }

    /// 載入篩選選項；失敗只記錄，選單保持空白
    pub async fn load_filter_options<F: FilterSource + ?Sized>(&mut self, source: &F) -> bool {
        self.menu.load(source).await
    }

    pub fn category_options(&self) -> &[FilterOption] {
        self.menu.categories()
    }

    pub fn city_options(&self) -> &[FilterOption] {
        self.menu.cities()
    }

    pub fn century_options(&self) -> Vec<FilterOption> {
        self.menu.centuries()
    }
}
