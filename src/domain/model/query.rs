use std::cmp::Ordering;

use super::book::Book;

/// 既読状態フィルタ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadFilter {
    #[default]
    All,
    Read,
    Unread,
}

impl ReadFilter {
    pub fn accepts(self, book: &Book) -> bool {
        match self {
            Self::All => true,
            Self::Read => book.is_read(),
            Self::Unread => !book.is_read(),
        }
    }
}

/// 並び順のキー。Title/Authorは大文字小文字を無視した昇順、Yearは降順。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Title,
    Author,
    Year,
}

impl SortKey {
    pub fn compare(self, a: &Book, b: &Book) -> Ordering {
        match self {
            Self::Title => a.title().to_lowercase().cmp(&b.title().to_lowercase()),
            Self::Author => a.author().to_lowercase().cmp(&b.author().to_lowercase()),
            Self::Year => b.year().cmp(&a.year()),
        }
    }
}

/// 検索条件。テキスト・既読フィルタの積集合をとってからソートする。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryQuery {
    pub search: String,
    pub read_filter: ReadFilter,
    pub sort_key: SortKey,
}

impl LibraryQuery {
    pub fn new(search: impl Into<String>, read_filter: ReadFilter, sort_key: SortKey) -> Self {
        Self {
            search: search.into(),
            read_filter,
            sort_key,
        }
    }

    /// title/author/genre のいずれかに部分一致すれば true（case-insensitive）。
    /// 空文字列は全件一致。
    pub fn matches_text(&self, book: &Book) -> bool {
        let needle = self.search.to_lowercase();
        [book.title(), book.author(), book.genre()]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn matches(&self, book: &Book) -> bool {
        self.matches_text(book) && self.read_filter.accepts(book)
    }

    /// フィルタ → 安定ソート。入力は変更しない。
    pub fn apply<'a>(&self, books: &'a [Book]) -> Vec<&'a Book> {
        let mut hits: Vec<&Book> = books.iter().filter(|b| self.matches(b)).collect();
        hits.sort_by(|a, b| self.sort_key.compare(a, b));
        hits
    }
}
