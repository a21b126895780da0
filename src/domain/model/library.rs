use serde::{Deserialize, Serialize};

use super::book::Book;
use super::query::LibraryQuery;
use super::statistics::Statistics;

/// Library — 集約ルート。挿入順を保持する蔵書の列。
/// 永続化形式はBookオブジェクトのJSON配列そのもの。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Library {
    books: Vec<Book>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// 末尾に追加する。重複チェックはしない。
    pub fn add(&mut self, book: Book) {
        self.books.push(book);
    }

    /// titleが完全一致（case-sensitive）するBookを全て削除し、削除件数を返す。
    pub fn remove_by_title(&mut self, title: &str) -> usize {
        let before = self.books.len();
        self.books.retain(|b| b.title() != title);
        before - self.books.len()
    }

    /// 全Bookのtitleを挿入順で返す（重複あり）。
    pub fn titles(&self) -> Vec<&str> {
        self.books.iter().map(|b| b.title()).collect()
    }

    pub fn query(&self, query: &LibraryQuery) -> Vec<&Book> {
        query.apply(&self.books)
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::from_books(&self.books)
    }
}

impl FromIterator<Book> for Library {
    fn from_iter<I: IntoIterator<Item = Book>>(iter: I) -> Self {
        Self {
            books: iter.into_iter().collect(),
        }
    }
}
