use crate::domain::model::book::{AddBookRequest, Book};
use crate::domain::model::library::Library;
use crate::domain::model::query::LibraryQuery;
use crate::domain::model::statistics::Statistics;
use crate::domain::repository::LibraryRepository;

use super::error::AppError;

/// 蔵書に対するユースケース。
/// 起動時に一度だけloadし、以降はメモリ上のLibraryを正とする。
/// 変更系は mutate → save（全体スナップショット）の順で同期的に永続化する。
pub struct LibraryService<R: LibraryRepository> {
    repo: R,
    library: Library,
}

impl<R: LibraryRepository> LibraryService<R> {
    /// ストレージからLibraryを読み込んでServiceを作る。
    pub fn open(repo: R) -> Self {
        let library = repo.load();
        Self { repo, library }
    }

    /// 書籍を検証して末尾に追加し、永続化する。
    /// 検証エラー時はメモリ・ストレージとも変更しない。
    pub fn add_book(&mut self, req: AddBookRequest) -> Result<Book, AppError> {
        let book = Book::new(req)?;
        self.library.add(book.clone());
        tracing::info!(title = book.title(), total = self.library.len(), "book added");
        self.persist()?;
        Ok(book)
    }

    /// titleが完全一致する書籍を全て削除し、永続化する。該当なしでも成功。
    pub fn remove_book(&mut self, title: &str) -> Result<usize, AppError> {
        let removed = self.library.remove_by_title(title);
        tracing::info!(title, removed, "remove by title");
        self.persist()?;
        Ok(removed)
    }

    /// フィルタ・ソート済みの書籍一覧。ストレージには触れない。
    pub fn query(&self, query: &LibraryQuery) -> Vec<&Book> {
        self.library.query(query)
    }

    pub fn statistics(&self) -> Statistics {
        self.library.statistics()
    }

    /// 削除セレクタ用のtitle一覧（挿入順）。
    pub fn titles(&self) -> Vec<&str> {
        self.library.titles()
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    // --- private ---

    // 失敗してもメモリ側は巻き戻さない
    fn persist(&self) -> Result<(), AppError> {
        self.repo
            .save(&self.library)
            .map_err(|e| AppError::Storage(Box::new(e)))
    }
}
