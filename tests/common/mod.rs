//! Shared test harness for integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use library_mcp::application::service::LibraryService;
use library_mcp::domain::model::book::{AddBookRequest, Book};
use library_mcp::domain::model::library::Library;
use library_mcp::domain::repository::LibraryRepository;

// =============================================================================
// InMemoryRepo — テスト用リポジトリ
// =============================================================================

#[derive(Debug, thiserror::Error)]
#[error("in-memory store error")]
pub struct InMemoryError;

/// ファイルI/O不要のインメモリリポジトリ。
/// Clone したハンドルから保存内容を覗ける。
#[derive(Clone, Default)]
pub struct InMemoryRepo {
    store: Rc<RefCell<Option<String>>>,
    saves: Rc<Cell<usize>>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// 直近に保存されたJSON文書
    pub fn stored_json(&self) -> Option<String> {
        self.store.borrow().clone()
    }

    /// 直近に保存されたLibrary
    pub fn stored(&self) -> Option<Library> {
        self.stored_json()
            .map(|json| serde_json::from_str(&json).unwrap())
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl LibraryRepository for InMemoryRepo {
    type Error = InMemoryError;

    fn load(&self) -> Library {
        self.stored().unwrap_or_default()
    }

    fn save(&self, library: &Library) -> Result<(), Self::Error> {
        let json = serde_json::to_string(library).unwrap();
        *self.store.borrow_mut() = Some(json);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

// =============================================================================
// FailingRepo — 書き込みが常に失敗するリポジトリ
// =============================================================================

#[derive(Debug, thiserror::Error)]
#[error("disk full")]
pub struct DiskFull;

pub struct FailingRepo {
    initial: Library,
}

impl FailingRepo {
    pub fn with(initial: Library) -> Self {
        Self { initial }
    }
}

impl LibraryRepository for FailingRepo {
    type Error = DiskFull;

    fn load(&self) -> Library {
        self.initial.clone()
    }

    fn save(&self, _library: &Library) -> Result<(), Self::Error> {
        Err(DiskFull)
    }
}

// =============================================================================
// TestLibrary — テスト用蔵書
// =============================================================================

pub fn book(title: &str, author: &str, year: i64, genre: &str, read: bool) -> Book {
    Book::new(add_req(title, author, year, genre, read)).unwrap()
}

pub fn add_req(title: &str, author: &str, year: i64, genre: &str, read: bool) -> AddBookRequest {
    AddBookRequest {
        title: title.into(),
        author: author.into(),
        year,
        genre: genre.into(),
        read,
    }
}

pub struct TestLibrary;

impl TestLibrary {
    /// 標準的なテスト用蔵書（挿入順）:
    /// ```text
    /// Dune            Frank Herbert   1965 Sci-Fi   read
    /// the Hobbit      J.R.R. Tolkien  1937 Fantasy  read
    /// Neuromancer     William Gibson  1984 Sci-Fi   unread
    /// Piranesi        Susanna Clarke  2020 Fantasy  unread
    /// ```
    pub fn standard() -> Library {
        vec![
            book("Dune", "Frank Herbert", 1965, "Sci-Fi", true),
            book("the Hobbit", "J.R.R. Tolkien", 1937, "Fantasy", true),
            book("Neuromancer", "William Gibson", 1984, "Sci-Fi", false),
            book("Piranesi", "Susanna Clarke", 2020, "Fantasy", false),
        ]
        .into_iter()
        .collect()
    }

    /// InMemoryRepoにLibraryを保存してServiceを開く。repoハンドルも返す。
    pub fn service_with(library: &Library) -> (LibraryService<InMemoryRepo>, InMemoryRepo) {
        let repo = InMemoryRepo::new();
        repo.save(library).unwrap();
        (LibraryService::open(repo.clone()), repo)
    }
}

// =============================================================================
// Assertion helpers
// =============================================================================

/// 結果がErrで、メッセージに指定文字列を含むことをassert。
pub fn assert_error_contains<T: std::fmt::Debug>(
    result: Result<T, impl std::fmt::Display>,
    expected: &str,
) {
    match result {
        Err(e) => {
            let msg = e.to_string();
            assert!(
                msg.contains(expected),
                "Expected error containing '{expected}', got: '{msg}'"
            );
        }
        Ok(v) => panic!("Expected error containing '{expected}', got Ok({v:?})"),
    }
}

/// 検索結果のtitle一覧
pub fn titles(books: &[&Book]) -> Vec<String> {
    books.iter().map(|b| b.title().to_string()).collect()
}
