use std::path::PathBuf;

use crate::domain::model::book::Book;
use crate::domain::model::statistics::Statistics;

use super::error::AppError;

/// Export出力フォーマット
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Json => "json",
        }
    }
}

/// Export設定
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub filename: String,
    pub format: ExportFormat,
}

/// 検索結果・統計 → 表示用テキストへの変換
pub struct ReportService;

impl ReportService {
    /// 書籍一覧をMarkdownに変換する。空なら案内文のみ。
    pub fn render_listing(books: &[&Book]) -> String {
        if books.is_empty() {
            return "No matching books found.\n".to_string();
        }

        let mut buf = format!("# Library Collection ({} books)\n\n", books.len());
        for (i, book) in books.iter().enumerate() {
            if i > 0 {
                buf.push_str("---\n\n");
            }
            Self::render_book(book, &mut buf);
        }
        buf
    }

    /// 統計をテキストに変換する。蔵書0件なら案内文のみ。
    pub fn render_statistics(stats: &Statistics) -> String {
        match (stats.read_percent, stats.unread_percent) {
            (Some(read_pct), Some(unread_pct)) => format!(
                "# Library Statistics\n\n\
                 Total Books: {}\n\
                 Books Read: {} ({:.2}%)\n\
                 Books Unread: {} ({:.2}%)\n",
                stats.total, stats.read_count, read_pct, stats.unread_count, unread_pct
            ),
            _ => "No books in the library yet.\n".to_string(),
        }
    }

    /// 書籍一覧を保存形式と同じJSON配列に変換する。
    pub fn render_json(books: &[&Book]) -> Result<String, AppError> {
        serde_json::to_string_pretty(books).map_err(|e| AppError::Storage(Box::new(e)))
    }

    /// ファイルに書き出す。
    pub fn export(books: &[&Book], config: &ExportConfig) -> Result<PathBuf, AppError> {
        let content = match config.format {
            ExportFormat::Markdown => Self::render_listing(books),
            ExportFormat::Json => Self::render_json(books)?,
        };

        let path = config.output_dir.join(&config.filename);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(AppError::ExportIo)?;
        }

        std::fs::write(&path, content).map_err(AppError::ExportIo)?;
        tracing::info!(path = %path.display(), books = books.len(), "listing exported");
        Ok(path)
    }

    fn render_book(book: &Book, buf: &mut String) {
        buf.push_str(&format!(
            "**{}** by *{}* ({})\n",
            book.title(),
            book.author(),
            book.year()
        ));
        let read = if book.is_read() { "Yes" } else { "No" };
        buf.push_str(&format!("Genre: {} | Read: {}\n\n", book.genre(), read));
    }
}
