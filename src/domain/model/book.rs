use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// 書籍追加リクエスト（未検証の入力）
#[derive(Debug, Clone)]
pub struct AddBookRequest {
    pub title: String,
    pub author: String,
    /// 負値は検証で弾く
    pub year: i64,
    pub genre: String,
    pub read: bool,
}

/// 蔵書1冊分のレコード。生成時・復元時ともに検証済み。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BookRecord")]
pub struct Book {
    title: String,
    author: String,
    year: u32,
    genre: String,
    read: bool,
}

/// 永続化形式そのままのレコード。Book復元時の検証に使う。
#[derive(Deserialize)]
struct BookRecord {
    title: String,
    author: String,
    year: i64,
    genre: String,
    read: bool,
}

impl TryFrom<BookRecord> for Book {
    type Error = DomainError;

    fn try_from(r: BookRecord) -> Result<Self, Self::Error> {
        Book::new(AddBookRequest {
            title: r.title,
            author: r.author,
            year: r.year,
            genre: r.genre,
            read: r.read,
        })
    }
}

impl Book {
    /// 入力を検証してBookを作る。title/author/genreは空白のみも不可。
    pub fn new(req: AddBookRequest) -> Result<Self, DomainError> {
        require_text("title", &req.title)?;
        require_text("author", &req.author)?;
        require_text("genre", &req.genre)?;

        if req.year < 0 {
            return Err(DomainError::NegativeYear(req.year));
        }
        let year = u32::try_from(req.year).map_err(|_| DomainError::YearOutOfRange(req.year))?;

        Ok(Self {
            title: req.title,
            author: req.author,
            year,
            genre: req.genre,
            read: req.read,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn is_read(&self) -> bool {
        self.read
    }
}

fn require_text(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::BlankField { field });
    }
    Ok(())
}
