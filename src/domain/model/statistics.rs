use super::book::Book;

/// 蔵書全体（フィルタ前）の集計。
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    pub total: usize,
    pub read_count: usize,
    pub unread_count: usize,
    /// total == 0 のときは None（0除算しない）
    pub read_percent: Option<f64>,
    pub unread_percent: Option<f64>,
}

impl Statistics {
    pub fn from_books(books: &[Book]) -> Self {
        let total = books.len();
        let read_count = books.iter().filter(|b| b.is_read()).count();
        let unread_count = total - read_count;

        Self {
            total,
            read_count,
            unread_count,
            read_percent: percent(read_count, total),
            unread_percent: percent(unread_count, total),
        }
    }
}

/// count / total * 100 を小数第2位に丸める。
fn percent(count: usize, total: usize) -> Option<f64> {
    if total == 0 {
        return None;
    }
    let raw = count as f64 / total as f64 * 100.0;
    Some((raw * 100.0).round() / 100.0)
}
