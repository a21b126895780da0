use super::model::library::Library;

/// 永続化の抽象。Infra層が実装する。
///
/// `load` は失敗しない。存在しない・壊れたストレージは空のLibraryとして扱う。
pub trait LibraryRepository {
    type Error: std::error::Error + Send + Sync + 'static;

    fn load(&self) -> Library;
    fn save(&self, library: &Library) -> Result<(), Self::Error>;
}
