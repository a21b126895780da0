use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    library_mcp::logging::init();

    let library_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("library.json"));

    library_mcp::interface::mcp::run(library_path).await
}
