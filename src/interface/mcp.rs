//! MCP Server for library-mcp
//!
//! MCP Protocol (stdio) <-> application::LibraryService / ReportService
//!
//! 6 tools: add_book, remove_book, book_titles, list_books, statistics, export

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use rmcp::{
    handler::server::{tool::ToolCallContext, tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolRequestParams, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
    transport::stdio,
    ErrorData as McpError, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::application::error::AppError;
use crate::application::report::{ExportConfig, ExportFormat, ReportService};
use crate::application::service::LibraryService;
use crate::domain::model::book::AddBookRequest;
use crate::domain::model::query::{LibraryQuery, ReadFilter, SortKey};
use crate::infra::json_store::JsonLibraryRepository;

// =============================================================================
// Public entry point
// =============================================================================

/// MCP Serverを起動する。library_pathは蔵書JSONファイル。
pub async fn run(library_path: PathBuf) -> anyhow::Result<()> {
    let server = LibraryMcpServer::new(library_path);
    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}

// =============================================================================
// MCP Server
// =============================================================================

#[derive(Clone)]
struct LibraryMcpServer {
    library: Arc<Mutex<LibraryService<JsonLibraryRepository>>>,
    tool_router: ToolRouter<Self>,
}

impl LibraryMcpServer {
    /// 起動時に一度だけ蔵書を読み込む。
    fn new(library_path: PathBuf) -> Self {
        let repo = JsonLibraryRepository::new(library_path);
        Self {
            library: Arc::new(Mutex::new(LibraryService::open(repo))),
            tool_router: Self::tool_router(),
        }
    }

    fn service(&self) -> Result<MutexGuard<'_, LibraryService<JsonLibraryRepository>>, McpError> {
        self.library
            .lock()
            .map_err(|_| McpError::internal_error("Lock poisoned", None))
    }

    fn to_mcp_error(e: AppError) -> McpError {
        match e {
            AppError::Domain(_) => McpError::invalid_params(format!("{e}"), None),
            _ => McpError::internal_error(format!("{e}"), None),
        }
    }
}

// =============================================================================
// ServerHandler impl
// =============================================================================

impl ServerHandler for LibraryMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "library-mcp".to_string(),
                title: Some("Library MCP — Personal Book Collection".to_string()),
                description: Some(
                    "Personal library manager. Add, remove, search, filter and sort books, \
                     and view reading statistics."
                        .to_string(),
                ),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Manage a personal book collection.\n\
                 \n\
                 Tools: `add_book` to record a book, `book_titles` → `remove_book` to delete, \
                 `list_books` to search/filter/sort, `statistics` for read/unread counts, \
                 `export` to write a listing file."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let tool_ctx = ToolCallContext::new(self, request, context);
        self.tool_router.call(tool_ctx).await
    }
}

// =============================================================================
// Request types
// =============================================================================

fn parse_read_filter(s: &str) -> Result<ReadFilter, McpError> {
    match s.to_ascii_lowercase().as_str() {
        "all" => Ok(ReadFilter::All),
        "read" => Ok(ReadFilter::Read),
        "unread" => Ok(ReadFilter::Unread),
        _ => Err(McpError::invalid_params(
            format!("Unknown read_filter: '{s}'. Use: all, read, unread"),
            None,
        )),
    }
}

fn parse_sort_key(s: &str) -> Result<SortKey, McpError> {
    match s.to_ascii_lowercase().as_str() {
        "title" => Ok(SortKey::Title),
        "author" => Ok(SortKey::Author),
        "year" => Ok(SortKey::Year),
        _ => Err(McpError::invalid_params(
            format!("Unknown sort_by: '{s}'. Use: title, author, year"),
            None,
        )),
    }
}

fn parse_export_format(s: Option<&str>) -> Result<ExportFormat, McpError> {
    match s {
        Some("markdown") | None => Ok(ExportFormat::Markdown),
        Some("json") => Ok(ExportFormat::Json),
        Some(other) => Err(McpError::invalid_params(
            format!("Unknown format: '{other}'. Use: markdown, json"),
            None,
        )),
    }
}

/// 省略値は search="", read_filter=all, sort_by=title。
fn build_query(
    search: Option<String>,
    read_filter: Option<&str>,
    sort_by: Option<&str>,
) -> Result<LibraryQuery, McpError> {
    let read_filter = read_filter
        .map(parse_read_filter)
        .transpose()?
        .unwrap_or_default();
    let sort_key = sort_by.map(parse_sort_key).transpose()?.unwrap_or_default();
    Ok(LibraryQuery::new(
        search.unwrap_or_default(),
        read_filter,
        sort_key,
    ))
}

/// filenameにパス区切り文字や".."が含まれていないことを検証する。
fn validate_filename(filename: &str) -> Result<(), McpError> {
    if filename.contains('/')
        || filename.contains('\\')
        || filename.contains("..")
        || filename.is_empty()
    {
        return Err(McpError::invalid_params(
            "filename must not contain path separators, '..', or be empty",
            None,
        ));
    }
    Ok(())
}

/// 2つのパスが同じファイルを指すか。存在しないディレクトリは字句的に絶対化して比べる。
fn same_file_path(a: &Path, b: &Path) -> bool {
    resolve_path(a) == resolve_path(b)
}

fn resolve_path(path: &Path) -> PathBuf {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let dir = std::fs::canonicalize(parent)
        .or_else(|_| std::path::absolute(parent))
        .unwrap_or_else(|_| parent.to_path_buf());
    match path.file_name() {
        Some(name) => dir.join(name),
        None => dir,
    }
}

/// 削除セレクタ用の番号付きtitle一覧。
fn format_titles(titles: &[&str]) -> String {
    if titles.is_empty() {
        return "No books available to remove.".to_string();
    }
    let mut output = format!("# Books ({})\n\n", titles.len());
    for (i, title) in titles.iter().enumerate() {
        output.push_str(&format!("{}. {}\n", i + 1, title));
    }
    output
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpAddBookRequest {
    #[schemars(description = "Book title (required, used to remove the book later)")]
    pub title: String,
    #[schemars(description = "Author (required)")]
    pub author: String,
    #[schemars(description = "Publication year (0 or later)")]
    pub year: i64,
    #[schemars(description = "Genre (required)")]
    pub genre: String,
    #[schemars(description = "Whether the book has been read (default: false)")]
    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpRemoveBookRequest {
    #[schemars(
        description = "Exact title (case-sensitive) from `book_titles`. Every book with this title is removed."
    )]
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpBookTitlesRequest {}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpListBooksRequest {
    #[schemars(
        description = "Case-insensitive text matched against title, author, or genre. Omit to match all."
    )]
    pub search: Option<String>,
    #[schemars(description = "Read status filter: all, read, unread (default: all)")]
    pub read_filter: Option<String>,
    #[schemars(
        description = "Sort key: title, author (A-Z, case-insensitive) or year (newest first). Default: title"
    )]
    pub sort_by: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpStatisticsRequest {}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpExportRequest {
    #[schemars(description = "Same as `list_books` search. Omit to export all.")]
    pub search: Option<String>,
    #[schemars(description = "Read status filter: all, read, unread (default: all)")]
    pub read_filter: Option<String>,
    #[schemars(description = "Sort key: title, author, year (default: title)")]
    pub sort_by: Option<String>,
    #[schemars(description = "Output format: markdown or json (default: markdown)")]
    pub format: Option<String>,
    #[schemars(description = "Output directory (default: current directory)")]
    pub output_dir: Option<String>,
    #[schemars(description = "Output filename (default: library-export.md / library-export.json). Must not be the library file.")]
    pub filename: Option<String>,
}

// =============================================================================
// Tool implementations
// =============================================================================

#[tool_router]
impl LibraryMcpServer {
    #[tool(
        name = "add_book",
        description = "Add a book to the library. title, author and genre must not be blank; year must be 0 or later. Duplicates are allowed.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = false
        )
    )]
    async fn add_book(
        &self,
        Parameters(req): Parameters<McpAddBookRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut svc = self.service()?;

        let book = svc
            .add_book(AddBookRequest {
                title: req.title,
                author: req.author,
                year: req.year,
                genre: req.genre,
                read: req.read,
            })
            .map_err(Self::to_mcp_error)?;

        // 変更後は統計を取り直して返す
        let stats = ReportService::render_statistics(&svc.statistics());
        Ok(CallToolResult::success(vec![Content::text(format!(
            "'{}' added successfully!\n\n{}",
            book.title(),
            stats
        ))]))
    }

    #[tool(
        name = "remove_book",
        description = "Remove every book whose title exactly matches (case-sensitive). Use `book_titles` to see titles. Removing a missing title is not an error.",
        annotations(
            read_only_hint = false,
            destructive_hint = true,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn remove_book(
        &self,
        Parameters(req): Parameters<McpRemoveBookRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut svc = self.service()?;
        let removed = svc.remove_book(&req.title).map_err(Self::to_mcp_error)?;

        let message = match removed {
            0 => format!("No book titled '{}'. Nothing removed.", req.title),
            1 => format!("'{}' removed successfully!", req.title),
            n => format!("'{}' removed successfully! ({} copies)", req.title, n),
        };
        let stats = ReportService::render_statistics(&svc.statistics());
        Ok(CallToolResult::success(vec![Content::text(format!(
            "{message}\n\n{stats}"
        ))]))
    }

    #[tool(
        name = "book_titles",
        description = "List every book title in library order, numbered. Use these titles with `remove_book`.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn book_titles(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpBookTitlesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let svc = self.service()?;
        Ok(CallToolResult::success(vec![Content::text(format_titles(
            &svc.titles(),
        ))]))
    }

    #[tool(
        name = "list_books",
        description = "Show books matching a search text and read status, sorted by title, author or year. All arguments are optional.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn list_books(
        &self,
        Parameters(req): Parameters<McpListBooksRequest>,
    ) -> Result<CallToolResult, McpError> {
        let query = build_query(
            req.search,
            req.read_filter.as_deref(),
            req.sort_by.as_deref(),
        )?;

        let svc = self.service()?;
        let books = svc.query(&query);
        Ok(CallToolResult::success(vec![Content::text(
            ReportService::render_listing(&books),
        )]))
    }

    #[tool(
        name = "statistics",
        description = "Show total, read and unread counts with percentages over the whole library.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn statistics(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpStatisticsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let svc = self.service()?;
        Ok(CallToolResult::success(vec![Content::text(
            ReportService::render_statistics(&svc.statistics()),
        )]))
    }

    #[tool(
        name = "export",
        description = "Write the (optionally filtered and sorted) book listing to a Markdown or JSON file. JSON output uses the library file format. Library is NOT modified.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn export(
        &self,
        Parameters(req): Parameters<McpExportRequest>,
    ) -> Result<CallToolResult, McpError> {
        let query = build_query(
            req.search,
            req.read_filter.as_deref(),
            req.sort_by.as_deref(),
        )?;
        let format = parse_export_format(req.format.as_deref())?;

        let filename = req
            .filename
            .unwrap_or_else(|| format!("library-export.{}", format.extension()));
        validate_filename(&filename)?;

        let config = ExportConfig {
            output_dir: req
                .output_dir
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            filename,
            format,
        };

        let svc = self.service()?;
        // 出力先が蔵書ファイル自身なら書き込まない
        let target = config.output_dir.join(&config.filename);
        if same_file_path(&target, svc.repository().path()) {
            return Err(McpError::invalid_params(
                format!(
                    "Export target '{}' is the library file itself. Choose another filename or output_dir.",
                    target.display()
                ),
                None,
            ));
        }

        let books = svc.query(&query);
        let path = ReportService::export(&books, &config).map_err(Self::to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Exported {} books to: {}",
            books.len(),
            path.display()
        ))]))
    }
}

// =============================================================================
// Tests
// =============================================================================
