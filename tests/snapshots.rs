//! Snapshot tests — render_listing, render_statistics, storage document regression detection.

mod common;

use common::TestLibrary;
use insta::{assert_json_snapshot, assert_snapshot};

use library_mcp::application::report::ReportService;
use library_mcp::domain::model::query::{LibraryQuery, ReadFilter, SortKey};

// =============================================================================
// Listing snapshots
// =============================================================================

#[test]
fn snapshot_listing_by_title() {
    let library = TestLibrary::standard();
    let books = library.query(&LibraryQuery::new("", ReadFilter::All, SortKey::Title));
    let md = ReportService::render_listing(&books);
    assert_snapshot!("listing_by_title", md);
}

#[test]
fn snapshot_listing_read_by_year() {
    let library = TestLibrary::standard();
    let books = library.query(&LibraryQuery::new("", ReadFilter::Read, SortKey::Year));
    let md = ReportService::render_listing(&books);
    assert_snapshot!("listing_read_by_year", md);
}

// =============================================================================
// Statistics snapshots
// =============================================================================

#[test]
fn snapshot_statistics_standard() {
    let stats = TestLibrary::standard().statistics();
    assert_snapshot!("statistics_standard", ReportService::render_statistics(&stats));
}

// =============================================================================
// Storage document snapshot
// =============================================================================

#[test]
fn snapshot_storage_document() {
    assert_json_snapshot!("storage_document", TestLibrary::standard());
}
