//! Spreadsheet export
//!
//! Serializes one owner's stored posts into an `.xlsx` workbook.

use std::sync::Arc;

use rust_xlsxwriter::{Format, Workbook};

use crate::data::{Database, ExternalId, Post};
use crate::error::AppError;
use crate::metrics::EXPORTS_TOTAL;

/// Name of the single worksheet in an export
pub const POSTS_SHEET_NAME: &str = "Posts";

/// Header row of an export
pub const POSTS_HEADERS: [&str; 3] = ["User ID", "Title", "Body"];

const COLUMN_WIDTHS: [f64; 3] = [10.0, 50.0, 80.0];

/// Most characters an Excel cell can hold
pub const MAX_CELL_CHARS: usize = 32_767;

/// Cut text to what fits in one cell, on a char boundary.
fn cell_text(text: &str) -> &str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Build a workbook with a header row and one row per post, in slice order.
pub fn build_posts_workbook(posts: &[Post]) -> Result<Vec<u8>, AppError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(POSTS_SHEET_NAME)?;

    for (col, (header, width)) in POSTS_HEADERS.iter().zip(COLUMN_WIDTHS).enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, *header, &header_format)?;
        worksheet.set_column_width(col, width)?;
    }

    for (index, post) in posts.iter().enumerate() {
        let row = index as u32 + 1;
        worksheet.write_number(row, 0, post.user_id as f64)?;
        worksheet.write_string(row, 1, cell_text(&post.title))?;
        worksheet.write_string(row, 2, cell_text(&post.body))?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Export service
pub struct ExportService {
    db: Arc<Database>,
}

impl ExportService {
    /// Create new export service
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Export every stored post of the owner as `.xlsx` bytes.
    ///
    /// An owner with no posts yields a sheet with only the header row.
    pub async fn export_user_posts(&self, owner: ExternalId) -> Result<Vec<u8>, AppError> {
        let posts = self.db.get_posts_by_owner(owner).await?;
        let rows = posts.len();

        // Workbook assembly and zip compression are CPU bound
        let result = tokio::task::spawn_blocking(move || build_posts_workbook(&posts))
            .await
            .map_err(|e| AppError::Internal(e.into()))?;

        match &result {
            Ok(bytes) => {
                EXPORTS_TOTAL.with_label_values(&["success"]).inc();
                tracing::info!(
                    api_user_id = owner,
                    rows,
                    bytes = bytes.len(),
                    "Posts exported"
                );
            }
            Err(error) => {
                EXPORTS_TOTAL.with_label_values(&["error"]).inc();
                tracing::error!(api_user_id = owner, %error, "Posts export failed");
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PostContent;
    use calamine::{Data, Reader, Xlsx};
    use chrono::Utc;
    use tempfile::TempDir;

    fn read_rows(bytes: Vec<u8>) -> Vec<Vec<Data>> {
        let mut workbook: Xlsx<_> = Xlsx::new(std::io::Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range(POSTS_SHEET_NAME).unwrap();
        range.rows().map(|row| row.to_vec()).collect()
    }

    fn header_row() -> Vec<Data> {
        POSTS_HEADERS
            .iter()
            .map(|header| Data::String(header.to_string()))
            .collect()
    }

    fn post(id: i64, user_id: ExternalId, title: &str, body: &str) -> Post {
        Post {
            id,
            user_id,
            title: title.to_string(),
            body: body.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn workbook_without_posts_has_only_headers() {
        let rows = read_rows(build_posts_workbook(&[]).unwrap());
        assert_eq!(rows, vec![header_row()]);
    }

    #[test]
    fn workbook_has_one_row_per_post() {
        let posts = vec![
            post(1, 3, "first", "body one"),
            post(2, 3, "second", "body\nwith newline"),
        ];

        let rows = read_rows(build_posts_workbook(&posts).unwrap());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], header_row());
        assert_eq!(
            rows[1],
            vec![
                Data::Float(3.0),
                Data::String("first".to_string()),
                Data::String("body one".to_string()),
            ]
        );
        assert_eq!(rows[2][2], Data::String("body\nwith newline".to_string()));
    }

    #[test]
    fn cell_text_keeps_short_text_and_cuts_long_text_on_char_boundary() {
        assert_eq!(cell_text("short"), "short");

        let exact = "x".repeat(MAX_CELL_CHARS);
        assert_eq!(cell_text(&exact).len(), MAX_CELL_CHARS);

        let wide = "é".repeat(MAX_CELL_CHARS + 10);
        let cut = cell_text(&wide);
        assert_eq!(cut.chars().count(), MAX_CELL_CHARS);
        assert!(cut.chars().all(|c| c == 'é'));
    }

    #[tokio::test]
    async fn export_keeps_rows_with_oversized_text() {
        let temp_dir = TempDir::new().unwrap();
        let db = Arc::new(
            Database::connect(&temp_dir.path().join("service-export-long.db"))
                .await
                .unwrap(),
        );
        db.insert_posts(
            7,
            &[
                PostContent::new("long", "b".repeat(40_000)),
                PostContent::new("short", "ok"),
            ],
        )
        .await
        .unwrap();

        let rows = read_rows(ExportService::new(db).export_user_posts(7).await.unwrap());

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][1], Data::String("long".to_string()));
        assert_eq!(rows[1][2], Data::String("b".repeat(MAX_CELL_CHARS)));
        assert_eq!(rows[2][2], Data::String("ok".to_string()));
    }

    #[tokio::test]
    async fn export_reads_only_the_owners_posts() {
        let temp_dir = TempDir::new().unwrap();
        let db = Arc::new(
            Database::connect(&temp_dir.path().join("service-export.db"))
                .await
                .unwrap(),
        );
        db.insert_posts(
            7,
            &[PostContent::new("T1", "B1"), PostContent::new("T2", "B2")],
        )
        .await
        .unwrap();
        db.insert_posts(8, &[PostContent::new("other", "owner")])
            .await
            .unwrap();

        let service = ExportService::new(db);
        let rows = read_rows(service.export_user_posts(7).await.unwrap());

        assert_eq!(rows.len(), 3);
        let mut titles: Vec<&Data> = rows[1..].iter().map(|row| &row[1]).collect();
        titles.sort_by_key(|cell| cell.to_string());
        assert_eq!(
            titles,
            vec![
                &Data::String("T1".to_string()),
                &Data::String("T2".to_string())
            ]
        );
        assert!(rows[1..].iter().all(|row| row[0] == Data::Float(7.0)));
    }
}
