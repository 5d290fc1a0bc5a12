//! Spreadsheet export of review batches.

use revscope_core::Review;
use rust_xlsxwriter::Workbook;

use crate::error::TextError;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const SHEET_NAME: &str = "Sheet1";
const HEADERS: [&str; 3] = ["title", "text", "class"];

/// Render `reviews` as a one-sheet `.xlsx` workbook and return its bytes.
///
/// Row 0 holds the headers; each review follows in input order. Missing
/// title or text cells are left blank. The store identifier is not written.
///
/// # Errors
///
/// Returns [`TextError::Export`] if the workbook cannot be built.
pub fn reviews_to_xlsx(reviews: &[Review]) -> Result<Vec<u8>, TextError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, header) in (0_u16..).zip(HEADERS) {
        sheet.write_string(0, col, header)?;
    }

    for (row, review) in (1_u32..).zip(reviews) {
        if let Some(title) = review.title.as_deref() {
            sheet.write_string(row, 0, title)?;
        }
        if let Some(text) = review.text.as_deref() {
            sheet.write_string(row, 1, text)?;
        }
        sheet.write_number(row, 2, f64::from(review.class))?;
    }

    let bytes = workbook.save_to_buffer()?;
    tracing::debug!(rows = reviews.len(), bytes = bytes.len(), "workbook rendered");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};

    use super::*;

    fn read_back(bytes: Vec<u8>) -> calamine::Range<Data> {
        let mut workbook: Xlsx<_> =
            open_workbook_from_rs(Cursor::new(bytes)).expect("valid xlsx");
        workbook.worksheet_range(SHEET_NAME).expect("Sheet1 exists")
    }

    #[test]
    fn writes_header_and_rows_without_id() {
        let reviews = vec![
            Review {
                id: 991,
                title: Some("Sturdy".to_string()),
                text: Some("Survived a drop".to_string()),
                class: 2,
            },
            Review {
                id: 992,
                title: None,
                text: Some("Stopped working".to_string()),
                class: 1,
            },
        ];

        let range = read_back(reviews_to_xlsx(&reviews).unwrap());

        assert_eq!(range.get_size(), (3, 3));
        assert_eq!(range.get((0, 0)), Some(&Data::String("title".to_string())));
        assert_eq!(range.get((0, 2)), Some(&Data::String("class".to_string())));
        assert_eq!(range.get((1, 1)), Some(&Data::String("Survived a drop".to_string())));
        assert_eq!(range.get((1, 2)), Some(&Data::Float(2.0)));
        assert_eq!(range.get((2, 0)), Some(&Data::Empty));
        assert!(range
            .cells()
            .all(|(_, _, cell)| *cell != Data::Float(991.0) && *cell != Data::Float(992.0)));
    }

    #[test]
    fn empty_batch_still_has_header() {
        let range = read_back(reviews_to_xlsx(&[]).unwrap());
        assert_eq!(range.get_size(), (1, 3));
    }
}
