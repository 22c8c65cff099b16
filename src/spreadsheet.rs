use crate::model::NutritionRecord;
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, Workbook, Worksheet, XlsxError};

pub const NUTRITIONAL_INFO_SHEET: &str = "Nutritional Info";
pub const OTHER_INGREDIENTS_SHEET: &str = "Other Ingredients";
pub const EXTRACTED_LINES_SHEET: &str = "Extracted Lines";

/// Sheet names in workbook order
pub const SHEET_NAMES: [&str; 3] = [
    NUTRITIONAL_INFO_SHEET,
    OTHER_INGREDIENTS_SHEET,
    EXTRACTED_LINES_SHEET,
];

/// MIME type of the produced buffer
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

// Excel rejects longer cell strings
const MAX_CELL_CHARS: usize = 32_767;

/// Render the normalized record and the raw OCR lines into an xlsx buffer.
///
/// Always produces the three sheets of [`SHEET_NAMES`], with headers even
/// when there are no data rows. Identical inputs give identical bytes.
pub fn build_workbook(record: &NutritionRecord, lines: &[String]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();

    // Pin the creation timestamp so output is reproducible
    let created = ExcelDateTime::from_ymd(2000, 1, 1)?;
    workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));

    let header_format = Format::new().set_bold();

    let nutrient_rows: Vec<Vec<&str>> = record
        .nutrients
        .iter()
        .map(|(name, amount)| vec![name.as_str(), amount.as_str()])
        .collect();
    write_sheet(
        workbook.add_worksheet(),
        NUTRITIONAL_INFO_SHEET,
        &["Ingredient", "Amount"],
        &nutrient_rows,
        &header_format,
    )?;

    write_sheet(
        workbook.add_worksheet(),
        OTHER_INGREDIENTS_SHEET,
        &["Other Ingredients"],
        &[vec![record.other_ingredients.as_str()]],
        &header_format,
    )?;

    let line_rows: Vec<Vec<&str>> = lines.iter().map(|line| vec![line.as_str()]).collect();
    write_sheet(
        workbook.add_worksheet(),
        EXTRACTED_LINES_SHEET,
        &["Extracted Lines"],
        &line_rows,
        &header_format,
    )?;

    workbook.save_to_buffer()
}

fn write_sheet(
    worksheet: &mut Worksheet,
    name: &str,
    headers: &[&str],
    rows: &[Vec<&str>],
    header_format: &Format,
) -> Result<(), XlsxError> {
    worksheet.set_name(name)?;

    let mut widths: Vec<f64> = headers.iter().map(|h| estimate_text_width(h)).collect();

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, header_format)?;
    }

    for (row_idx, row) in rows.iter().enumerate() {
        let row_num = (row_idx + 1) as u32;
        for (col, value) in row.iter().enumerate() {
            worksheet.write_string(row_num, col as u16, sanitize_cell(value))?;
            if let Some(width) = widths.get_mut(col) {
                *width = width.max(estimate_text_width(value));
            }
        }
    }

    for (col, width) in widths.into_iter().enumerate() {
        worksheet.set_column_width(col as u16, width)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    Ok(())
}

/// Drop characters that are invalid in the sheet XML and cap the length
fn sanitize_cell(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            let u = c as u32;
            c == '\t' || c == '\n' || c == '\r' || !(u < 0x20 || u == 0x7F || u == 0xFFFE || u == 0xFFFF)
        })
        .take(MAX_CELL_CHARS)
        .collect()
}

fn estimate_text_width(text: &str) -> f64 {
    let w = text.chars().count() as f64 * 1.2;
    w.clamp(10.0, 80.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_cell_strips_control_characters() {
        assert_eq!(sanitize_cell("Zinc\u{0}11mg"), "Zinc11mg");
        assert_eq!(sanitize_cell("Vitamins A & D"), "Vitamins A & D");
        assert_eq!(sanitize_cell("a\tb"), "a\tb");
    }

    #[test]
    fn test_sanitize_cell_caps_length() {
        let long = "x".repeat(MAX_CELL_CHARS + 10);
        assert_eq!(sanitize_cell(&long).chars().count(), MAX_CELL_CHARS);
    }

    #[test]
    fn test_estimate_text_width_bounds() {
        assert_eq!(estimate_text_width(""), 10.0);
        assert_eq!(estimate_text_width(&"x".repeat(500)), 80.0);
    }

    #[test]
    fn test_build_workbook_produces_zip() {
        let bytes = build_workbook(&NutritionRecord::fallback(), &[]).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
