//! Renders the expenses report as an A4 portrait PDF.
//!
//! The document layout mirrors the expenses table: a title, the
//! generation date, a numbered row per expense with its description,
//! date, and formatted amount, and a grand-total footer.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, html::format_rupiah, record::Record};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const ROW_HEIGHT_MM: f32 = 7.0;

const TITLE_FONT_SIZE: f32 = 18.0;
const BODY_FONT_SIZE: f32 = 10.0;

// Column x positions.
const COL_NUMBER_MM: f32 = MARGIN_MM;
const COL_DESCRIPTION_MM: f32 = 30.0;
const COL_DATE_MM: f32 = 125.0;
const COL_AMOUNT_MM: f32 = 160.0;

/// Descriptions longer than this are cut off so they cannot run into
/// the date column.
const DESCRIPTION_DISPLAY_LIMIT: usize = 56;

/// The generation date format, e.g. "05 Aug 2026".
const REPORT_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[day] [month repr:short] [year]");

struct ReportWriter {
    document: printpdf::PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    cursor_mm: f32,
}

impl ReportWriter {
    fn new(title: &str) -> Result<Self, Error> {
        let (document, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "report");

        let regular = document
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(render_error)?;
        let bold = document
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(render_error)?;
        let layer = document.get_page(page).get_layer(layer);

        Ok(Self {
            document,
            layer,
            regular,
            bold,
            cursor_mm: PAGE_HEIGHT_MM - MARGIN_MM,
        })
    }

    /// Move the cursor down one row, breaking onto a fresh page when
    /// the current one is full.
    fn advance_row(&mut self) {
        self.cursor_mm -= ROW_HEIGHT_MM;

        if self.cursor_mm < MARGIN_MM {
            let (page, layer) =
                self.document
                    .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "report");
            self.layer = self.document.get_page(page).get_layer(layer);
            self.cursor_mm = PAGE_HEIGHT_MM - MARGIN_MM;
        }
    }

    fn text(&self, content: &str, size: f32, x_mm: f32, font: &IndirectFontRef) {
        self.layer
            .use_text(content, size, Mm(x_mm), Mm(self.cursor_mm), font);
    }

    fn header_row(&mut self) {
        self.text("#", BODY_FONT_SIZE, COL_NUMBER_MM, &self.bold);
        self.text("Description", BODY_FONT_SIZE, COL_DESCRIPTION_MM, &self.bold);
        self.text("Date", BODY_FONT_SIZE, COL_DATE_MM, &self.bold);
        self.text("Amount", BODY_FONT_SIZE, COL_AMOUNT_MM, &self.bold);
        self.advance_row();
    }

    fn record_row(&mut self, row_number: usize, record: &Record) {
        self.text(
            &row_number.to_string(),
            BODY_FONT_SIZE,
            COL_NUMBER_MM,
            &self.regular,
        );
        self.text(
            &clip_description(&record.description),
            BODY_FONT_SIZE,
            COL_DESCRIPTION_MM,
            &self.regular,
        );
        self.text(
            &record.date.to_string(),
            BODY_FONT_SIZE,
            COL_DATE_MM,
            &self.regular,
        );
        self.text(
            &format_rupiah(record.amount),
            BODY_FONT_SIZE,
            COL_AMOUNT_MM,
            &self.regular,
        );
        self.advance_row();
    }

    fn finish(self) -> Result<Vec<u8>, Error> {
        self.document.save_to_bytes().map_err(render_error)
    }
}

fn render_error(error: printpdf::Error) -> Error {
    Error::RenderError(error.to_string())
}

fn clip_description(description: &str) -> String {
    if description.chars().count() <= DESCRIPTION_DISPLAY_LIMIT {
        return description.to_owned();
    }

    let clipped: String = description.chars().take(DESCRIPTION_DISPLAY_LIMIT).collect();
    format!("{clipped}…")
}

/// Render the expenses report for `records` with their `total`, dated
/// `generated_on`.
///
/// `records` must already be the complete filtered set in list order,
/// and `total` the matching aggregate, so the report shows exactly
/// what the list pages show. An empty set renders an empty table with
/// a zero total.
///
/// # Errors
/// Returns an [Error::RenderError] if the document cannot be built; no
/// partial document is returned.
pub fn render_expenses_pdf(
    records: &[Record],
    total: i64,
    generated_on: Date,
) -> Result<Vec<u8>, Error> {
    let mut writer = ReportWriter::new("Expenses Report")?;

    writer.text("Expenses Report", TITLE_FONT_SIZE, MARGIN_MM, &writer.bold);
    writer.advance_row();

    let date_line = generated_on
        .format(REPORT_DATE_FORMAT)
        .map_err(|error| Error::RenderError(error.to_string()))?;
    writer.text(
        &format!("Date: {date_line}"),
        BODY_FONT_SIZE,
        MARGIN_MM,
        &writer.regular,
    );
    writer.advance_row();
    writer.advance_row();

    writer.header_row();

    for (index, record) in records.iter().enumerate() {
        writer.record_row(index + 1, record);
    }

    writer.advance_row();
    writer.text("Total", BODY_FONT_SIZE, COL_DATE_MM, &writer.bold);
    writer.text(
        &format_rupiah(total),
        BODY_FONT_SIZE,
        COL_AMOUNT_MM,
        &writer.bold,
    );

    writer.finish()
}
