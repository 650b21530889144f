use printpdf::{BuiltinFont, Mm, PdfDocument};

use super::layout::{LayoutSettings, LineStyle, Page, PaperSize};
use super::DocumentError;

/// Write placed pages into a PDF using the builtin Courier faces.
pub fn write_pdf(
    title: &str,
    pages: &[Page],
    paper: PaperSize,
    settings: &LayoutSettings,
) -> Result<Vec<u8>, DocumentError> {
    let width = Mm(paper.width_mm());
    let height = Mm(paper.height_mm());
    let (document, first_page, first_layer) = PdfDocument::new(title, width, height, "Layer 1");

    let regular = document
        .add_builtin_font(BuiltinFont::Courier)
        .map_err(|err| DocumentError::Font(err.to_string()))?;
    let bold = document
        .add_builtin_font(BuiltinFont::CourierBold)
        .map_err(|err| DocumentError::Font(err.to_string()))?;

    // Baseline sits one font size below the top of the line box.
    let ascent_mm = settings.font_size_pt * 25.4 / 72.0;

    for (index, page) in pages.iter().enumerate() {
        let layer = if index == 0 {
            document.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) = document.add_page(width, height, "Layer 1");
            document.get_page(page_index).get_layer(layer_index)
        };

        for line in &page.lines {
            let font = match line.style {
                LineStyle::Heading => &bold,
                LineStyle::Body => &regular,
            };
            let baseline = paper.height_mm() - line.y_mm - ascent_mm;
            layer.use_text(
                line.text.as_str(),
                settings.font_size_pt,
                Mm(line.x_mm),
                Mm(baseline),
                font,
            );
        }
    }

    document
        .save_to_bytes()
        .map_err(|err| DocumentError::Pdf(err.to_string()))
}
