//! Printable document bundle for a candidate.
//!
//! Templates produce sections of headings, paragraphs, numbered clauses, and label/value
//! fields. Layout wraps them in a fixed-pitch font and places whole sections on pages;
//! the PDF writer draws the placed lines.

pub mod format;
pub mod layout;
pub mod pdf;
pub mod templates;

pub use layout::{paginate, LayoutSettings, Page, PaperSize};
pub use templates::{application_bundle, Block, DocumentContext, Section, SectionKind};

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to load font: {0}")]
    Font(String),
    #[error("failed to write pdf: {0}")]
    Pdf(String),
}

/// Rendered bundle ready to be sent as an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub file_name: String,
    pub page_count: usize,
    pub bytes: Vec<u8>,
}

/// Lay out and render the complete bundle for one candidate.
pub fn render_bundle(
    ctx: &DocumentContext<'_>,
    paper: PaperSize,
    file_name: impl Into<String>,
) -> Result<RenderedDocument, DocumentError> {
    let settings = LayoutSettings::default();
    let sections = application_bundle(ctx);
    let pages = paginate(&sections, paper, &settings);
    let title = format!("Application documents - {}", ctx.profile.name.trim());
    let bytes = pdf::write_pdf(&title, &pages, paper, &settings)?;

    tracing::debug!(
        sections = sections.len(),
        pages = pages.len(),
        bytes = bytes.len(),
        ?paper,
        "document bundle rendered"
    );

    Ok(RenderedDocument {
        file_name: file_name.into(),
        page_count: pages.len(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DocumentConfig;
    use crate::workflows::candidates::domain::CandidateProfile;

    #[test]
    fn bundle_renders_to_pdf_bytes() {
        let profile = CandidateProfile {
            name: "Asha Verma".to_string(),
            ..CandidateProfile::default()
        };
        let config = DocumentConfig::default();
        let ctx = DocumentContext {
            email: "asha@example.com",
            profile: &profile,
            exam: None,
            config: &config,
        };

        let rendered =
            render_bundle(&ctx, PaperSize::A4, "preview.pdf").expect("bundle renders");

        assert_eq!(rendered.file_name, "preview.pdf");
        assert!(rendered.page_count >= 3);
        assert!(rendered.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn legal_paper_needs_no_more_pages_than_a4() {
        let profile = CandidateProfile::default();
        let config = DocumentConfig::default();
        let ctx = DocumentContext {
            email: "",
            profile: &profile,
            exam: None,
            config: &config,
        };
        let settings = LayoutSettings::default();
        let sections = application_bundle(&ctx);

        let a4 = paginate(&sections, PaperSize::A4, &settings).len();
        let legal = paginate(&sections, PaperSize::Legal, &settings).len();
        assert!(legal <= a4);
    }
}
