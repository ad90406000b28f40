use lopdf::Document;
use thiserror::Error;

use crate::db::models::PageCitation;

#[derive(Debug, Error)]
pub(crate) enum ExtractError {
    #[error("failed to parse PDF document: {0}")]
    Malformed(#[from] lopdf::Error),
}

#[derive(Debug, Clone)]
pub(crate) struct ExtractedDocument {
    pub(crate) text: String,
    pub(crate) citations: Vec<PageCitation>,
}

/// Extracts the full text of a PDF together with per-page line-range
/// citations into the concatenated buffer. Malformed bytes are a hard error;
/// pages whose content stream cannot be decoded are skipped with a warning.
pub(crate) fn extract(pdf_bytes: &[u8]) -> Result<ExtractedDocument, ExtractError> {
    let document = Document::load_mem(pdf_bytes)?;

    let mut pages = Vec::new();
    for page_number in document.get_pages().keys() {
        match document.extract_text(&[*page_number]) {
            Ok(text) => pages.push((*page_number, text)),
            Err(err) => {
                tracing::warn!(page = page_number, error = %err, "Skipping unextractable page");
            }
        }
    }

    Ok(assemble_pages(pages))
}

fn assemble_pages(pages: Vec<(u32, String)>) -> ExtractedDocument {
    let mut buffer = String::new();
    let mut citations = Vec::new();

    for (page_number, page_text) in pages {
        if page_text.trim().is_empty() {
            continue;
        }

        // Line bookkeeping counts split('\n') segments of the buffer before
        // this page is appended, so consecutive citations are contiguous.
        let line_start = buffer.split('\n').count() as i64 + 1;
        let page_lines = page_text.split('\n').count() as i64;

        citations.push(PageCitation {
            page_number: i64::from(page_number),
            raw_text: page_text.clone(),
            line_start,
            line_end: line_start + page_lines - 1,
        });

        buffer.push_str(&page_text);
        buffer.push('\n');
    }

    ExtractedDocument { text: buffer.trim().to_string(), citations }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_bytes_are_rejected() {
        let result = extract(b"this is not a pdf");
        assert!(matches!(result, Err(ExtractError::Malformed(_))));
    }

    #[test]
    fn whitespace_pages_produce_no_citation() {
        let extracted = assemble_pages(vec![
            (1, "First page text".to_string()),
            (2, "   \n\t\n".to_string()),
            (3, "Third page text".to_string()),
        ]);

        assert_eq!(extracted.citations.len(), 2);
        assert_eq!(extracted.citations[0].page_number, 1);
        assert_eq!(extracted.citations[1].page_number, 3);
        assert!(!extracted.text.contains('\t'));
    }

    #[test]
    fn citation_ranges_are_contiguous_and_increasing() {
        let extracted = assemble_pages(vec![
            (1, "line a\nline b".to_string()),
            (2, "line c".to_string()),
            (3, "line d\nline e\nline f".to_string()),
        ]);

        let citations = &extracted.citations;
        assert_eq!(citations.len(), 3);

        for window in citations.windows(2) {
            assert!(window[0].line_start < window[1].line_start);
            assert_eq!(window[0].line_end + 1, window[1].line_start);
        }

        for citation in citations {
            let lines = citation.raw_text.split('\n').count() as i64;
            assert_eq!(citation.line_end - citation.line_start + 1, lines);
        }
    }

    #[test]
    fn text_is_trimmed_and_in_page_order() {
        let extracted =
            assemble_pages(vec![(1, "alpha".to_string()), (2, "beta".to_string())]);

        assert_eq!(extracted.text, "alpha\nbeta");
        assert!(extracted.citations[0].line_start < extracted.citations[1].line_start);
    }

    #[test]
    fn empty_input_yields_empty_document() {
        let extracted = assemble_pages(Vec::new());
        assert!(extracted.text.is_empty());
        assert!(extracted.citations.is_empty());
    }
}
