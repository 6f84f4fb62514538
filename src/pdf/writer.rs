use pdf_writer::{Filter, Name, Pdf, Rect, Ref, TextStr};

use super::GeneratedDocument;
use crate::fonts::register_fonts;

/// Serialize finished pages into a PDF file.
pub(super) fn assemble(doc: &GeneratedDocument) -> Vec<u8> {
    let t0 = std::time::Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();

    let font_pairs = register_fonts(&mut pdf, &mut alloc);

    let n = doc.pages.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (page, content_id) in doc.pages.iter().zip(&content_ids) {
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&page.content, 6);
        pdf.stream(*content_id, &compressed).filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    let (width, height) = doc.page_size.dimensions();
    for (page_id, content_id) in page_ids.iter().zip(&content_ids) {
        let mut page = pdf.page(*page_id);
        page.media_box(Rect::new(0.0, 0.0, width, height))
            .parent(pages_id)
            .contents(*content_id);
        let mut resources = page.resources();
        let mut fonts = resources.fonts();
        for (name, font_ref) in &font_pairs {
            fonts.pair(Name(name.as_bytes()), *font_ref);
        }
    }

    let title = format!("{} - {}", doc.title, doc.period_label);
    pdf.document_info(info_id)
        .title(TextStr(&title))
        .subject(TextStr(doc.jurisdiction.display_name()))
        .producer(TextStr(concat!("taxdoc-pdf ", env!("CARGO_PKG_VERSION"))));

    let bytes = pdf.finish();
    log::info!(
        "Assembled {} pages into {} bytes in {:.1}ms",
        n,
        bytes.len(),
        t0.elapsed().as_secs_f64() * 1000.0
    );
    bytes
}
