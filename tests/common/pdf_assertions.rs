use lopdf::{Document as LopdfDocument, Object};

/// Decoded content stream of every page, in page order.
pub fn page_contents(doc: &LopdfDocument) -> Vec<String> {
    doc.get_pages()
        .values()
        .map(|&id| {
            let bytes = doc.get_page_content(id).unwrap_or_default();
            String::from_utf8_lossy(&bytes).into_owned()
        })
        .collect()
}

/// Literal strings shown with `Tj` on a page, in drawing order.
pub fn shown_strings(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| line.strip_suffix(") Tj"))
        .filter_map(|line| line.strip_prefix('('))
        .map(str::to_string)
        .collect()
}

/// The first half of the trailer `/ID` pair.
pub fn trailer_id(doc: &LopdfDocument) -> Option<Vec<u8>> {
    let id = doc.trailer.get(b"ID").ok()?.as_array().ok()?;
    match id.first()? {
        Object::String(bytes, _) => Some(bytes.clone()),
        _ => None,
    }
}

pub fn has_output_intent(doc: &LopdfDocument) -> bool {
    doc.catalog()
        .map(|catalog| catalog.has(b"OutputIntents"))
        .unwrap_or(false)
}

pub fn info_entry(doc: &LopdfDocument, key: &[u8]) -> Option<String> {
    let info_id = doc.trailer.get(b"Info").ok()?.as_reference().ok()?;
    let info = doc.get_dictionary(info_id).ok()?;
    let value = info.get(key).ok()?.as_str().ok()?;
    Some(String::from_utf8_lossy(value).into_owned())
}
