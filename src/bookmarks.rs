//! Document outline (bookmarks) built with `lopdf`.

use lopdf::{Dictionary, Document, Object, ObjectId};
use log::{debug, warn};

use crate::model::SectionStart;

struct OutlineEntry {
    object_id: ObjectId,
    page_ref: ObjectId,
    title: String,
}

/// Adds a flat `/Outlines` tree with one entry per section, each pointing at the section's first
/// page with a `/Fit` destination.
///
/// Sections referring to pages the document does not have are skipped. Returns the number of
/// entries written.
pub fn insert_outline(
    document: &mut Document,
    sections: &[SectionStart],
) -> Result<usize, lopdf::Error> {
    let pages = document.get_pages();
    let mut entries = Vec::with_capacity(sections.len());

    for section in sections {
        let Some(page_ref) = u32::try_from(section.page)
            .ok()
            .and_then(|page| pages.get(&page).copied())
        else {
            warn!(
                "section '{}' refers to missing page {}; leaving it out of the outline",
                section.title, section.page
            );
            continue;
        };
        entries.push(OutlineEntry {
            object_id: document.new_object_id(),
            page_ref,
            title: section.title.clone(),
        });
    }

    if entries.is_empty() {
        return Ok(0);
    }

    let outlines_id = document.new_object_id();
    link_entries(document, outlines_id, &entries);
    insert_root(document, outlines_id, &entries)?;
    debug!("outline written with {} entries", entries.len());
    Ok(entries.len())
}

fn link_entries(document: &mut Document, outlines_id: ObjectId, entries: &[OutlineEntry]) {
    for (index, entry) in entries.iter().enumerate() {
        let mut dictionary = Dictionary::new();
        dictionary.set("Title", Object::string_literal(entry.title.as_str()));
        dictionary.set(
            "Dest",
            Object::Array(vec![
                Object::Reference(entry.page_ref),
                Object::Name(b"Fit".to_vec()),
            ]),
        );
        dictionary.set("Parent", Object::Reference(outlines_id));
        if index > 0 {
            dictionary.set("Prev", Object::Reference(entries[index - 1].object_id));
        }
        if let Some(next) = entries.get(index + 1) {
            dictionary.set("Next", Object::Reference(next.object_id));
        }
        document
            .objects
            .insert(entry.object_id, Object::Dictionary(dictionary));
    }
}

fn insert_root(
    document: &mut Document,
    outlines_id: ObjectId,
    entries: &[OutlineEntry],
) -> Result<(), lopdf::Error> {
    let mut root = Dictionary::new();
    root.set("Type", Object::Name(b"Outlines".to_vec()));
    root.set("Count", Object::Integer(entries.len() as i64));
    if let (Some(first), Some(last)) = (entries.first(), entries.last()) {
        root.set("First", Object::Reference(first.object_id));
        root.set("Last", Object::Reference(last.object_id));
    }
    document
        .objects
        .insert(outlines_id, Object::Dictionary(root));

    let catalog_id = document.trailer.get(b"Root")?.as_reference()?;
    let catalog = document.get_object_mut(catalog_id)?.as_dict_mut()?;
    catalog.set("Outlines", Object::Reference(outlines_id));
    catalog.set("PageMode", Object::Name(b"UseOutlines".to_vec()));
    Ok(())
}

/// Reads the top-level outline back as `(title, page number)` pairs, in order.
pub fn read_outline(document: &Document) -> Result<Vec<(String, u32)>, lopdf::Error> {
    let catalog_id = document.trailer.get(b"Root")?.as_reference()?;
    let catalog = document.get_dictionary(catalog_id)?;
    let outlines_id = match catalog.get(b"Outlines") {
        Ok(object) => object.as_reference()?,
        Err(_) => return Ok(Vec::new()),
    };

    let page_numbers: std::collections::BTreeMap<ObjectId, u32> = document
        .get_pages()
        .into_iter()
        .map(|(number, id)| (id, number))
        .collect();

    let mut entries = Vec::new();
    let mut cursor = document
        .get_dictionary(outlines_id)?
        .get(b"First")
        .and_then(Object::as_reference)
        .ok();
    while let Some(id) = cursor {
        let entry = document.get_dictionary(id)?;
        let title = String::from_utf8_lossy(entry.get(b"Title")?.as_str()?).into_owned();
        let page = entry
            .get(b"Dest")?
            .as_array()?
            .first()
            .and_then(|target| target.as_reference().ok())
            .and_then(|page_id| page_numbers.get(&page_id).copied())
            .unwrap_or(0);
        entries.push((title, page));
        cursor = entry.get(b"Next").and_then(Object::as_reference).ok();
    }
    Ok(entries)
}
