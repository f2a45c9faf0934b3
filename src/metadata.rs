//! Deterministic document metadata.
//!
//! `printpdf` stamps every file with the wall-clock time and a random document ID, in the info
//! dictionary, in the XMP metadata stream and in the trailer. [`stamp`] replaces all three with
//! values derived from the document itself, so the same input always produces the same bytes.

use lopdf::{Dictionary, Document, Object, StringFormat};
use sha2::{Digest, Sha256};

/// Producer string written into every document.
pub const PRODUCER: &str = concat!("seo_report ", env!("CARGO_PKG_VERSION"));

/// A calendar date, written as midnight UTC.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PdfDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl PdfDate {
    /// Used when no creation date is configured.
    pub const UNDATED: PdfDate = PdfDate::new(2000, 1, 1);

    pub const fn new(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Formats the date as a PDF date string, e.g. `D:20260208000000Z`.
    pub fn to_pdf_string(&self) -> String {
        format!(
            "D:{:04}{:02}{:02}000000Z",
            self.year, self.month, self.day
        )
    }
}

/// Values written into the info dictionary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentInfo {
    pub title: String,
    pub author: Option<String>,
    pub created: PdfDate,
}

impl DocumentInfo {
    /// First 16 bytes of the SHA-256 of title, author and date.
    pub fn document_id(&self) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(self.title.as_bytes());
        hasher.update([0u8]);
        hasher.update(self.author.as_deref().unwrap_or_default().as_bytes());
        hasher.update([0u8]);
        hasher.update(self.created.to_pdf_string().as_bytes());
        hasher.finalize()[..16].to_vec()
    }
}

/// Replaces the info dictionary, drops XMP metadata and derives the trailer `/ID`.
pub fn stamp(document: &mut Document, info: &DocumentInfo) -> Result<(), lopdf::Error> {
    if let Ok(old_info) = document.trailer.get(b"Info").and_then(Object::as_reference) {
        document.objects.remove(&old_info);
    }

    let catalog_id = document.trailer.get(b"Root")?.as_reference()?;
    let old_metadata = {
        let catalog = document.get_object_mut(catalog_id)?.as_dict_mut()?;
        let metadata = catalog.get(b"Metadata").and_then(Object::as_reference).ok();
        catalog.remove(b"Metadata");
        metadata
    };
    if let Some(id) = old_metadata {
        document.objects.remove(&id);
    }

    let date = info.created.to_pdf_string();
    let mut dictionary = Dictionary::new();
    dictionary.set("Title", Object::string_literal(info.title.as_str()));
    if let Some(author) = &info.author {
        dictionary.set("Author", Object::string_literal(author.as_str()));
    }
    dictionary.set("Producer", Object::string_literal(PRODUCER));
    dictionary.set("CreationDate", Object::string_literal(date.as_str()));
    dictionary.set("ModDate", Object::string_literal(date.as_str()));
    let info_id = document.add_object(Object::Dictionary(dictionary));
    document.trailer.set("Info", Object::Reference(info_id));

    let id = info.document_id();
    document.trailer.set(
        "ID",
        Object::Array(vec![
            Object::String(id.clone(), StringFormat::Hexadecimal),
            Object::String(id, StringFormat::Hexadecimal),
        ]),
    );
    Ok(())
}

/// Reads a string entry of the info dictionary.
pub fn info_entry(document: &Document, key: &str) -> Option<String> {
    let info_id = document.trailer.get(b"Info").ok()?.as_reference().ok()?;
    let info = document.get_dictionary(info_id).ok()?;
    let value = info.get(key.as_bytes()).ok()?.as_str().ok()?;
    Some(String::from_utf8_lossy(value).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Stream};

    fn printed_document() -> Document {
        let mut document = Document::with_version("1.3");
        let xmp = document.add_object(Stream::new(
            dictionary! { "Type" => "Metadata", "Subtype" => "XML" },
            b"<xmp:CreateDate>2031-05-06T07:08:09</xmp:CreateDate>".to_vec(),
        ));
        let catalog = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Metadata" => xmp,
        });
        let info = document.add_object(dictionary! {
            "CreationDate" => Object::string_literal("D:20310506070809"),
        });
        document.trailer.set("Root", catalog);
        document.trailer.set("Info", info);
        document
    }

    fn report_info() -> DocumentInfo {
        DocumentInfo {
            title: "SEO Indexing Analysis".to_owned(),
            author: Some("avinashsangle.com".to_owned()),
            created: PdfDate::new(2026, 2, 8),
        }
    }

    #[test]
    fn pdf_dates_are_zero_padded() {
        assert_eq!(PdfDate::new(2026, 2, 8).to_pdf_string(), "D:20260208000000Z");
    }

    #[test]
    fn stamp_replaces_clock_derived_values() {
        let mut document = printed_document();
        stamp(&mut document, &report_info()).expect("stamp succeeds");

        assert_eq!(
            info_entry(&document, "CreationDate").as_deref(),
            Some("D:20260208000000Z")
        );
        assert_eq!(info_entry(&document, "ModDate").as_deref(), Some("D:20260208000000Z"));
        assert_eq!(info_entry(&document, "Producer").as_deref(), Some(PRODUCER));
        assert_eq!(
            info_entry(&document, "Author").as_deref(),
            Some("avinashsangle.com")
        );

        let catalog_id = document
            .trailer
            .get(b"Root")
            .and_then(Object::as_reference)
            .expect("catalog");
        let catalog = document.get_dictionary(catalog_id).expect("catalog dict");
        assert!(catalog.get(b"Metadata").is_err());
        // Catalog and the new info dictionary are all that remain.
        assert_eq!(document.objects.len(), 2);
    }

    #[test]
    fn document_id_depends_only_on_the_info() {
        let a = report_info().document_id();
        let b = report_info().document_id();
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);

        let mut other = report_info();
        other.created = PdfDate::new(2026, 2, 9);
        assert_ne!(a, other.document_id());
    }
}
