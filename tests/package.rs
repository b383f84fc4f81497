//! Package output read back with the zip crate.
#![cfg(feature = "package")]

use odfgen::odf::{
    Confidence, DocumentKind, DocumentParser, GeneratorOptions, InputStream, MemoryInputStream, OdfFilter,
    OdfGenerator, PackageWriter, PropertyList,
};
use odfgen::Error;
use std::io::{Cursor, Read};

/// Turns each input line into a paragraph.
struct LineParser;

impl DocumentParser for LineParser {
    fn detect(&mut self, input: &mut dyn InputStream) -> Confidence {
        if input.is_end() {
            Confidence::None
        } else {
            Confidence::Good
        }
    }

    fn parse(&mut self, input: &mut dyn InputStream, generator: &mut OdfGenerator<'_>) -> bool {
        let Ok(bytes) = input.read(usize::MAX) else {
            return false;
        };
        let text = String::from_utf8_lossy(bytes).into_owned();
        generator.start_document(&PropertyList::new().with("dc:title", "lines"));
        generator.open_page_span(&PropertyList::new());
        for line in text.lines() {
            generator.open_paragraph(&PropertyList::new());
            generator.insert_text(line);
            generator.close_paragraph();
        }
        generator.close_page_span();
        generator.end_document().is_ok()
    }
}

fn read_entry(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut text = String::new();
    entry.read_to_string(&mut text).unwrap();
    text
}

#[test]
fn test_filter_to_package() {
    let mut filter = OdfFilter::new(LineParser, GeneratorOptions::default());
    let mut input = MemoryInputStream::new(b"first\nsecond".to_vec());
    let bytes = filter
        .filter_to_package(&mut input, Cursor::new(Vec::new()))
        .unwrap()
        .into_inner();

    let archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
    assert_eq!(archive.file_names().count(), 6);
    drop(archive);

    assert_eq!(read_entry(&bytes, "mimetype"), "application/vnd.oasis.opendocument.text");
    let content = read_entry(&bytes, "content.xml");
    assert!(content.contains(">first</text:p>"));
    assert!(content.contains(">second</text:p>"));
    let styles = read_entry(&bytes, "styles.xml");
    assert!(styles.contains(r#"<style:master-page style:name="Page_Style_0" style:page-layout-name="PM0""#));
    let manifest = read_entry(&bytes, "META-INF/manifest.xml");
    assert!(manifest.contains(r#"manifest:full-path="content.xml""#));
    assert!(read_entry(&bytes, "meta.xml").contains("<dc:title>lines</dc:title>"));
}

#[test]
fn test_filter_to_path_writes_package() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lines.odt");
    let mut filter = OdfFilter::new(LineParser, GeneratorOptions::default());
    filter
        .filter_to_path(&mut MemoryInputStream::new(b"on disk".to_vec()), &path)
        .unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..2], b"PK");
    assert!(read_entry(&bytes, "content.xml").contains(">on disk</text:p>"));

    let err = filter
        .filter_to_path(&mut MemoryInputStream::new(b"again".to_vec()), &path)
        .unwrap_err();
    assert!(matches!(err, Error::AlreadyUsed));
    assert!(read_entry(&std::fs::read(&path).unwrap(), "content.xml").contains(">on disk</text:p>"));
}

#[test]
fn test_drawing_package_without_settings() {
    let mut generator = OdfGenerator::new(
        GeneratorOptions::new()
            .with_kind(DocumentKind::Drawing)
            .with_settings(false),
    );
    generator.open_page_span(&PropertyList::new());
    generator.draw_rectangle(&PropertyList::new().with("draw:fill", "solid"));
    generator.close_page_span();
    let document = generator.finish();

    let mut writer = PackageWriter::new(Cursor::new(Vec::new()), document.kind().mime_type()).unwrap();
    writer.write_document(&document).unwrap();
    let bytes = writer.finish().unwrap().into_inner();

    let archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
    assert!(archive.file_names().all(|name| name != "settings.xml"));
    drop(archive);
    let content = read_entry(&bytes, "content.xml");
    assert!(content.contains(r#"<draw:rect draw:style-name="gr0"/>"#));
    assert!(content.contains(r#"<style:graphic-properties draw:fill="solid"/>"#));
}

#[test]
fn test_empty_input_is_rejected() {
    let mut filter = OdfFilter::new(LineParser, GeneratorOptions::default());
    let err = filter
        .filter_to_package(&mut MemoryInputStream::new(Vec::new()), Cursor::new(Vec::new()))
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat));
}
