//! End-to-end checks on flat XML output.

use odfgen::odf::{
    DocumentHandler, DocumentKind, GeneratorOptions, OdfGenerator, OdfStreamType, PropertyList, PropertyListVector,
    PropertyValue, StreamHandler, StringHandler,
};
use proptest::prelude::*;
use quick_xml::Reader;
use quick_xml::events::Event;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Parse `xml` completely, returning every start or empty tag with its
/// attribute count.
fn parse(xml: &str) -> Vec<(String, usize)> {
    let mut reader = Reader::from_str(xml);
    let mut tags = Vec::new();
    let mut depth = 0i64;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                let name = String::from_utf8(e.name().as_ref().to_vec()).unwrap();
                tags.push((name, e.attributes().count()));
            },
            Ok(Event::Empty(e)) => {
                let name = String::from_utf8(e.name().as_ref().to_vec()).unwrap();
                tags.push((name, e.attributes().count()));
            },
            Ok(Event::End(_)) => depth -= 1,
            Ok(Event::Eof) => break,
            Ok(_) => {},
            Err(e) => panic!("malformed XML at {}: {e}", reader.buffer_position()),
        }
    }
    assert_eq!(depth, 0, "unbalanced XML");
    tags
}

fn letter_document(out: &mut StringHandler) {
    let mut generator = OdfGenerator::new(GeneratorOptions::new().with_generator("tests"));
    generator.add_document_handler(out, OdfStreamType::Flat);

    generator.start_document(&PropertyList::new().with("dc:title", "Letter"));
    generator.open_page_span(
        &PropertyList::new()
            .with("fo:page-width", PropertyValue::inch(11.0))
            .with("fo:page-height", PropertyValue::inch(8.5))
            .with("style:print-orientation", "landscape"),
    );
    generator.open_header(&PropertyList::new());
    generator.open_paragraph(&PropertyList::new());
    generator.insert_text("ACME & Sons <draft>");
    generator.close_paragraph();
    generator.close_header();

    generator.open_paragraph(&PropertyList::new().with("fo:font-size", PropertyValue::point(12.0)));
    generator.open_span(&PropertyList::new().with("style:font-name", "Times New Roman"));
    generator.insert_text("Dear reader,");
    generator.close_span();
    generator.close_paragraph();

    let columns: PropertyListVector = vec![
        PropertyList::new().with("style:column-width", PropertyValue::inch(2.0)),
        PropertyList::new().with("style:column-width", PropertyValue::inch(3.0)),
    ]
    .into();
    generator.open_table(&PropertyList::new().with("librevenge:table-columns", columns));
    generator.open_table_row(&PropertyList::new());
    generator.open_table_cell(&PropertyList::new().with("table:number-rows-spanned", 2));
    generator.open_paragraph(&PropertyList::new());
    generator.insert_text("tall");
    generator.close_paragraph();
    generator.close_table_cell();
    generator.open_table_cell(&PropertyList::new());
    generator.close_table_cell();
    generator.close_table_row();
    generator.open_table_row(&PropertyList::new());
    generator.open_table_cell(&PropertyList::new());
    generator.close_table_cell();
    generator.close_table_row();
    generator.close_table();

    generator.close_page_span();
    generator.end_document().unwrap();
}

#[test]
fn test_letter_is_well_formed() {
    init_logger();
    let mut out = StringHandler::new();
    letter_document(&mut out);
    let xml = out.as_str();

    let tags = parse(xml);
    let layouts: Vec<_> = tags.iter().filter(|(name, _)| name == "style:page-layout").collect();
    assert_eq!(layouts.len(), 1);
    assert!(xml.contains(r#"fo:page-width="11in" fo:page-height="8.5in""#));
    assert!(xml.contains("ACME &amp; Sons &lt;draft&gt;"));
    assert!(xml.contains(r#"<style:font-face style:name="Times New Roman" svg:font-family="&apos;Times New Roman&apos;""#));
    assert!(xml.contains(r#"<dc:title>Letter</dc:title>"#));
    assert!(xml.contains(r#"style:width="5in""#));
}

#[test]
fn test_zone_order() {
    let mut out = StringHandler::new();
    letter_document(&mut out);
    let xml = out.as_str();

    let order = [
        "<office:meta>",
        "<office:settings>",
        "<office:font-face-decls>",
        "<office:styles>",
        "<office:automatic-styles>",
        "<office:master-styles>",
        "<office:body>",
    ];
    let positions: Vec<usize> = order
        .iter()
        .map(|tag| xml.find(tag).unwrap_or_else(|| panic!("missing {tag}")))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "zones out of order");
}

#[test]
fn test_output_is_deterministic() {
    let mut first = StringHandler::new();
    let mut second = StringHandler::new();
    letter_document(&mut first);
    letter_document(&mut second);
    assert_eq!(first.as_str(), second.as_str());
}

#[test]
fn test_separate_streams_carry_the_same_body() {
    let mut flat = StringHandler::new();
    let mut content = StringHandler::new();
    let mut styles = StringHandler::new();
    {
        let mut generator = OdfGenerator::new(GeneratorOptions::new().with_kind(DocumentKind::Spreadsheet));
        generator.add_document_handler(&mut flat, OdfStreamType::Flat);
        generator.add_document_handler(&mut content, OdfStreamType::Content);
        generator.add_document_handler(&mut styles, OdfStreamType::Styles);
        generator.open_table(&PropertyList::new().with("table:name", "Sheet1"));
        generator.open_table_row(&PropertyList::new());
        generator.open_table_cell(
            &PropertyList::new()
                .with("office:value-type", "float")
                .with("office:value", 42),
        );
        generator.close_table_cell();
        generator.close_table_row();
        generator.close_table();
        generator.end_document().unwrap();
    }
    let cell = r#"<table:table-cell table:style-name="Table0.Cell0" office:value-type="float" office:value="42"/>"#;
    assert!(flat.as_str().contains(cell));
    assert!(content.as_str().contains(cell));
    assert!(content.as_str().contains("<office:spreadsheet>"));
    assert!(!styles.as_str().contains("table:table-cell "));
    parse(content.as_str());
    parse(styles.as_str());
}

#[test]
fn test_single_column_section_with_separator_is_degenerate() {
    let mut generator = OdfGenerator::default();
    let columns: PropertyListVector = vec![PropertyList::new()].into();
    generator.open_section(
        &PropertyList::new()
            .with("style:columns", columns)
            .with("fo:margin-left", PropertyValue::inch(0.5)),
    );
    generator.open_paragraph(&PropertyList::new());
    generator.insert_text("indented");
    generator.close_paragraph();
    generator.close_section();
    let xml = generator.finish().to_xml(OdfStreamType::Content).unwrap();

    assert!(xml.contains(r#"<style:columns fo:column-count="0" fo:column-gap="0.0in"/>"#));
    assert!(xml.contains(r#"<text:section text:style-name="Section0" text:name="Section1">"#));
    parse(&xml);
}

#[test]
fn test_deep_nesting_stays_balanced() {
    let mut generator = OdfGenerator::default();
    generator.open_page_span(&PropertyList::new());
    generator.open_paragraph(&PropertyList::new());
    generator.open_frame(&PropertyList::new());
    generator.open_text_box(&PropertyList::new());
    generator.open_table(&PropertyList::new());
    generator.open_table_row(&PropertyList::new());
    generator.open_table_cell(&PropertyList::new());
    generator.open_unordered_list_level(&PropertyList::new());
    generator.open_list_element(&PropertyList::new());
    generator.open_footnote(&PropertyList::new());
    generator.open_paragraph(&PropertyList::new());
    generator.insert_text("deep");
    // everything is left open on purpose
    let xml = generator.finish().to_xml(OdfStreamType::Flat).unwrap();
    parse(&xml);
    assert!(xml.contains(">deep</text:p>"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_link_writes_every_attribute(href in "[a-z]{1,8}", show in prop::option::of("new|replace")) {
        let mut props = PropertyList::new().with("xlink:href", href.as_str());
        if let Some(show) = &show {
            props.insert("xlink:show", show.as_str());
        }
        props.insert("librevenge:ignored", "x");

        let mut generator = OdfGenerator::default();
        generator.open_paragraph(&PropertyList::new());
        generator.open_link(&props);
        generator.close_link();
        generator.close_paragraph();
        let xml = generator.finish().to_xml(OdfStreamType::Content).unwrap();

        let tags = parse(&xml);
        let link = tags.iter().find(|(name, _)| name == "text:a").map(|(_, count)| *count);
        // xlink:type plus the given attributes, reserved keys dropped
        prop_assert_eq!(link, Some(2 + usize::from(show.is_some())));
    }

    #[test]
    fn prop_start_element_keeps_attribute_order(
        entries in prop::collection::vec(("[a-z]{1,6}", "[ -~]{0,12}", any::<bool>()), 0..10)
    ) {
        let mut props = PropertyList::new();
        let mut expected = Vec::new();
        for (index, (name, value, reserved)) in entries.iter().enumerate() {
            let key = if *reserved {
                format!("librevenge:{name}{index}")
            } else {
                format!("fo:{name}{index}")
            };
            if !reserved {
                expected.push(key.clone());
            }
            props.insert(&key, value.as_str());
        }

        let mut handler = StreamHandler::new(Vec::new());
        handler.start_element("text:span", &props).unwrap();
        handler.end_element("text:span").unwrap();
        let xml = String::from_utf8(handler.into_inner()).unwrap();

        let mut reader = Reader::from_str(&xml);
        let keys: Vec<String> = match reader.read_event() {
            Ok(Event::Empty(e)) => e
                .attributes()
                .map(|a| String::from_utf8(a.unwrap().key.as_ref().to_vec()).unwrap())
                .collect(),
            other => panic!("expected an empty element, got {other:?}"),
        };
        prop_assert_eq!(keys, expected);
    }

    #[test]
    fn prop_text_round_trips(text in "[a-zA-Z ]{1,40}") {
        let mut generator = OdfGenerator::default();
        generator.open_paragraph(&PropertyList::new());
        generator.insert_text(&text);
        generator.close_paragraph();
        let xml = generator.finish().to_xml(OdfStreamType::Content).unwrap();

        let mut reader = Reader::from_str(&xml);
        let mut collected = String::new();
        let mut in_paragraph = false;
        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) if e.name().as_ref() == b"text:p" => in_paragraph = true,
                Ok(Event::End(e)) if e.name().as_ref() == b"text:p" => in_paragraph = false,
                Ok(Event::Text(t)) if in_paragraph => collected.push_str(&String::from_utf8_lossy(&t)),
                Ok(Event::Empty(e)) if in_paragraph && e.name().as_ref() == b"text:s" => {
                    let count = e
                        .try_get_attribute("text:c")
                        .unwrap()
                        .map(|a| String::from_utf8(a.value.to_vec()).unwrap().parse::<usize>().unwrap())
                        .unwrap_or(1);
                    collected.push_str(&" ".repeat(count));
                },
                Ok(Event::Eof) => break,
                Ok(_) => {},
                Err(e) => panic!("malformed XML: {e}"),
            }
        }
        prop_assert_eq!(collected, text);
    }
}
