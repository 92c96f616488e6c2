//! Shared plumbing for the zip + XML (OOXML) container formats.

use std::collections::HashMap;
use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use zip::ZipArchive;

use crate::error::ReadError;

pub(crate) type Archive<'a> = ZipArchive<Cursor<&'a [u8]>>;

pub(crate) fn open_archive(bytes: &[u8]) -> Result<Archive<'_>, ReadError> {
    Ok(ZipArchive::new(Cursor::new(bytes))?)
}

/// Read a part as UTF-8 text; `Ok(None)` when the part does not exist.
pub(crate) fn read_part(archive: &mut Archive<'_>, name: &str) -> Result<Option<String>, ReadError> {
    match archive.by_name(name) {
        Ok(mut file) => {
            let mut text = String::new();
            file.read_to_string(&mut text)?;
            Ok(Some(text))
        }
        Err(zip::result::ZipError::FileNotFound) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Read a part as raw bytes; `Ok(None)` when the part does not exist.
pub(crate) fn read_part_bytes(
    archive: &mut Archive<'_>,
    name: &str,
) -> Result<Option<Vec<u8>>, ReadError> {
    match archive.by_name(name) {
        Ok(mut file) => {
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes)?;
            Ok(Some(bytes))
        }
        Err(zip::result::ZipError::FileNotFound) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Relationship {
    pub rel_type: String,
    pub target: String,
}

/// Parse a `_rels/*.rels` part into an id → relationship map.
pub(crate) fn parse_relationships(
    xml: &str,
    part: &str,
) -> Result<HashMap<String, Relationship>, ReadError> {
    let mut reader = Reader::from_str(xml);
    let mut rels = HashMap::new();
    loop {
        match reader.read_event().map_err(|err| xml_err(part, err))? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let id = attr_value(&e, b"Id");
                let rel_type = attr_value(&e, b"Type");
                let target = attr_value(&e, b"Target");
                if let (Some(id), Some(rel_type), Some(target)) = (id, rel_type, target) {
                    rels.insert(id, Relationship { rel_type, target });
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(rels)
}

/// First attribute with the given qualified name, unescaped. Malformed
/// attributes are skipped rather than failing the whole part.
pub(crate) fn attr_value(e: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == name)
        .and_then(|attr| attr.unescape_value().ok())
        .map(|value| value.into_owned())
}

pub(crate) fn xml_err(part: &str, source: quick_xml::Error) -> ReadError {
    ReadError::Xml {
        part: part.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_relationship_entries() {
        let xml = r#"<?xml version="1.0"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide" Target="../notesSlides/notesSlide1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/image1.png"/>
</Relationships>"#;

        let rels = parse_relationships(xml, "test.rels").unwrap();
        assert_eq!(rels.len(), 2);
        assert!(rels["rId1"].rel_type.ends_with("/notesSlide"));
        assert_eq!(rels["rId2"].target, "../media/image1.png");
    }
}
