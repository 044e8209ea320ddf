//! ODT package (ZIP container) reading.
//!
//! Loads the two style-bearing XML streams and every embedded resource into
//! memory up front, so the conversion core itself performs no I/O.

use crate::{Error, Result};
use std::collections::HashMap;
use std::io::{Read, Seek};
use std::path::Path;

/// Resource directories whose entries are inlined into the output.
const RESOURCE_PREFIXES: &[&str] = &["Pictures/", "media/", "ObjectReplacements/"];

/// An opened ODT package with its streams loaded into memory.
pub struct Package {
    content_xml: String,
    styles_xml: Option<String>,
    resources: HashMap<String, Vec<u8>>,
}

impl Package {
    /// Open an ODT file from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Read an ODT package from any seekable reader
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(reader)
            .map_err(|e| Error::Zip(format!("Not a valid ODT container: {}", e)))?;

        let names: Vec<String> = archive.file_names().map(|n| n.to_string()).collect();

        let mut resources = HashMap::new();
        for name in &names {
            if RESOURCE_PREFIXES.iter().any(|p| name.starts_with(p)) {
                let mut data = Vec::new();
                archive
                    .by_name(name)
                    .map_err(|e| Error::Zip(e.to_string()))?
                    .read_to_end(&mut data)?;
                resources.insert(name.clone(), data);
            }
        }

        let styles_xml = if names.iter().any(|n| n == "styles.xml") {
            Some(read_string(&mut archive, "styles.xml")?)
        } else {
            None
        };

        // content.xml is the one mandatory stream
        if !names.iter().any(|n| n == "content.xml") {
            return Err(Error::ComponentNotFound("content.xml".to_string()));
        }
        let content_xml = read_string(&mut archive, "content.xml")?;

        Ok(Self {
            content_xml,
            styles_xml,
            resources,
        })
    }

    /// The document content stream
    #[inline]
    pub fn content_xml(&self) -> &str {
        &self.content_xml
    }

    /// The document-level styles stream, if present
    #[inline]
    pub fn styles_xml(&self) -> Option<&str> {
        self.styles_xml.as_deref()
    }

    /// Embedded resources by their archive path
    #[inline]
    pub fn resources(&self) -> &HashMap<String, Vec<u8>> {
        &self.resources
    }
}

fn read_string<R: Read + Seek>(archive: &mut zip::ZipArchive<R>, name: &str) -> Result<String> {
    let mut out = String::new();
    archive
        .by_name(name)
        .map_err(|e| Error::Zip(e.to_string()))?
        .read_to_string(&mut out)
        .map_err(|_| Error::InvalidFormat(format!("{} is not valid UTF-8", name)))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn build_odt(entries: &[(&str, &[u8])]) -> Cursor<Vec<u8>> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            writer
                .start_file(name.to_string(), SimpleFileOptions::default())
                .unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap()
    }

    #[test]
    fn test_reads_streams_and_resources() {
        let cursor = build_odt(&[
            ("content.xml", b"<office:document-content/>"),
            ("styles.xml", b"<office:document-styles/>"),
            ("Pictures/img.png", b"\x89PNG"),
            ("Thumbnails/thumbnail.png", b"skip"),
        ]);
        let package = Package::from_reader(cursor).unwrap();
        assert_eq!(package.content_xml(), "<office:document-content/>");
        assert!(package.styles_xml().is_some());
        assert_eq!(package.resources().len(), 1);
        assert_eq!(
            package.resources().get("Pictures/img.png").unwrap(),
            b"\x89PNG"
        );
    }

    #[test]
    fn test_missing_content_is_fatal() {
        let cursor = build_odt(&[("styles.xml", b"<office:document-styles/>")]);
        assert!(matches!(
            Package::from_reader(cursor),
            Err(Error::ComponentNotFound(_))
        ));
    }

    #[test]
    fn test_not_a_zip() {
        let cursor = Cursor::new(b"this is not a zip archive".to_vec());
        assert!(matches!(Package::from_reader(cursor), Err(Error::Zip(_))));
    }
}
