/*!
 * Item export loading
 *
 * Reads an XML export, finds every `thing` element of type `Item` at any
 * depth and decodes its `field` children into an [`Item`].
 */

use std::cell::RefCell;
use std::fs;
use std::path::Path;

use encoding_rs::UTF_8;
use indicatif::ProgressBar;
use log::{debug, warn};
use roxmltree::{Document, Node, ParsingOptions};

use crate::error::Result;
use crate::icon::Icon;
use crate::types::{Attributes, Catalog, Item};
use crate::{bail, ensure};

/// Loader statistics
#[derive(Debug, Clone, Default)]
pub struct LoadStatistics {
    /// Size of the export in bytes
    pub bytes_read: u64,
    /// Item records found, placeholders included
    pub items_found: usize,
    /// Items whose icon decoded successfully
    pub icons_decoded: usize,
    /// Items whose icon payload was present but unusable
    pub icon_failures: usize,
}

/// Decode raw export bytes into text.
///
/// A UTF-8 or UTF-16 byte order mark selects the encoding and is removed.
/// Without one the bytes must be UTF-8.
pub fn decode_text(bytes: &[u8]) -> Result<String> {
    let (text, encoding, had_errors) = UTF_8.decode(bytes);
    ensure!(
        !had_errors,
        MalformedDocument,
        "file is not valid {}",
        encoding.name()
    );
    Ok(text.into_owned())
}

/// Parse a complete XML document.
///
/// Line endings are normalized to `\n`. Document type declarations are
/// accepted but not used.
pub fn parse_document(xml: &str) -> Result<Document<'_>> {
    let mut options = ParsingOptions::default();
    options.allow_dtd = true;
    Ok(Document::parse_with_options(xml, options)?)
}

/// Concatenated text of `node` and all its descendants.
///
/// Whitespace-only text nodes are formatting and are skipped.
pub fn node_text(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .filter(|text| !text.trim().is_empty())
        .collect()
}

/// Loader for item exports
pub struct Loader {
    /// Progress indicator
    progress: ProgressBar,
    /// Statistics of the last load
    statistics: RefCell<LoadStatistics>,
}

impl Loader {
    /// Create a new loader
    pub fn new(progress: ProgressBar) -> Self {
        Self {
            progress,
            statistics: RefCell::new(LoadStatistics::default()),
        }
    }

    /// Get loader statistics
    pub fn get_statistics(&self) -> LoadStatistics {
        self.statistics.borrow().clone()
    }

    /// Load every item record from the export at `path`.
    ///
    /// The file may be UTF-8, or UTF-16 with a byte order mark.
    pub fn load(&self, path: &Path) -> Result<Catalog> {
        *self.statistics.borrow_mut() = LoadStatistics::default();

        if !path.is_file() {
            bail!(FileNotFound, "{}", path.display());
        }

        self.progress
            .set_message(format!("Reading {}", path.display()));
        let bytes = fs::read(path)?;
        self.statistics.borrow_mut().bytes_read = bytes.len() as u64;

        let xml = decode_text(&bytes)?;

        self.progress.set_message("Parsing XML");
        let document = parse_document(&xml)?;

        self.progress.set_message("Decoding items");
        let items = self.decode_items(&document);
        debug!(
            "loaded {} item records from {}",
            items.len(),
            path.display()
        );

        Ok(Catalog::new(path, items))
    }

    /// Decode every `thing` element of type `Item`, at any depth
    pub fn decode_items(&self, document: &Document<'_>) -> Vec<Item> {
        let items: Vec<Item> = document
            .descendants()
            .filter(|node| node.has_tag_name("thing") && node.attribute("type") == Some("Item"))
            .map(|element| {
                self.progress.inc(1);
                self.decode_item(element)
            })
            .collect();

        self.statistics.borrow_mut().items_found = items.len();
        items
    }

    /// Decode one item record.
    ///
    /// A bad icon is logged and dropped; the rest of the record is kept.
    pub fn decode_item(&self, element: Node<'_, '_>) -> Item {
        let mut attributes = Attributes::new();
        let mut icon = None;

        for field in element.children().filter(|n| n.has_tag_name("field")) {
            match field.attribute("name") {
                Some("icon") => {
                    let Some(image) = field
                        .descendants()
                        .find(|f| f.has_tag_name("field") && f.attribute("name") == Some("image"))
                    else {
                        continue;
                    };

                    let payload = node_text(image);
                    if payload.is_empty() {
                        continue;
                    }
                    icon = match Icon::from_base64(&payload) {
                        Ok(decoded) => {
                            self.statistics.borrow_mut().icons_decoded += 1;
                            Some(decoded)
                        }
                        Err(e) => {
                            self.statistics.borrow_mut().icon_failures += 1;
                            warn!(
                                "Error decoding image for item {}: {}",
                                attributes.get("id").map(String::as_str).unwrap_or("?"),
                                e
                            );
                            None
                        }
                    };
                }
                Some(name) if !name.is_empty() => {
                    attributes.insert(name.to_string(), node_text(field));
                }
                _ => {}
            }
        }

        Item::new(attributes, icon)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new(ProgressBar::hidden())
    }
}

/// Load an export without progress reporting
pub fn load(path: &Path) -> Result<Catalog> {
    Loader::default().load(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ItemViewError;
    use crate::icon::tests::encoded_icon;
    use image::ImageFormat;

    fn decode(xml: &str) -> Vec<Item> {
        let document = parse_document(xml).unwrap();
        Loader::default().decode_items(&document)
    }

    fn utf16_bytes(text: &str, little_endian: bool) -> Vec<u8> {
        let mut bytes = if little_endian {
            vec![0xFF, 0xFE]
        } else {
            vec![0xFE, 0xFF]
        };
        for unit in text.encode_utf16() {
            let pair = if little_endian {
                unit.to_le_bytes()
            } else {
                unit.to_be_bytes()
            };
            bytes.extend_from_slice(&pair);
        }
        bytes
    }

    #[test]
    fn test_node_text() {
        let document = parse_document(
            r#"<?xml version="1.0"?>
            <!-- export -->
            <root a="1">
                <child>hi &amp; bye</child>
                <empty/>
                <data><![CDATA[<raw>]]></data>
            </root>"#,
        )
        .unwrap();
        let root = document.root_element();

        assert!(root.has_tag_name("root"));
        assert_eq!(root.attribute("a"), Some("1"));
        assert_eq!(node_text(root), "hi & bye<raw>");
    }

    #[test]
    fn test_parse_document_errors() {
        for xml in ["<root><a></root>", "<root><a>", "", "<a/><b/>", "just text"] {
            assert!(
                matches!(parse_document(xml), Err(ItemViewError::Xml(_))),
                "{:?} should not parse",
                xml
            );
        }
    }

    #[test]
    fn test_line_endings_are_normalized() {
        let items = decode(
            "<things>\r\n<thing type=\"Item\">\r\n\
             <field name=\"id\">16385</field>\r\n\
             <field name=\"description\">DMG:+1\r\nDelay:+48\rLv.1 MNK</field>\r\n\
             </thing>\r\n</things>",
        );

        assert_eq!(items[0].description, "DMG:+1\nDelay:+48\nLv.1 MNK");
        assert!(items.iter().all(|item| item
            .attributes
            .values()
            .all(|value| !value.contains('\r'))));
    }

    #[test]
    fn test_decode_text() {
        let xml = "<things><thing type=\"Item\"><field name=\"name\">Épée</field></thing></things>";

        assert_eq!(decode_text(xml.as_bytes()).unwrap(), xml);
        assert_eq!(decode_text(format!("\u{feff}{}", xml).as_bytes()).unwrap(), xml);
        assert_eq!(decode_text(&utf16_bytes(xml, true)).unwrap(), xml);
        assert_eq!(decode_text(&utf16_bytes(xml, false)).unwrap(), xml);

        assert!(matches!(
            decode_text(&[b'<', 0xC3, 0x28, b'>']),
            Err(ItemViewError::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_items_found_at_any_depth() {
        let items = decode(
            r#"<thingList>
                <thing type="Item"><field name="id">1</field></thing>
                <group>
                    <nested>
                        <thing type="Item"><field name="id">2</field></thing>
                    </nested>
                    <thing type="Spell"><field name="id">3</field></thing>
                </group>
            </thingList>"#,
        );

        let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_root_thing_is_an_item() {
        let items = decode(r#"<thing type="Item"><field name="id">7</field></thing>"#);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "7");
    }

    #[test]
    fn test_field_decoding() {
        let items = decode(
            r#"<things><thing type="Item">
                <field name="id">16385</field>
                <field name="name">Cesti</field>
                <field name="flags"></field>
                <field>unnamed</field>
                <field name="">blank</field>
                <field name="description">Lv.1 MNK<br/>DMG:+1</field>
                <field name="name">Cesti II</field>
            </thing></things>"#,
        );
        let item = &items[0];

        let keys: Vec<_> = item.attributes.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "name", "flags", "description"]);
        assert_eq!(item.attribute("flags"), Some(""));
        assert_eq!(item.name, "Cesti II");
        assert_eq!(item.description, "Lv.1 MNKDMG:+1");
    }

    #[test]
    fn test_icon_decoding() {
        let xml = format!(
            r#"<things>
                <thing type="Item">
                    <field name="id">1</field>
                    <field name="icon"><field name="format">bmp</field><field name="image">{}</field></field>
                </thing>
                <thing type="Item">
                    <field name="id">2</field>
                    <field name="icon"><field name="image">%%%not base64%%%</field></field>
                </thing>
                <thing type="Item">
                    <field name="id">3</field>
                    <field name="icon"><field name="image"></field></field>
                </thing>
            </things>"#,
            encoded_icon(ImageFormat::Bmp)
        );

        let root = parse_document(&xml).unwrap();
        let loader = Loader::default();
        let items = loader.decode_items(&root);

        assert!(items[0].icon.is_some());
        assert!(items[1].icon.is_none());
        assert!(items[2].icon.is_none());
        assert!(items.iter().all(|i| !i.attributes.contains_key("icon")));

        let stats = loader.get_statistics();
        assert_eq!(stats.items_found, 3);
        assert_eq!(stats.icons_decoded, 1);
        assert_eq!(stats.icon_failures, 1);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load(&dir.path().join("missing.xml"));
        assert!(matches!(result, Err(ItemViewError::FileNotFound(_))));
    }

    #[test]
    fn test_load_from_disk_with_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.xml");
        fs::write(
            &path,
            "\u{feff}<things><thing type=\"Item\"><field name=\"name\">Apple</field></thing></things>",
        )
        .unwrap();

        let loader = Loader::default();
        let catalog = loader.load(&path).unwrap();
        assert_eq!(catalog.total(), 1);
        assert_eq!(catalog.source(), path.as_path());
        assert!(loader.get_statistics().bytes_read > 0);
    }

    #[test]
    fn test_load_utf16_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.xml");
        let xml = "<things>\r\n<thing type=\"Item\"><field name=\"id\">4096</field>\
                   <field name=\"name\">Fire Crystal</field></thing>\r\n</things>";
        fs::write(&path, utf16_bytes(xml, true)).unwrap();

        let catalog = load(&path).unwrap();
        assert_eq!(catalog.find("4096").unwrap().name, "Fire Crystal");
    }
}
