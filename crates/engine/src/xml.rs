//! Streaming edits of the project `config.xml`
//!
//! Both writers in this crate change a small part of the document: the
//! attributes inside the `<chcp>` block under `<widget>`, or a few attributes
//! of `<widget>` itself.
//! Everything else (declaration, comments, whitespace, other elements) is
//! copied event by event so a rewrite produces a minimal diff.

use chcp_core::{Error, PluginPreferences, Result};
use indexmap::IndexMap;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Root element of a Cordova configuration
const WIDGET: &[u8] = b"widget";

/// Element holding the plugin preferences
const CHCP: &str = "chcp";

const INDENT_UNIT: &str = "    ";

fn is_element(e: &BytesStart<'_>, name: &[u8]) -> bool {
    e.local_name().as_ref() == name
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

/// Decode the attributes of an element into an ordered map
fn decode_attributes(e: &BytesStart<'_>, path: &Path) -> Result<IndexMap<String, String>> {
    let mut attrs = IndexMap::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| Error::xml(path, err))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| Error::xml(path, err))?
            .into_owned();
        attrs.insert(key, value);
    }
    Ok(attrs)
}

/// Read the file at `path`, `Ok(None)` if it does not exist
pub fn read_document(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::file_access(path, e)),
    }
}

/// Replace the file at `path` with `content`
///
/// The content is written to a temporary file next to the target and moved
/// into place, so readers never observe a half-written configuration.
pub fn write_document(path: &Path, content: &str) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| Error::file_access(dir, e))?;
    temp.write_all(content.as_bytes())
        .map_err(|e| Error::file_access(temp.path(), e))?;
    temp.persist(path)
        .map_err(|e| Error::file_access(path, e.error))?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "Wrote configuration");
    Ok(())
}

/// Extract the `<chcp>` preferences from a configuration document
///
/// A `<widget>` without a `<chcp>` block yields empty preferences.
///
/// # Errors
///
/// Returns [`Error::WidgetMissing`] if the document has no `<widget>` root and
/// [`Error::Xml`] if it is not well formed.
pub fn parse_preferences(content: &str, path: &Path) -> Result<PluginPreferences> {
    let mut reader = Reader::from_str(content);
    let mut prefs = PluginPreferences::new();
    let mut depth = 0usize;
    let mut widget_found = false;
    let mut in_chcp = false;

    loop {
        let event = reader.read_event().map_err(|e| Error::xml(path, e))?;
        match event {
            Event::Eof => break,
            Event::Start(e) => {
                if depth == 0 && is_element(&e, WIDGET) {
                    widget_found = true;
                } else if widget_found && depth == 1 && is_element(&e, CHCP.as_bytes()) {
                    in_chcp = true;
                } else if in_chcp && depth == 2 {
                    collect_preference(&e, path, &mut prefs)?;
                }
                depth += 1;
            }
            Event::Empty(e) => {
                if depth == 0 && is_element(&e, WIDGET) {
                    widget_found = true;
                } else if in_chcp && depth == 2 {
                    collect_preference(&e, path, &mut prefs)?;
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if in_chcp && depth == 1 {
                    in_chcp = false;
                }
            }
            _ => {}
        }
    }

    if !widget_found {
        return Err(Error::WidgetMissing {
            path: path.to_path_buf(),
        });
    }
    Ok(prefs)
}

fn collect_preference(e: &BytesStart<'_>, path: &Path, prefs: &mut PluginPreferences) -> Result<()> {
    let element = element_name(e);
    for (attribute, value) in decode_attributes(e, path)? {
        prefs.set(PluginPreferences::key_for(&element, &attribute), value);
    }
    Ok(())
}

fn write_event<'a>(writer: &mut Writer<Vec<u8>>, event: Event<'a>, path: &Path) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::xml(path, e))
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    element: &str,
    attributes: &[(&str, &str)],
    path: &Path,
) -> Result<()> {
    let mut tag = BytesStart::new(element);
    for &(attribute, value) in attributes {
        tag.push_attribute((attribute, value));
    }
    write_event(writer, Event::Empty(tag), path)
}

/// Emit a complete `<chcp>` block, opening tag included, closing at `indent`
fn write_chcp_block(
    writer: &mut Writer<Vec<u8>>,
    prefs: &PluginPreferences,
    indent: &str,
    path: &Path,
) -> Result<()> {
    write_event(writer, Event::Start(BytesStart::new(CHCP)), path)?;

    let child_indent = format!("\n{indent}{INDENT_UNIT}");
    for (element, attributes) in prefs.elements() {
        write_event(writer, Event::Text(BytesText::new(&child_indent)), path)?;
        write_element(writer, element, &attributes, path)?;
    }

    write_event(writer, Event::Text(BytesText::new(&format!("\n{indent}"))), path)?;
    write_event(writer, Event::End(BytesEnd::new(CHCP)), path)
}

/// Trailing horizontal whitespace of a text node that ends a line break
fn trailing_indent(text: &str) -> Option<&str> {
    let (_, tail) = text.rsplit_once('\n')?;
    tail.chars().all(|c| c == ' ' || c == '\t').then_some(tail)
}

/// Progress through the first `<chcp>` block while rewriting
enum Block<'p> {
    /// Not reached yet
    Absent,
    /// Inside the block; elements of `prefs` not yet seen are still pending
    Open {
        indent: String,
        pending: IndexMap<&'p str, Vec<(&'p str, &'p str)>>,
    },
    /// Written; later `<chcp>` blocks are dropped
    Done,
}

/// Apply `prefs` to one direct child of `<chcp>`
///
/// Attributes become exactly the ones `prefs` holds for the element; the
/// element itself, its content and untouched attributes stay as they are.
fn rewrite_child(
    e: &BytesStart<'_>,
    prefs: &PluginPreferences,
    wanted: &IndexMap<&str, Vec<(&str, &str)>>,
    path: &Path,
) -> Result<BytesStart<'static>> {
    let element = element_name(e);
    rebuild_tag(e, path, |attrs| {
        attrs.retain(|attribute, _| {
            prefs
                .get(&PluginPreferences::key_for(&element, attribute))
                .is_some()
        });
        for &(attribute, value) in wanted.get(element.as_str()).into_iter().flatten() {
            attrs.insert(attribute.to_string(), value.to_string());
        }
        Ok(())
    })
}

/// Rewrite the `<chcp>` block under `<widget>` to hold `prefs`
///
/// The first existing block is edited in place: attributes of its child
/// elements are set from `prefs`, elements `prefs` needs but the block lacks
/// are appended, and comments, text and elements without preferences are
/// kept. Further `<chcp>` blocks are dropped. Without a block, a new one is
/// appended as the last child of `<widget>`.
pub fn replace_preferences(content: &str, prefs: &PluginPreferences, path: &Path) -> Result<String> {
    let mut reader = Reader::from_str(content);
    let mut writer = Writer::new(Vec::with_capacity(content.len() + 256));
    let wanted = prefs.elements();

    let mut depth = 0usize;
    let mut widget_found = false;
    let mut block = Block::Absent;
    // Depth at which a dropped <chcp> subtree closes
    let mut skip_until: Option<usize> = None;
    let mut pending_indent: Option<String> = None;
    let mut child_indent = INDENT_UNIT.to_string();

    loop {
        let event = reader.read_event().map_err(|e| Error::xml(path, e))?;

        if let Some(close_depth) = skip_until {
            match event {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    depth = depth.saturating_sub(1);
                    if depth == close_depth {
                        skip_until = None;
                    }
                }
                Event::Eof => return Err(Error::xml(path, "unexpected end of document")),
                _ => {}
            }
            continue;
        }

        match event {
            Event::Eof => break,
            Event::Text(text) => {
                if depth == 1 {
                    let raw = String::from_utf8_lossy(&text).into_owned();
                    pending_indent = trailing_indent(&raw).map(str::to_string);
                }
                write_event(&mut writer, Event::Text(text), path)?;
            }
            Event::Start(e) => {
                if depth == 0 && is_element(&e, WIDGET) {
                    widget_found = true;
                }
                if depth == 1 {
                    if let Some(indent) = pending_indent.take() {
                        child_indent = indent;
                    }
                    if widget_found && is_element(&e, CHCP.as_bytes()) {
                        if matches!(block, Block::Absent) {
                            block = Block::Open {
                                indent: child_indent.clone(),
                                pending: wanted.clone(),
                            };
                            write_event(&mut writer, Event::Start(e), path)?;
                        } else {
                            skip_until = Some(depth);
                        }
                        depth += 1;
                        continue;
                    }
                }
                if depth == 2
                    && let Block::Open { pending, .. } = &mut block
                {
                    pending.shift_remove(element_name(&e).as_str());
                    let tag = rewrite_child(&e, prefs, &wanted, path)?;
                    write_event(&mut writer, Event::Start(tag), path)?;
                    depth += 1;
                    continue;
                }
                depth += 1;
                write_event(&mut writer, Event::Start(e), path)?;
            }
            Event::Empty(e) => {
                if depth == 1 {
                    if let Some(indent) = pending_indent.take() {
                        child_indent = indent;
                    }
                    if widget_found && is_element(&e, CHCP.as_bytes()) {
                        if matches!(block, Block::Absent) {
                            write_chcp_block(&mut writer, prefs, &child_indent, path)?;
                            block = Block::Done;
                        }
                        continue;
                    }
                } else if depth == 0 && is_element(&e, WIDGET) {
                    // <widget/> has nowhere to put a block
                    return Err(Error::xml(path, "empty <widget> element"));
                }
                if depth == 2
                    && let Block::Open { pending, .. } = &mut block
                {
                    pending.shift_remove(element_name(&e).as_str());
                    let tag = rewrite_child(&e, prefs, &wanted, path)?;
                    write_event(&mut writer, Event::Empty(tag), path)?;
                    continue;
                }
                write_event(&mut writer, Event::Empty(e), path)?;
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                if depth == 1 && e.local_name().as_ref() == CHCP.as_bytes() {
                    if let Block::Open { indent, pending } = &block {
                        // The text before </chcp> already ends at `indent`
                        for (element, attributes) in pending {
                            write_event(&mut writer, Event::Text(BytesText::new(INDENT_UNIT)), path)?;
                            write_element(&mut writer, element, attributes, path)?;
                            write_event(
                                &mut writer,
                                Event::Text(BytesText::new(&format!("\n{indent}"))),
                                path,
                            )?;
                        }
                        block = Block::Done;
                    }
                }
                if depth == 0
                    && widget_found
                    && matches!(block, Block::Absent)
                    && e.local_name().as_ref() == WIDGET
                {
                    write_event(&mut writer, Event::Text(BytesText::new(&child_indent)), path)?;
                    write_chcp_block(&mut writer, prefs, &child_indent, path)?;
                    write_event(&mut writer, Event::Text(BytesText::new("\n")), path)?;
                    block = Block::Done;
                }
                write_event(&mut writer, Event::End(e), path)?;
            }
            other => write_event(&mut writer, other, path)?,
        }
    }

    if !widget_found {
        return Err(Error::WidgetMissing {
            path: path.to_path_buf(),
        });
    }

    String::from_utf8(writer.into_inner()).map_err(|e| Error::xml(path, e))
}

/// Decoded attributes of the `<widget>` root element
///
/// Only the root tag is read; the rest of the document is not checked.
pub fn widget_attributes(content: &str, path: &Path) -> Result<IndexMap<String, String>> {
    let mut reader = Reader::from_str(content);
    loop {
        match reader.read_event().map_err(|e| Error::xml(path, e))? {
            Event::Start(e) | Event::Empty(e) if is_element(&e, WIDGET) => {
                return decode_attributes(&e, path);
            }
            Event::Start(_) | Event::Empty(_) | Event::Eof => {
                return Err(Error::WidgetMissing {
                    path: path.to_path_buf(),
                });
            }
            _ => {}
        }
    }
}

/// Rewrite attributes of the `<widget>` root element
///
/// `edit` receives the decoded attributes and may change, add or remove
/// entries. Attributes it leaves untouched are written back byte for byte.
pub fn update_widget_attributes<F>(content: &str, path: &Path, edit: F) -> Result<String>
where
    F: FnOnce(&mut IndexMap<String, String>) -> Result<()>,
{
    let mut reader = Reader::from_str(content);
    let mut writer = Writer::new(Vec::with_capacity(content.len() + 64));
    let mut edit = Some(edit);
    let mut depth = 0usize;

    loop {
        let event = reader.read_event().map_err(|e| Error::xml(path, e))?;
        match event {
            Event::Eof => break,
            Event::Start(e) if depth == 0 && is_element(&e, WIDGET) => {
                depth += 1;
                let Some(edit) = edit.take() else {
                    write_event(&mut writer, Event::Start(e), path)?;
                    continue;
                };
                let tag = rebuild_tag(&e, path, edit)?;
                write_event(&mut writer, Event::Start(tag), path)?;
            }
            Event::Empty(e) if depth == 0 && is_element(&e, WIDGET) => {
                let Some(edit) = edit.take() else {
                    write_event(&mut writer, Event::Empty(e), path)?;
                    continue;
                };
                let tag = rebuild_tag(&e, path, edit)?;
                write_event(&mut writer, Event::Empty(tag), path)?;
            }
            Event::Start(e) => {
                depth += 1;
                write_event(&mut writer, Event::Start(e), path)?;
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                write_event(&mut writer, Event::End(e), path)?;
            }
            other => write_event(&mut writer, other, path)?,
        }
    }

    if edit.is_some() {
        return Err(Error::WidgetMissing {
            path: path.to_path_buf(),
        });
    }

    String::from_utf8(writer.into_inner()).map_err(|e| Error::xml(path, e))
}

fn rebuild_tag<F>(e: &BytesStart<'_>, path: &Path, edit: F) -> Result<BytesStart<'static>>
where
    F: FnOnce(&mut IndexMap<String, String>) -> Result<()>,
{
    let original = decode_attributes(e, path)?;
    let mut edited = original.clone();
    edit(&mut edited)?;

    let mut raw: IndexMap<String, Attribute<'_>> = IndexMap::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| Error::xml(path, err))?;
        raw.insert(String::from_utf8_lossy(attr.key.as_ref()).into_owned(), attr);
    }

    let mut tag = BytesStart::new(element_name(e));
    for (key, value) in &edited {
        match raw.get(key) {
            Some(attr) if original.get(key) == Some(value) => tag.push_attribute(attr.clone()),
            _ => tag.push_attribute((key.as_str(), value.as_str())),
        }
    }
    Ok(tag)
}
