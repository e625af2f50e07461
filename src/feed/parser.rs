//! Streaming RSS/Atom parser built on `quick-xml`.
//!
//! The format is detected from the root element:
//!
//! | Root | Format | Entry element |
//! |------|--------|---------------|
//! | `<rss>` | RSS 2.0 | `<item>` |
//! | `<rdf:RDF>` | RSS 1.0 | `<item>` |
//! | `<feed>` / `<atom:feed>` | Atom | `<entry>` |
//!
//! Only direct children of an entry are read as fields. A field's value is its
//! full text content (text, CDATA and resolved entities, including the text of
//! nested markup), trimmed. Date text is kept exactly as written.
//!
//! Text is decoded using the encoding named in the XML declaration (or BOM),
//! UTF-8 when none is given.

use crate::error::FeedError;
use crate::models::RawEntry;
use quick_xml::encoding::Decoder;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

/// Syndication format, detected from the document's root element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFormat {
    Rss,
    Rdf,
    Atom,
}

/// Split a qualified name into its prefix and local part.
fn split_qname(qname: &[u8]) -> (Option<&[u8]>, &[u8]) {
    match qname.iter().position(|&b| b == b':') {
        Some(i) => (Some(&qname[..i]), &qname[i + 1..]),
        None => (None, qname),
    }
}

/// The detected format plus the prefix its elements are written with.
///
/// RSS elements are matched by qualified name (`dc:date` stays distinct from
/// `date`). Atom elements are matched by local name when they carry the same
/// prefix as the root, so `<atom:feed><atom:entry>` reads like `<feed><entry>`
/// while foreign elements such as `<media:title>` are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Dialect {
    format: FeedFormat,
    prefix: Option<Vec<u8>>,
}

impl Dialect {
    fn detect(root: &BytesStart<'_>) -> Result<Self, FeedError> {
        let (prefix, local) = split_qname(root.name().into_inner());
        let format = match local {
            b"rss" => FeedFormat::Rss,
            b"RDF" => FeedFormat::Rdf,
            b"feed" => FeedFormat::Atom,
            other => {
                return Err(FeedError::NotAFeed {
                    root: String::from_utf8_lossy(other).into_owned(),
                });
            }
        };
        let prefix = match format {
            FeedFormat::Atom => prefix.map(<[u8]>::to_vec),
            FeedFormat::Rss | FeedFormat::Rdf => None,
        };
        Ok(Self { format, prefix })
    }

    /// The name `e` is matched under, or `None` for elements outside the
    /// feed's own vocabulary.
    fn name_of<'e>(&self, e: &'e BytesStart<'_>) -> Option<&'e [u8]> {
        let qname = e.name().into_inner();
        match self.format {
            FeedFormat::Rss | FeedFormat::Rdf => Some(qname),
            FeedFormat::Atom => {
                let (prefix, local) = split_qname(qname);
                (prefix == self.prefix.as_deref()).then_some(local)
            }
        }
    }

    fn is_entry(&self, name: &[u8]) -> bool {
        match self.format {
            FeedFormat::Rss | FeedFormat::Rdf => name == b"item",
            FeedFormat::Atom => name == b"entry",
        }
    }

    fn is_atom_link(&self, name: &[u8]) -> bool {
        self.format == FeedFormat::Atom && name == b"link"
    }

    fn field(&self, name: &[u8]) -> Option<Field> {
        match (self.format, name) {
            (_, b"title") => Some(Field::Title),
            (FeedFormat::Rss | FeedFormat::Rdf, b"link") => Some(Field::Link),
            (FeedFormat::Rss | FeedFormat::Rdf, b"pubDate") => Some(Field::Published),
            (FeedFormat::Rss | FeedFormat::Rdf, b"dc:date") => Some(Field::PublishedFallback),
            (FeedFormat::Rss | FeedFormat::Rdf, b"description") => Some(Field::Summary),
            (FeedFormat::Atom, b"published") => Some(Field::Published),
            (FeedFormat::Atom, b"updated") => Some(Field::PublishedFallback),
            (FeedFormat::Atom, b"summary") => Some(Field::Summary),
            (FeedFormat::Atom, b"content") => Some(Field::SummaryFallback),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    Published,
    /// `dc:date` or Atom `updated`, used only when no publication date is
    /// given. Atom `updated` is a modification time, so an entry lacking
    /// `published` reports when it last changed.
    PublishedFallback,
    Summary,
    SummaryFallback,
}

/// Text being collected for one field of the current entry.
struct Capture {
    field: Field,
    depth: usize,
    text: String,
}

#[derive(Default)]
struct EntryBuilder {
    title: Option<String>,
    link: Option<String>,
    published: Option<String>,
    published_fallback: Option<String>,
    summary: Option<String>,
    summary_fallback: Option<String>,
}

impl EntryBuilder {
    /// First non-empty value wins.
    fn set(&mut self, field: Field, value: &str) {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Link => &mut self.link,
            Field::Published => &mut self.published,
            Field::PublishedFallback => &mut self.published_fallback,
            Field::Summary => &mut self.summary,
            Field::SummaryFallback => &mut self.summary_fallback,
        };
        if slot.is_none() && !value.is_empty() {
            *slot = Some(value.to_string());
        }
    }

    /// Atom links carry the URL in `href`; only alternate (or rel-less) links count.
    fn set_atom_link(&mut self, e: &BytesStart<'_>, decoder: Decoder) {
        let mut href = None;
        let mut rel = None;
        for attr in e.attributes().flatten() {
            let value = match decoder.decode(&attr.value) {
                Ok(value) => value.into_owned(),
                Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
            };
            match split_qname(attr.key.into_inner()).1 {
                b"href" => href = Some(value),
                b"rel" => rel = Some(value),
                _ => {}
            }
        }
        if !matches!(rel.as_deref(), None | Some("alternate")) {
            return;
        }
        if let Some(href) = href {
            let href = match unescape(&href) {
                Ok(resolved) => resolved.into_owned(),
                Err(_) => href.clone(),
            };
            self.set(Field::Link, href.trim());
        }
    }

    fn build(self) -> RawEntry {
        RawEntry {
            title: self.title,
            link: self.link,
            published: self.published.or(self.published_fallback),
            summary: self.summary.or(self.summary_fallback),
        }
    }
}

/// Parse a feed document into its entries, in document order.
///
/// # Errors
///
/// - [`FeedError::NotAFeed`] if the root element is not `rss`, `RDF` or `feed`
/// - [`FeedError::Parse`] for malformed XML, undecodable text or an empty document
pub fn parse_feed(xml: &[u8]) -> Result<Vec<RawEntry>, FeedError> {
    let mut reader = Reader::from_reader(xml);

    let mut dialect: Option<Dialect> = None;
    let mut entries = Vec::new();
    let mut buf = Vec::new();

    let mut depth = 0usize;
    let mut current: Option<(EntryBuilder, usize)> = None;
    let mut capture: Option<Capture> = None;

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                depth += 1;
                let Some(dialect) = dialect.as_ref() else {
                    dialect = Some(Dialect::detect(&e)?);
                    continue;
                };
                let Some(name) = dialect.name_of(&e) else {
                    continue;
                };
                match current.as_mut() {
                    Some((builder, entry_depth))
                        if capture.is_none() && depth == *entry_depth + 1 =>
                    {
                        if dialect.is_atom_link(name) {
                            builder.set_atom_link(&e, reader.decoder());
                        } else if let Some(field) = dialect.field(name) {
                            capture = Some(Capture {
                                field,
                                depth,
                                text: String::new(),
                            });
                        }
                    }
                    Some(_) => {}
                    None if dialect.is_entry(name) => {
                        current = Some((EntryBuilder::default(), depth));
                    }
                    None => {}
                }
            }
            Ok(Event::Empty(e)) => {
                let Some(dialect) = dialect.as_ref() else {
                    // A self-closing root is a feed with nothing in it.
                    dialect = Some(Dialect::detect(&e)?);
                    continue;
                };
                if let Some((builder, entry_depth)) = current.as_mut() {
                    if capture.is_none()
                        && depth == *entry_depth
                        && dialect.name_of(&e).is_some_and(|name| dialect.is_atom_link(name))
                    {
                        builder.set_atom_link(&e, reader.decoder());
                    }
                }
            }
            Ok(Event::End(_)) => {
                if let Some(done) = capture.take_if(|c| c.depth == depth) {
                    if let Some((builder, _)) = current.as_mut() {
                        builder.set(done.field, done.text.trim());
                    }
                }
                if current.as_ref().is_some_and(|(_, d)| *d == depth) {
                    if let Some((builder, _)) = current.take() {
                        entries.push(builder.build());
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Text(e)) => {
                if let Some(c) = capture.as_mut() {
                    let raw = reader
                        .decoder()
                        .decode(&e)
                        .map_err(|err| FeedError::Parse(err.to_string()))?;
                    match unescape(&raw) {
                        Ok(text) => c.text.push_str(&text),
                        Err(_) => c.text.push_str(&raw),
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(c) = capture.as_mut() {
                    let text = reader
                        .decoder()
                        .decode(&e)
                        .map_err(|err| FeedError::Parse(err.to_string()))?;
                    c.text.push_str(&text);
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if let Some(c) = capture.as_mut() {
                    let name = reader
                        .decoder()
                        .decode(&e)
                        .map_err(|err| FeedError::Parse(err.to_string()))?;
                    push_reference(&mut c.text, &name);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(FeedError::Parse(format!(
                    "XML error at byte {}: {}",
                    reader.error_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    match dialect {
        Some(_) => Ok(entries),
        None => Err(FeedError::Parse("document has no root element".to_string())),
    }
}

/// Append the text an `&name;` reference stands for. Unknown entities are
/// kept as written.
fn push_reference(out: &mut String, name: &str) {
    if let Some(code) = name.strip_prefix('#') {
        let parsed = match code.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse::<u32>().ok(),
        };
        if let Some(ch) = parsed.and_then(char::from_u32) {
            out.push(ch);
            return;
        }
    } else if let Some(text) = resolve_predefined_entity(name) {
        out.push_str(text);
        return;
    }
    out.push('&');
    out.push_str(name);
    out.push(';');
}
