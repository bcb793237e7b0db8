//! Streaming OSM XML output.
//!
//! The document is the JOSM-style import format: an `<osm>` root with
//! `upload="false"` and one `<node>` per facility, each carrying its tags as
//! empty `<tag k v>` elements. Attribute values are entity-escaped by the
//! writer.

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use crate::error::Result;
use crate::types::OutputRecord;

const GENERATOR: &str = concat!("facility2osm v", env!("CARGO_PKG_VERSION"));

pub struct OsmWriter<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> OsmWriter<W> {
    /// Starts a new document: XML declaration plus the opening root element.
    pub fn new(inner: W) -> Result<Self> {
        let mut writer = Writer::new_with_indent(inner, b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut root = BytesStart::new("osm");
        root.push_attribute(("version", "0.6"));
        root.push_attribute(("generator", GENERATOR));
        root.push_attribute(("upload", "false"));
        writer.write_event(Event::Start(root))?;

        Ok(Self { writer })
    }

    /// Writes one node element with its tags in record order.
    pub fn write_node(&mut self, record: &OutputRecord) -> Result<()> {
        let id = record.id.to_string();
        let lat = format!("{:.6}", record.latitude);
        let lon = format!("{:.6}", record.longitude);

        let mut node = BytesStart::new("node");
        node.push_attribute(("id", id.as_str()));
        node.push_attribute(("lat", lat.as_str()));
        node.push_attribute(("lon", lon.as_str()));

        if record.tags.is_empty() {
            self.writer.write_event(Event::Empty(node))?;
            return Ok(());
        }

        self.writer.write_event(Event::Start(node))?;
        for (key, value) in &record.tags {
            let mut tag = BytesStart::new("tag");
            tag.push_attribute(("k", key.as_str()));
            tag.push_attribute(("v", value.as_str()));
            self.writer.write_event(Event::Empty(tag))?;
        }
        self.writer.write_event(Event::End(BytesEnd::new("node")))?;
        Ok(())
    }

    /// Flushes the underlying stream; called after each feed page so a
    /// mid-run failure does not lose earlier pages.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.get_mut().flush()?;
        Ok(())
    }

    /// Closes the root element and returns the underlying stream.
    pub fn finish(mut self) -> Result<W> {
        self.writer.write_event(Event::End(BytesEnd::new("osm")))?;
        let mut inner = self.writer.into_inner();
        inner.write_all(b"\n")?;
        inner.flush()?;
        Ok(inner)
    }
}
