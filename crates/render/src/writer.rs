//! Byte-stable PDF file writer.
//!
//! Objects are buffered under fixed ids and written in id order when the
//! document is finished. Dictionaries are written with sorted keys and reals
//! with at most three decimals, so equal object graphs always produce equal
//! bytes.

use lopdf::content::Operation;
use lopdf::{Dictionary, Object, ObjectId, Stream, dictionary};
use std::collections::BTreeMap;
use std::io::{self, Seek, Write};

pub const PDF_VERSION: &str = "1.7";

pub struct PdfWriter<W: Write + Seek> {
    writer: W,
    max_id: u32,
    pub catalog_id: ObjectId,
    pub pages_id: ObjectId,
    pub info_id: ObjectId,
    pub resources_id: ObjectId,
    page_ids: Vec<ObjectId>,
    buffered_objects: BTreeMap<ObjectId, Object>,
}

impl<W: Write + Seek> PdfWriter<W> {
    pub fn new(mut writer: W) -> io::Result<Self> {
        writer.write_all(format!("%PDF-{}\n%âãÏÓ\n", PDF_VERSION).as_bytes())?;
        Ok(Self {
            writer,
            max_id: 4,
            catalog_id: (1, 0),
            pages_id: (2, 0),
            info_id: (3, 0),
            resources_id: (4, 0),
            page_ids: Vec::new(),
            buffered_objects: BTreeMap::new(),
        })
    }

    pub fn new_object_id(&mut self) -> ObjectId {
        self.max_id += 1;
        (self.max_id, 0)
    }

    pub fn buffer_object(&mut self, object: Object) -> ObjectId {
        let id = self.new_object_id();
        self.buffered_objects.insert(id, object);
        id
    }

    pub fn buffer_object_at_id(&mut self, id: ObjectId, object: Object) {
        if id.0 > self.max_id {
            self.max_id = id.0;
        }
        self.buffered_objects.insert(id, object);
    }

    /// Buffers an uncompressed content stream.
    pub fn buffer_content_stream(&mut self, operations: &[Operation]) -> ObjectId {
        let stream = Stream::new(Dictionary::new(), encode_operations(operations));
        self.buffer_object(Object::Stream(stream))
    }

    pub fn push_page_id(&mut self, id: ObjectId) {
        self.page_ids.push(id);
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Writes every buffered object, the cross-reference table and the
    /// trailer. `catalog_extra` is merged into the catalog; `file_id` becomes
    /// both halves of the trailer `/ID`.
    pub fn finish(
        mut self,
        resources: Dictionary,
        info: Dictionary,
        catalog_extra: Dictionary,
        file_id: &[u8],
    ) -> io::Result<W> {
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => self.page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<Object>>(),
            "Count" => self.page_ids.len() as i64,
        };
        self.buffer_object_at_id(self.pages_id, pages_dict.into());
        self.buffer_object_at_id(self.resources_id, resources.into());
        self.buffer_object_at_id(self.info_id, info.into());

        let mut catalog_dict = dictionary! { "Type" => "Catalog", "Pages" => self.pages_id };
        for (key, value) in catalog_extra.iter() {
            catalog_dict.set(key.clone(), value.clone());
        }
        self.buffer_object_at_id(self.catalog_id, catalog_dict.into());

        let mut offsets = BTreeMap::new();
        for (id, object) in &self.buffered_objects {
            offsets.insert(id.0, self.writer.stream_position()?);
            internal_writer::write_indirect_object(&mut self.writer, *id, object)?;
        }

        let xref_start = self.writer.stream_position()?;
        let size = self.max_id + 1;
        internal_writer::write_xref(&mut self.writer, size, &offsets)?;

        let id_string = Object::String(file_id.to_vec(), lopdf::StringFormat::Hexadecimal);
        let trailer = dictionary! {
            "Size" => size as i64,
            "Root" => self.catalog_id,
            "Info" => self.info_id,
            "ID" => vec![id_string.clone(), id_string],
        };
        writeln!(self.writer, "trailer")?;
        internal_writer::write_dictionary(&mut self.writer, &trailer)?;
        writeln!(self.writer, "\nstartxref")?;
        writeln!(self.writer, "{}", xref_start)?;
        write!(self.writer, "%%EOF")?;

        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Serializes content stream operations, one per line.
pub fn encode_operations(operations: &[Operation]) -> Vec<u8> {
    let mut out = Vec::new();
    for op in operations {
        for operand in &op.operands {
            // Writing to a Vec cannot fail.
            let _ = internal_writer::write_object(&mut out, operand);
            out.push(b' ');
        }
        out.extend_from_slice(op.operator.as_bytes());
        out.push(b'\n');
    }
    out
}

/// Formats a real with at most three decimals and no trailing zeros.
pub fn format_real(value: f32) -> String {
    let mut s = format!("{:.3}", value);
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

mod internal_writer {
    use super::*;
    use lopdf::StringFormat;

    pub fn write_indirect_object<W: Write>(writer: &mut W, id: ObjectId, object: &Object) -> io::Result<()> {
        writeln!(writer, "{} {} obj", id.0, id.1)?;
        write_object(writer, object)?;
        writeln!(writer, "\nendobj")?;
        Ok(())
    }

    pub fn write_object(writer: &mut dyn Write, object: &Object) -> io::Result<()> {
        match object {
            Object::Null => writer.write_all(b"null"),
            Object::Boolean(b) => writer.write_all(if *b { b"true" } else { b"false" }),
            Object::Integer(i) => write!(writer, "{}", i),
            Object::Real(r) => writer.write_all(format_real(*r).as_bytes()),
            Object::Name(n) => {
                writer.write_all(b"/")?;
                writer.write_all(n)
            }
            Object::String(s, format) => match format {
                StringFormat::Literal => {
                    writer.write_all(b"(")?;
                    for &byte in s {
                        match byte {
                            b'(' | b')' | b'\\' => writer.write_all(&[b'\\', byte])?,
                            b'\r' => writer.write_all(b"\\r")?,
                            _ => writer.write_all(&[byte])?,
                        }
                    }
                    writer.write_all(b")")
                }
                StringFormat::Hexadecimal => {
                    writer.write_all(b"<")?;
                    for b in s {
                        write!(writer, "{:02X}", b)?;
                    }
                    writer.write_all(b">")
                }
            },
            Object::Array(arr) => {
                writer.write_all(b"[")?;
                for (i, obj) in arr.iter().enumerate() {
                    if i > 0 {
                        writer.write_all(b" ")?;
                    }
                    write_object(writer, obj)?;
                }
                writer.write_all(b"]")
            }
            Object::Dictionary(dict) => write_dictionary(writer, dict),
            Object::Stream(stream) => {
                let mut dict = stream.dict.clone();
                dict.set("Length", stream.content.len() as i64);
                write_dictionary(writer, &dict)?;
                writer.write_all(b"\nstream\n")?;
                writer.write_all(&stream.content)?;
                writer.write_all(b"\nendstream")
            }
            Object::Reference(id) => write!(writer, "{} {} R", id.0, id.1),
        }
    }

    pub fn write_dictionary(writer: &mut dyn Write, dict: &Dictionary) -> io::Result<()> {
        writer.write_all(b"<<")?;
        let sorted: BTreeMap<&Vec<u8>, &Object> = dict.iter().collect();
        for (key, value) in sorted {
            writer.write_all(b"/")?;
            writer.write_all(key)?;
            writer.write_all(b" ")?;
            write_object(writer, value)?;
            writer.write_all(b" ")?;
        }
        writer.write_all(b">>")
    }

    /// One section covering ids `0..size`; ids that were never written are free.
    pub fn write_xref<W: Write>(writer: &mut W, size: u32, offsets: &BTreeMap<u32, u64>) -> io::Result<()> {
        writeln!(writer, "xref")?;
        writeln!(writer, "0 {}", size)?;
        writeln!(writer, "0000000000 65535 f ")?;
        for id in 1..size {
            match offsets.get(&id) {
                Some(offset) => writeln!(writer, "{:010} 00000 n ", offset)?,
                None => writeln!(writer, "0000000000 00000 f ")?,
            }
        }
        Ok(())
    }
}
