//! Object-level PDF file writer.
//!
//! Objects are numbered up front with [`PdfWriter::alloc`] so they can refer
//! to each other before being written. [`PdfWriter::finish`] appends the
//! cross-reference table and trailer.

use std::fmt;

use super::objects::{EOF, HEADER};

/// Indirect object reference. Displays as `n 0 R`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjRef(pub u32);

impl fmt::Display for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} 0 R", self.0)
    }
}

/// Accumulates a PDF file in memory.
#[derive(Debug)]
pub struct PdfWriter {
    buf: Vec<u8>,
    /// Byte offset of each object, indexed by object number - 1
    offsets: Vec<Option<usize>>,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        Self {
            buf: HEADER.to_vec(),
            offsets: Vec::new(),
        }
    }

    /// Reserve the next object number.
    pub fn alloc(&mut self) -> ObjRef {
        self.offsets.push(None);
        ObjRef(self.offsets.len() as u32)
    }

    /// Write a non-stream object.
    pub fn object(&mut self, id: ObjRef, body: impl AsRef<[u8]>) {
        self.begin(id);
        self.buf.extend_from_slice(body.as_ref());
        self.buf.extend_from_slice(b"\nendobj\n");
    }

    /// Write a stream object. `dict` holds the dictionary entries other
    /// than `/Length`, without the surrounding `<< >>`.
    pub fn stream(&mut self, id: ObjRef, dict: &str, data: &[u8]) {
        self.begin(id);
        let head = if dict.is_empty() {
            format!("<< /Length {} >>\nstream\n", data.len())
        } else {
            format!("<< {} /Length {} >>\nstream\n", dict, data.len())
        };
        self.buf.extend_from_slice(head.as_bytes());
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(b"\nendstream\nendobj\n");
    }

    fn begin(&mut self, id: ObjRef) {
        let slot = (id.0 as usize).checked_sub(1);
        if let Some(offset) = slot.and_then(|slot| self.offsets.get_mut(slot)) {
            *offset = Some(self.buf.len());
        }
        self.buf
            .extend_from_slice(format!("{} 0 obj\n", id.0).as_bytes());
    }

    /// Append the xref table and trailer and return the file bytes.
    ///
    /// Reserved objects that were never written become free entries.
    pub fn finish(mut self, root: ObjRef, info: ObjRef) -> Vec<u8> {
        let xref = self.buf.len();
        let size = self.offsets.len() + 1;

        let mut table = format!("xref\n0 {}\n0000000000 65535 f \n", size);
        for offset in &self.offsets {
            match offset {
                Some(offset) => table.push_str(&format!("{:010} 00000 n \n", offset)),
                None => table.push_str("0000000000 65535 f \n"),
            }
        }
        table.push_str(&format!(
            "trailer\n<< /Size {} /Root {} /Info {} >>\nstartxref\n{}\n",
            size, root, info, xref
        ));

        self.buf.extend_from_slice(table.as_bytes());
        self.buf.extend_from_slice(EOF);
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    fn find(haystack: &[u8], needle: &[u8]) -> usize {
        haystack
            .windows(needle.len())
            .position(|w| w == needle)
            .unwrap()
    }

    #[test]
    fn test_alloc_numbers_from_one() {
        let mut w = PdfWriter::new();
        assert_eq!(w.alloc(), ObjRef(1));
        assert_eq!(w.alloc(), ObjRef(2));
        assert_eq!(ObjRef(2).to_string(), "2 0 R");
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let mut w = PdfWriter::new();
        let a = w.alloc();
        let b = w.alloc();
        // Written out of order
        w.object(b, "<< /Type /Catalog >>");
        w.object(a, "(info)");
        let bytes = w.finish(b, a);

        // The header is binary, so offsets are checked on raw bytes
        let xref_at = find(&bytes, b"xref\n");
        let tail = as_text(&bytes[xref_at..]);
        let entries: Vec<usize> = tail
            .lines()
            .skip(3)
            .take(2)
            .map(|line| line[..10].parse().unwrap())
            .collect();
        assert!(bytes[entries[0]..].starts_with(b"1 0 obj"));
        assert!(bytes[entries[1]..].starts_with(b"2 0 obj"));

        assert!(tail.contains("/Size 3 /Root 2 0 R /Info 1 0 R"));
        assert!(tail.contains(&format!("startxref\n{}\n", xref_at)));
        assert!(tail.ends_with("%%EOF\n"));
    }

    #[test]
    fn test_xref_entries_are_twenty_bytes() {
        let mut w = PdfWriter::new();
        let a = w.alloc();
        w.object(a, "null");
        let text = as_text(&w.finish(a, a));
        let xref_at = text.find("xref\n").unwrap();
        let table = &text[xref_at..];
        let first = table.find("0000000000 65535 f \n").unwrap();
        let body = &table[first..];
        assert_eq!(body.find("trailer").unwrap(), 40);
    }

    #[test]
    fn test_stream_length() {
        let mut w = PdfWriter::new();
        let s = w.alloc();
        w.stream(s, "/Filter /FlateDecode", b"abc");
        let text = as_text(&w.finish(s, s));
        assert!(text.contains("<< /Filter /FlateDecode /Length 3 >>\nstream\nabc\nendstream"));
    }

    #[test]
    fn test_unwritten_object_is_free() {
        let mut w = PdfWriter::new();
        let a = w.alloc();
        let _unused = w.alloc();
        w.object(a, "null");
        let text = as_text(&w.finish(a, a));
        assert_eq!(text.matches("65535 f").count(), 2);
    }
}
