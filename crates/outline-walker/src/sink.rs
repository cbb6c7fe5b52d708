//! Line sinks: where rendered outlines go.

use crate::outline::OutlineLine;
use std::io::{self, Write};

/// A destination for outline lines.
pub trait LineSink {
    fn emit(&mut self, line: &OutlineLine) -> io::Result<()>;

    fn emit_all(&mut self, lines: &[OutlineLine]) -> io::Result<()> {
        for line in lines {
            self.emit(line)?;
        }
        Ok(())
    }
}

/// Collects the literal line texts.
impl LineSink for Vec<String> {
    fn emit(&mut self, line: &OutlineLine) -> io::Result<()> {
        self.push(line.text.clone());
        Ok(())
    }
}

/// Writes one line per outline line to any writer.
pub struct WriterSink<W: Write> {
    writer: W,
    indent: usize,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, indent: 0 }
    }

    /// Indent nested lines by `width` spaces per level (0 keeps lines literal).
    pub fn with_indent(mut self, width: usize) -> Self {
        self.indent = width;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> LineSink for WriterSink<W> {
    fn emit(&mut self, line: &OutlineLine) -> io::Result<()> {
        writeln!(self.writer, "{}", line.indented(self.indent))
    }

    fn emit_all(&mut self, lines: &[OutlineLine]) -> io::Result<()> {
        for line in lines {
            self.emit(line)?;
        }
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines() -> Vec<OutlineLine> {
        vec![
            OutlineLine::new(0, "namespace NS {"),
            OutlineLine::new(1, "function test.cpp:2:9"),
            OutlineLine::new(0, "}"),
        ]
    }

    #[test]
    fn test_vec_sink_collects_text() {
        let mut sink: Vec<String> = Vec::new();
        sink.emit_all(&lines()).unwrap();
        assert_eq!(sink, ["namespace NS {", "function test.cpp:2:9", "}"]);
    }

    #[test]
    fn test_writer_sink_literal() {
        let mut sink = WriterSink::new(Vec::new());
        sink.emit_all(&lines()).unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "namespace NS {\nfunction test.cpp:2:9\n}\n");
    }

    #[test]
    fn test_writer_sink_indented() {
        let mut sink = WriterSink::new(Vec::new()).with_indent(4);
        sink.emit_all(&lines()).unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "namespace NS {\n    function test.cpp:2:9\n}\n");
    }
}
