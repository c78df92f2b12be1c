use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use serde::ser::Error as _;
use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use tracing::info;

use crate::error::{Error, Result};
use crate::extract::QuestionsByTopic;

const INDENT: &[u8] = b"    ";

/// Renders the questions as a JSON object of arrays, four-space indented.
pub fn to_json_pretty(questions: &QuestionsByTopic, ensure_ascii: bool) -> Result<String> {
    let pretty = PrettyFormatter::with_indent(INDENT);
    let mut buf = Vec::new();
    if ensure_ascii {
        let formatter = AsciiFormatter { inner: pretty };
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        questions.serialize(&mut ser)?;
    } else {
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, pretty);
        questions.serialize(&mut ser)?;
    }
    String::from_utf8(buf).map_err(|e| Error::Serialize(serde_json::Error::custom(e)))
}

pub fn write_output(path: &Path, json: &str) -> Result<()> {
    let write_err = |source| Error::WriteOutput {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::create(path).map_err(write_err)?;
    file.write_all(json.as_bytes()).map_err(write_err)?;
    info!(path = %path.display(), bytes = json.len(), "wrote questions");
    Ok(())
}

/// Prints to stdout (unless `print` is false), then writes the file.
pub fn emit(json: &str, path: &Path, print: bool) -> Result<()> {
    if print {
        println!("{json}");
    }
    write_output(path, json)
}

/// Pretty formatter that writes every char outside printable ASCII as a
/// `\uXXXX` escape, splitting astral chars into UTF-16 surrogate pairs.
struct AsciiFormatter<'a> {
    inner: PrettyFormatter<'a>,
}

impl Formatter for AsciiFormatter<'_> {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if (' '..='~').contains(&ch) {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }

    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_array(writer)
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object(writer)
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.inner.end_object_value(writer)
    }
}
