use std::{borrow::Cow, io::Write};

use crate::{features::Attribute, options::EscapeMode};

pub const DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8" ?>"#;
const INDENT: &str = "  ";

/// Append-only markup sink.
///
/// Knows nothing about the hierarchy; callers pass the nesting depth.
#[derive(Debug)]
pub struct XmlWriter<W: Write> {
    inner: W,
    escape: EscapeMode,
}

impl<W: Write> XmlWriter<W> {
    pub fn new(inner: W, escape: EscapeMode) -> Self {
        Self { inner, escape }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn declaration(&mut self) -> std::io::Result<()> {
        writeln!(self.inner, "{DECLARATION}")
    }

    fn indent(&mut self, depth: usize) -> std::io::Result<()> {
        for _ in 0..depth {
            self.inner.write_all(INDENT.as_bytes())?;
        }
        Ok(())
    }

    /// `<name>` or `<name index="i">` on its own line.
    pub fn open(&mut self, name: &str, index: Option<u32>, depth: usize) -> std::io::Result<()> {
        self.indent(depth)?;
        match index {
            Some(index) => writeln!(self.inner, r#"<{name} index="{index}">"#),
            None => writeln!(self.inner, "<{name}>"),
        }
    }

    pub fn close(&mut self, name: &str, depth: usize) -> std::io::Result<()> {
        self.indent(depth)?;
        writeln!(self.inner, "</{name}>")
    }

    /// Closing tag with no line break after it, used for the document root.
    pub fn close_last(&mut self, name: &str, depth: usize) -> std::io::Result<()> {
        self.indent(depth)?;
        write!(self.inner, "</{name}>")
    }

    /// Start tag and text of an inline leaf; the end tag follows later via
    /// [`XmlWriter::close_leaf`].
    pub fn open_leaf(
        &mut self,
        name: &str,
        tag: &str,
        attributes: &[Attribute],
        content: &str,
        depth: usize,
    ) -> std::io::Result<()> {
        let escape = self.escape;
        self.indent(depth)?;
        write!(self.inner, r#"<{name} tag="{}""#, attr_value(escape, tag))?;
        for attr in attributes {
            write!(
                self.inner,
                r#" {}="{}""#,
                attr.name,
                attr_value(escape, &attr.value)
            )?;
        }
        write!(self.inner, ">{}", text(escape, content))
    }

    pub fn close_leaf(&mut self, name: &str) -> std::io::Result<()> {
        writeln!(self.inner, "</{name}>")
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

fn attr_value(mode: EscapeMode, value: &str) -> Cow<'_, str> {
    match mode {
        EscapeMode::None => Cow::Borrowed(value),
        EscapeMode::Xml => escape(value, true),
    }
}

fn text(mode: EscapeMode, value: &str) -> Cow<'_, str> {
    match mode {
        EscapeMode::None => Cow::Borrowed(value),
        EscapeMode::Xml => escape(value, false),
    }
}

fn escape(value: &str, quotes: bool) -> Cow<'_, str> {
    let needs = |c: char| matches!(c, '&' | '<' | '>') || (quotes && c == '"');
    if !value.chars().any(needs) {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if quotes => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}
