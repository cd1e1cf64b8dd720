//! The hierarchical state machine.
//!
//! The emitter keeps an explicit stack of open elements
//! (`corpus > chapter > verse > token > bit`) and the path of the chapter,
//! verse and token currently open. For each record it closes exactly the
//! levels whose index changed, reopens them with the new indices and then
//! writes the record as a `<bit>` leaf.

use std::io::Write;

use crate::{
    error::{Error, Result},
    features::parse_features,
    options::{EscapeMode, OrderPolicy},
    record::{HierarchyPath, Location, Record},
    transliterate::transliterate,
    writer::XmlWriter,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementKind {
    Corpus,
    Chapter,
    Verse,
    Token,
    Bit,
}

impl ElementKind {
    pub const ALL: [ElementKind; 5] = [
        ElementKind::Corpus,
        ElementKind::Chapter,
        ElementKind::Verse,
        ElementKind::Token,
        ElementKind::Bit,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Corpus => "corpus",
            ElementKind::Chapter => "chapter",
            ElementKind::Verse => "verse",
            ElementKind::Token => "token",
            ElementKind::Bit => "bit",
        }
    }

    /// Nesting depth, which is also the indentation level.
    pub fn depth(&self) -> usize {
        *self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenElement {
    pub kind: ElementKind,
    /// `None` for the root and for bits.
    pub index: Option<u32>,
}

/// The shallowest level a record caused to be reopened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Chapter,
    Verse,
    Token,
    Bit,
}

impl Transition {
    pub fn kind(&self) -> ElementKind {
        match self {
            Transition::Chapter => ElementKind::Chapter,
            Transition::Verse => ElementKind::Verse,
            Transition::Token => ElementKind::Token,
            Transition::Bit => ElementKind::Bit,
        }
    }

    /// Number of levels closed and reopened, counting the bit.
    pub fn levels(&self) -> usize {
        ElementKind::Bit.depth() - self.kind().depth() + 1
    }

    fn between(current: HierarchyPath, next: HierarchyPath) -> Transition {
        if current.chapter != next.chapter {
            Transition::Chapter
        } else if current.verse != next.verse {
            Transition::Verse
        } else if current.token != next.token {
            Transition::Token
        } else {
            Transition::Bit
        }
    }
}

pub struct Emitter<W: Write> {
    writer: XmlWriter<W>,
    stack: Vec<OpenElement>,
    current: HierarchyPath,
    last: Option<Location>,
    order: OrderPolicy,
    opened: [usize; 5],
}

impl<W: Write> Emitter<W> {
    /// Writes the declaration and opens the root.
    pub fn new(sink: W, escape: EscapeMode, order: OrderPolicy) -> Result<Self> {
        let mut emitter = Self {
            writer: XmlWriter::new(sink, escape),
            stack: Vec::with_capacity(ElementKind::ALL.len()),
            current: HierarchyPath::default(),
            last: None,
            order,
            opened: [0; 5],
        };

        emitter.writer.declaration()?;
        emitter.open(ElementKind::Corpus, None)?;

        Ok(emitter)
    }

    /// Emit one record. `line` is only used for error reporting.
    pub fn emit(&mut self, record: &Record, line: usize) -> Result<Transition> {
        let location = record.location;

        if let Some(previous) = self.last {
            if location <= previous {
                match self.order {
                    OrderPolicy::Strict => {
                        return Err(Error::OutOfOrderRecord {
                            line,
                            previous,
                            found: location,
                        });
                    }
                    OrderPolicy::Lenient => {
                        tracing::warn!(
                            "line {line}: {location} does not follow {previous}, emitting as is"
                        );
                    }
                }
            }
        }

        let path = location.path();
        let transition = match self.last {
            None => Transition::Chapter,
            Some(_) => Transition::between(self.current, path),
        };

        tracing::trace!("{location}: {:?}", transition);

        self.close_to(transition.kind().depth())?;

        if transition == Transition::Chapter {
            tracing::debug!("Opening chapter {}", path.chapter);
            self.open(ElementKind::Chapter, Some(path.chapter))?;
        }
        if matches!(transition, Transition::Chapter | Transition::Verse) {
            self.open(ElementKind::Verse, Some(path.verse))?;
        }
        if transition != Transition::Bit {
            self.open(ElementKind::Token, Some(path.token))?;
        }
        self.open_bit(record)?;

        self.current = path;
        self.last = Some(location);

        Ok(transition)
    }

    /// Close every open element, root included, and hand back the sink.
    pub fn finish(mut self) -> Result<W> {
        self.close_to(1)?;
        if self.stack.pop().is_some() {
            self.writer.close_last(ElementKind::Corpus.name(), 0)?;
        }
        self.writer.flush()?;
        Ok(self.writer.into_inner())
    }

    pub fn stack(&self) -> &[OpenElement] {
        &self.stack
    }

    pub fn path(&self) -> HierarchyPath {
        self.current
    }

    /// How many elements of `kind` have been opened so far.
    pub fn opened(&self, kind: ElementKind) -> usize {
        self.opened[kind.depth()]
    }

    pub fn sink(&self) -> &W {
        self.writer.get_ref()
    }

    pub fn sink_mut(&mut self) -> &mut W {
        self.writer.get_mut()
    }

    fn open(&mut self, kind: ElementKind, index: Option<u32>) -> std::io::Result<()> {
        self.writer.open(kind.name(), index, kind.depth())?;
        self.push(kind, index);
        Ok(())
    }

    fn open_bit(&mut self, record: &Record) -> std::io::Result<()> {
        let attributes = parse_features(&record.features);
        let text = transliterate(&record.form);
        self.writer.open_leaf(
            ElementKind::Bit.name(),
            &record.tag,
            &attributes,
            &text,
            ElementKind::Bit.depth(),
        )?;
        self.push(ElementKind::Bit, None);
        Ok(())
    }

    fn push(&mut self, kind: ElementKind, index: Option<u32>) {
        debug_assert_eq!(self.stack.len(), kind.depth());
        self.stack.push(OpenElement { kind, index });
        self.opened[kind.depth()] += 1;
    }

    /// Pop and close elements until `len` remain.
    fn close_to(&mut self, len: usize) -> std::io::Result<()> {
        while self.stack.len() > len {
            let Some(element) = self.stack.pop() else {
                break;
            };
            match element.kind {
                ElementKind::Bit => self.writer.close_leaf(element.kind.name())?,
                kind => self.writer.close(kind.name(), kind.depth())?,
            }
        }
        Ok(())
    }
}
