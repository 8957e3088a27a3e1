//! Paragraphs and their inline children.

use super::{ControlChar, ControlClass, ControlId, EmbeddedList, Table};

/// A run of literal text. Never contains C0 control characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Run {
    pub text: String,
}

/// One child of a paragraph, in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Run(Run),
    Control(ControlChar),
    Table(Table),
    Embedded(EmbeddedList),
}

/// A paragraph: an ordered sequence of runs, control characters and the
/// objects anchored in it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub children: Vec<Inline>,
}

impl Paragraph {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append literal text, merging with a trailing run.
    ///
    /// C0 control characters are dropped.
    pub fn push_text(&mut self, text: &str) {
        let clean = text.chars().filter(|&c| c >= ' ');
        if let Some(Inline::Run(run)) = self.children.last_mut() {
            run.text.extend(clean);
            return;
        }
        let text: String = clean.collect();
        if !text.is_empty() {
            self.children.push(Inline::Run(Run { text }));
        }
    }

    pub fn push_control(&mut self, control: ControlChar) {
        self.children.push(Inline::Control(control));
    }

    /// Append a control of the given class with no identifier.
    pub fn push_class(&mut self, code: u16, class: ControlClass) {
        self.push_control(ControlChar {
            code,
            class,
            id: None,
        });
    }

    /// Replace the first unresolved extended control with identifier `id`
    /// by `node`, or append `node` when no such anchor exists.
    pub fn resolve_anchor(&mut self, id: ControlId, node: Inline) {
        let slot = self.children.iter_mut().find(|child| {
            matches!(child, Inline::Control(c) if c.class == ControlClass::Extended && c.id == Some(id))
        });
        match slot {
            Some(slot) => *slot = node,
            None => self.children.push(node),
        }
    }

    /// Literal text of the runs only, ignoring controls and objects.
    pub fn run_text(&self) -> String {
        self.children
            .iter()
            .filter_map(|c| match c {
                Inline::Run(r) => Some(r.text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Tables anchored in this paragraph.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.children.iter().filter_map(|c| match c {
            Inline::Table(t) => Some(t),
            _ => None,
        })
    }

    /// Whether the paragraph has no children at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}
