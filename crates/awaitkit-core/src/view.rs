use std::fmt;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ViewKind {
    /// Renders nothing. This is what a component returns when it has no
    /// output for the current state.
    #[default]
    Empty,
    Box,
    Row,
    Column,
    Text {
        text: String,
    },
}

/// Render output of a composition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct View {
    pub kind: ViewKind,
    pub children: Vec<View>,
}

impl View {
    pub fn new(kind: ViewKind) -> Self {
        View {
            kind,
            children: vec![],
        }
    }

    pub fn empty() -> Self {
        View::default()
    }

    pub fn with_children(mut self, kids: Vec<View>) -> Self {
        self.children = kids;
        self
    }

    pub fn child(mut self, kid: View) -> Self {
        self.children.push(kid);
        self
    }

    /// True when neither this node nor any descendant renders anything.
    pub fn is_empty(&self) -> bool {
        matches!(self.kind, ViewKind::Empty) && self.children.iter().all(View::is_empty)
    }

    /// Concatenated text of every `Text` node, depth first.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let ViewKind::Text { text } = &self.kind {
            out.push_str(text);
        }
        for c in &self.children {
            c.collect_text(out);
        }
    }
}

/// Compact one-line tree dump, e.g. `Column[Text("a"), Empty]`.
impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViewKind::Empty => write!(f, "Empty")?,
            ViewKind::Box => write!(f, "Box")?,
            ViewKind::Row => write!(f, "Row")?,
            ViewKind::Column => write!(f, "Column")?,
            ViewKind::Text { text } => write!(f, "Text({text:?})")?,
        }
        if !self.children.is_empty() {
            write!(f, "[")?;
            for (i, c) in self.children.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{c}")?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}
