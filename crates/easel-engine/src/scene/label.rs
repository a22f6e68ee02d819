use std::fmt;

/// Identity of a drawable: creation index + type tag.
///
/// Used only for GPU object labels and log lines.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectLabel {
    index: u64,
    kind: &'static str,
}

impl ObjectLabel {
    #[inline]
    pub fn index(&self) -> u64 {
        self.index
    }

    #[inline]
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Label for a GPU object owned by this drawable, e.g. `"vertices Triangle#3"`.
    pub fn resource(&self, what: &str) -> String {
        format!("{what} {self}")
    }
}

impl fmt::Display for ObjectLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.index)
    }
}

/// Monotonic creation counter. Indices start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct ObjectCounter {
    issued: u64,
}

impl ObjectCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, kind: &'static str) -> ObjectLabel {
        self.issued += 1;
        ObjectLabel {
            index: self.issued,
            kind,
        }
    }

    /// Number of labels handed out so far.
    pub fn issued(&self) -> u64 {
        self.issued
    }
}
