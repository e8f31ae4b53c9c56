/// Construction options for a [`Table`](super::Table).
///
/// # Example
///
/// ```
/// use perspective_table::TableOptions;
///
/// let options = TableOptions::new().name("trades").capacity(1024);
/// assert_eq!(options.name, "trades");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptions {
    /// Name used in log events, errors and pretty-printed output.
    pub name: String,

    /// Number of slots reserved in every column when the table is initialized.
    pub capacity: usize,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            name: "table".to_owned(),
            capacity: 0,
        }
    }
}

impl TableOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}
