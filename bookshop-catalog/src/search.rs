//! Classification of a free-text lookup term.

/// What a lookup term filters on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTerm {
    /// Exact publisher id. Only produced for base-10 integers greater than zero.
    Publisher(i64),
    /// Case-insensitive substring of the book title. Empty matches every book.
    Title(String),
}

impl SearchTerm {
    /// Classify `input`, used verbatim.
    ///
    /// A term is a publisher id when it is made only of ASCII digits and its
    /// value is positive. Anything else (signs, spaces, `0`, values that do
    /// not fit in an `i64`) is treated as a title fragment.
    pub fn parse(input: &str) -> Self {
        if !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(id) = input.parse::<i64>() {
                if id > 0 {
                    return SearchTerm::Publisher(id);
                }
            }
        }
        SearchTerm::Title(input.to_string())
    }
}
