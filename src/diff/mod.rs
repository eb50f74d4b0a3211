//! Side-by-side pairing of original and improved code.
//!
//! Lines pair positionally — index N on the left sits next to index N on
//! the right. This is a deliberate simplicity trade-off for rendering
//! refactoring suggestions, not a diff algorithm; there is no content
//! alignment.

/// Two independent line sequences for side-by-side display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideBySide {
    pub original: Vec<String>,
    pub improved: Vec<String>,
}

impl SideBySide {
    /// Split both texts into lines. The sequences keep their own lengths;
    /// callers pad the shorter side at render time if they need to.
    pub fn pair(original: &str, improved: &str) -> Self {
        Self {
            original: split_lines(original),
            improved: split_lines(improved),
        }
    }

    /// Number of display rows needed to show both sides.
    pub fn rows(&self) -> usize {
        self.original.len().max(self.improved.len())
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_string).collect()
}
