//! Client-side comment thread attached to a review.
//!
//! Comments live entirely on this machine; nothing here talks to the
//! server. The thread is ordered oldest first, like any conversation.

use thiserror::Error;

use crate::models::Comment;
use crate::store::{FileStore, StoreError};

#[derive(Error, Debug)]
pub enum CommentError {
    #[error("comment author is empty")]
    EmptyAuthor,

    #[error("comment text is empty")]
    EmptyText,

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct CommentThread {
    comments: Vec<Comment>,
    store: FileStore<Comment>,
}

impl CommentThread {
    /// Load the thread from a store, oldest first.
    pub fn load(store: FileStore<Comment>) -> Result<Self, CommentError> {
        let mut comments = store.list()?;
        comments.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(Self { comments, store })
    }

    /// Append a comment. Author and text must be non-blank; the optional
    /// line pins the comment to a code line.
    pub fn add(
        &mut self,
        author: &str,
        text: &str,
        line: Option<u32>,
    ) -> Result<&Comment, CommentError> {
        if author.trim().is_empty() {
            return Err(CommentError::EmptyAuthor);
        }
        if text.trim().is_empty() {
            return Err(CommentError::EmptyText);
        }
        let comment = Comment::new(author.trim(), text.trim(), line);
        self.store.put(&comment.id, &comment)?;
        self.comments.push(comment);
        Ok(&self.comments[self.comments.len() - 1])
    }

    pub fn all(&self) -> &[Comment] {
        &self.comments
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thread(dir: &std::path::Path) -> CommentThread {
        CommentThread::load(FileStore::new_with_dir(dir.to_path_buf())).unwrap()
    }

    #[test]
    fn add_rejects_blank_author_and_text() {
        let dir = tempfile::tempdir().unwrap();
        let mut t = thread(dir.path());
        assert!(matches!(t.add("  ", "hi", None), Err(CommentError::EmptyAuthor)));
        assert!(matches!(t.add("Ada", "\t", None), Err(CommentError::EmptyText)));
        assert!(t.is_empty());
    }

    #[test]
    fn add_trims_and_appends_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut t = thread(dir.path());
        t.add(" Ada ", " first ", None).unwrap();
        t.add("Bob", "second", Some(3)).unwrap();

        assert_eq!(t.len(), 2);
        assert_eq!(t.all()[0].author, "Ada");
        assert_eq!(t.all()[0].text, "first");
        assert_eq!(t.all()[1].line, Some(3));
    }

    #[test]
    fn thread_survives_reload_oldest_first() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut t = thread(dir.path());
            t.add("Ada", "first", None).unwrap();
            t.add("Bob", "second", None).unwrap();
        }
        let t = thread(dir.path());
        let texts: Vec<&str> = t.all().iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
    }
}
