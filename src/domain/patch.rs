//! Line-anchored text insertion.

/// Result of applying an insertion to a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    /// Content was inserted; carries the new document.
    Applied(String),
    /// Content already appears after the anchor; the document is unchanged.
    AlreadyPresent,
    /// The anchor does not occur in the document.
    AnchorMissing,
}

/// Insert `content` immediately after the first occurrence of `anchor`.
///
/// Every byte outside the insertion point is preserved. If `content` already appears
/// anywhere after the first occurrence, nothing is inserted, so repeating any injection at a
/// shared anchor is a no-op.
pub fn insert_after_anchor(document: &str, anchor: &str, content: &str) -> Insertion {
    if anchor.is_empty() {
        return Insertion::AnchorMissing;
    }
    let Some(start) = document.find(anchor) else {
        return Insertion::AnchorMissing;
    };
    let split = start + anchor.len();
    if document[split..].contains(content) {
        return Insertion::AlreadyPresent;
    }

    let mut patched = String::with_capacity(document.len() + content.len());
    patched.push_str(&document[..split]);
    patched.push_str(content);
    patched.push_str(&document[split..]);
    Insertion::Applied(patched)
}
