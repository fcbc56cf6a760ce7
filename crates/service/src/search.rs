//! Case-insensitive substring filters for collection queries.

use mongodb::bson::{doc, Document};

/// Escape regex metacharacters so a user-supplied term matches literally.
fn escape(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if r"\.^$|?*+()[]{}".contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Build `{ <field>: { "$regex": <escaped term>, "$options": "i" } }`.
pub(crate) fn icontains(field: &str, term: &str) -> Document {
    let mut filter = Document::new();
    filter.insert(field, doc! { "$regex": escape(term), "$options": "i" });
    filter
}
