//! Attributes for text the engine inserts on its own (markers).

use crate::editor::{AttributeSet, TextHost};

/// The attributes newly inserted text at `offset` should carry.
///
/// Empty buffer: the typing attributes. At or past the end: the typing
/// attributes unless they are empty, then the last character's. Anywhere
/// else: the attributes of the character at `offset`.
pub fn attributes_for_insertion<H: TextHost + ?Sized>(host: &H, offset: usize) -> AttributeSet {
    let len = host.len_chars();
    if len == 0 {
        return host.typing_attributes();
    }
    if offset >= len {
        let typing = host.typing_attributes();
        return if typing.is_empty() {
            host.attributes_at(len - 1)
        } else {
            typing
        };
    }
    host.attributes_at(offset.min(len - 1))
}
