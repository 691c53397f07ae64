//! Character formatting commands: bold and links.
//!
//! With a caret, these change the typing attributes so the next typed text
//! picks them up. With a range, they rewrite the selected runs in one
//! grouped edit.

use tracing::debug;

use crate::editor::{AttributeSet, TextHost, grouped};

/// Toggle bold on the selection, run by run.
///
/// Each styled run flips on its own, so a selection mixing bold and regular
/// text swaps the two rather than forcing one weight.
pub fn toggle_bold<H: TextHost + ?Sized>(host: &mut H) {
    let selection = host.selection();
    if selection.is_caret() {
        let mut typing = host.typing_attributes();
        typing.toggle_bold();
        host.set_typing_attributes(typing);
        return;
    }
    debug!(start = selection.start, end = selection.end, "toggle bold");
    grouped(host, |host| {
        host.update_attributes(selection.range(), &mut AttributeSet::toggle_bold);
    });
}

/// Attach `url` as the link target of the selection.
///
/// Returns `false` and changes nothing if `url` is blank.
pub fn set_link<H: TextHost + ?Sized>(host: &mut H, url: &str) -> bool {
    let url = url.trim();
    if url.is_empty() {
        return false;
    }
    let selection = host.selection();
    if selection.is_caret() {
        let typing = host.typing_attributes().with_link(url);
        host.set_typing_attributes(typing);
        return true;
    }
    debug!(url, start = selection.start, end = selection.end, "set link");
    grouped(host, |host| {
        host.update_attributes(selection.range(), &mut |attrs| {
            attrs.link = Some(url.to_string());
        });
    });
    true
}

/// Drop any link target from the selection.
pub fn remove_link<H: TextHost + ?Sized>(host: &mut H) {
    let selection = host.selection();
    if selection.is_caret() {
        let mut typing = host.typing_attributes();
        typing.link = None;
        host.set_typing_attributes(typing);
        return;
    }
    grouped(host, |host| {
        host.update_attributes(selection.range(), &mut |attrs| attrs.link = None);
    });
}
