//! Styled text storage and the host contract the list engine works against.
//!
//! Provides a rope-backed styled buffer with selection and typing
//! attributes, plus the [`TextHost`] trait any other host can implement.

mod attrs;
mod buffer;
mod host;

pub use attrs::{AttributeRuns, AttributeSet, Color, FontWeight, Run};
pub use buffer::StyledBuffer;
pub use host::{ObserverId, Selection, StyledText, TextHost, grouped};
