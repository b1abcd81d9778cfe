//! Text/tail view of the source document.
//!
//! Elements have:
//! - **text**: text before the first child element;
//! - **tail**: text after the element's closing tag, up to the next sibling.
//!
//! ```html
//! <div>
//!   TEXT HERE          <!-- div's text -->
//!   <span>inner</span>
//!   TAIL HERE          <!-- span's tail -->
//! </div>
//! ```
//!
//! Text nodes are siblings of elements in the source tree, so removing an
//! element with `Selection::remove` leaves its tail in place: it becomes the
//! tail of the previous element or the text of the parent.

pub use html_cleaning::tree::{iter_text, tail, text};
