// Author: Dustin Pilgrim
// License: MIT

//! Lexical layer shared by both dialects: scalar coercion, bracket/quote
//! balance scanning, top-level splitting and the line preprocessor.

mod lines;
mod scalar;
mod scanner;

pub use lines::{merge_balanced, preprocess, strip_comment, CommentStyle, LogicalLine};
pub use scalar::{coerce, strip_quotes, unescape, unquote};
pub use scanner::{
    column_of, find_top_level, is_balanced, matching_close, scan_balance, split_top_level,
    split_whitespace_top_level, Balance, Brackets,
};

#[cfg(test)]
mod tests;
