//! Encodings used by the remote wire format.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`flex`] | Integers that arrive as numbers, numeric strings or `""` |
//! | [`yes_no`] | The two-character `"y"` / `"n"` boolean encoding |

pub mod flex;
pub mod yes_no;
