//! Dump stream grammar for snapdump
//!
//! A dump is line-oriented UTF-8 text:
//!
//! ```text
//! %snapdump 1
//! %table Author
//! 1	"Ada"
//! %table Book
//! 1	"Notes"	1
//! ```
//!
//! - The first line is the format header (`%snapdump <version>`).
//! - `%table <Name>` opens a section; every following row belongs to it.
//! - A row is the record's identifier token followed by one token per field
//!   in declared order, separated by a single TAB.
//!
//! Tokens are canonical: `null`, `true`/`false`, decimal integers, floats
//! with a forced decimal point (specials as bare `NaN`/`+Inf`/`-Inf`),
//! JSON-style quoted strings with every control character escaped (so the
//! TAB separator can never appear raw), `$`-prefixed standard base64 for
//! bytes, `YYYY-MM-DD` dates, and RFC 3339 UTC datetimes. Two dumps of
//! equal database content are byte-identical.
//!
//! Decoding is schema-driven: the caller passes the field descriptor, which
//! selects the token interpretation. Parsing is strict; anything
//! non-canonical is a [`ParseError`].

mod decode;
mod encode;
mod error;

pub use decode::{decode_field, decode_id, decode_scalar, parse_line, Line};
pub use encode::{encode_field, encode_id, encode_row, encode_scalar, encode_string, table_line};
pub use error::{EncodeError, ParseError};

/// Current dump format version.
pub const FORMAT_VERSION: u32 = 1;

/// Marker prefix shared by the header and table lines.
pub const MARKER: char = '%';

/// Token separator within a row.
pub const SEPARATOR: char = '\t';

/// Token for a null field value.
pub const NULL_TOKEN: &str = "null";

/// The header line for the current format version.
pub fn header_line() -> String {
    format!("{}snapdump {}", MARKER, FORMAT_VERSION)
}
