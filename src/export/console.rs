//! Console rendering: the projection as JSON indented by four spaces.

use std::io::Write;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::PeopleResult;
use crate::record::ProjectedRecord;

const INDENT: &[u8] = b"    ";

/// Serialize `value` as JSON indented by four spaces.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> PeopleResult<String> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut ser)?;
    // serde_json only ever emits UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write `projection` to `out` as indented JSON followed by a newline.
pub fn write_console<W: Write + ?Sized>(
    out: &mut W,
    projection: &[ProjectedRecord],
) -> PeopleResult<()> {
    let text = to_pretty_json(projection)?;
    writeln!(out, "{text}")?;
    out.flush()?;
    Ok(())
}
