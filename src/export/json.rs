//! JSON file export.

use std::fs;
use std::path::Path;

use crate::error::PeopleResult;
use crate::record::ProjectedRecord;

use super::console::to_pretty_json;

/// Write `projection` to `path` as JSON indented by four spaces, replacing any existing file.
pub fn write_json_to_path(
    path: impl AsRef<Path>,
    projection: &[ProjectedRecord],
) -> PeopleResult<()> {
    let text = to_pretty_json(projection)?;
    fs::write(path, text)?;
    Ok(())
}
