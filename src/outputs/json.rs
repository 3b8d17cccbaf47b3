//! JSON export.
//!
//! Output is a compact array with one object per record, keys in column
//! order:
//!
//! ```json
//! [{"title":"A","url":"http://x","date":"1 Jan 2024","content":"Body."}]
//! ```

use super::ExportError;
use crate::models::ArticleRecord;

pub fn to_json(records: &[ArticleRecord]) -> Result<Vec<u8>, ExportError> {
    Ok(serde_json::to_vec(records)?)
}
