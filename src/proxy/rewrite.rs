//! Query string rewrites applied before signing.
//!
//! DICOMweb callers send `ImageSetID` in upper camel case while the
//! HealthImaging API expects `imageSetId` with a lower-case value.

use url::form_urlencoded;

const CALLER_IMAGE_SET_ID: &str = "ImageSetID";
const UPSTREAM_IMAGE_SET_ID: &str = "imageSetId";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rewrite {
    /// `ImageSetID=V` becomes `imageSetId=lower(V)`.
    ImageSetId,
}

#[must_use]
pub fn apply(rewrite: Rewrite, query: &str) -> String {
    match rewrite {
        Rewrite::ImageSetId => rename_image_set_id(query),
    }
}

/// Rename `ImageSetID` to `imageSetId` and lower-case its value.
///
/// Returns `query` untouched when `ImageSetID` is absent. Otherwise the
/// query is re-serialized: other parameters keep their relative order and
/// `imageSetId` is appended last, replacing any existing one.
#[must_use]
pub fn rename_image_set_id(query: &str) -> String {
    let pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();

    let Some(value) = pairs
        .iter()
        .find(|(k, _)| k == CALLER_IMAGE_SET_ID)
        .map(|(_, v)| v.to_lowercase())
    else {
        return query.to_string();
    };

    let mut out = form_urlencoded::Serializer::new(String::new());
    for (k, v) in pairs
        .iter()
        .filter(|(k, _)| k != CALLER_IMAGE_SET_ID && k != UPSTREAM_IMAGE_SET_ID)
    {
        out.append_pair(k, v);
    }
    out.append_pair(UPSTREAM_IMAGE_SET_ID, &value);
    out.finish()
}
