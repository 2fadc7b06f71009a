use regex::Regex;

use super::Error;

/// Bucket and key prefix parsed out of an `s3://bucket/prefix` URI.
#[derive(Debug, Clone, PartialEq)]
pub struct S3Locator {
    pub bucket: String,
    pub prefix: String,
}

impl S3Locator {
    /// Splits a `(s3://)?<bucket>/<key>` string into bucket and key prefix.
    /// The key part may be empty; a URI with no `/` after the optional
    /// scheme is rejected because the bucket boundary is ambiguous.
    pub fn parse(uri: &str) -> Result<S3Locator, Error> {
        let pattern =
            Regex::new(r"^(s3://)?(?P<bucket>[^/]*)/(?P<key>.*)").expect("invalid uri pattern");
        let captures = pattern
            .captures(uri)
            .ok_or_else(|| Error::InvalidUri(uri.to_string()))?;
        Ok(S3Locator {
            bucket: captures["bucket"].to_string(),
            prefix: captures["key"].to_string(),
        })
    }
}
