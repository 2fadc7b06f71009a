use futures::prelude::*;
use futures::stream;
use log::debug;

use rusoto_core::credential::ChainProvider;
use rusoto_core::request::HttpClient;
use rusoto_core::{Client, Region};
use rusoto_s3::{ListObjectsV2Request, S3Client, S3};

use super::locator::S3Locator;
use super::Error;

const PAGE_SIZE: i64 = 1000;

/// One matched object: its `s3://` URL and the ETag used as a version token.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectEntry {
    pub url: String,
    pub version: String,
}

/// Builds an S3 client for the requested connection mode. Anonymous clients
/// send unsigned requests and only work against public buckets; otherwise
/// the standard chain (environment, profile, instance role) resolves
/// credentials.
pub fn client(region: Region, anon: bool) -> Result<S3Client, Error> {
    let dispatcher = HttpClient::new()?;
    let client = if anon {
        S3Client::new_with_client(Client::new_not_signing(dispatcher), region)
    } else {
        S3Client::new_with(dispatcher, ChainProvider::new(), region)
    };
    Ok(client)
}

enum Cursor {
    Start,
    Next(String),
    Done,
}

/// Lazily lists the keys under the locator's prefix, one page of up to 1000
/// keys per request. A key is kept when it starts with the prefix and ends
/// with `suffix`. The stream ends when a response carries no continuation
/// token; a response with no contents ends it immediately, so an empty
/// prefix match yields an empty stream rather than an error.
pub fn matching_keys(
    s3: S3Client,
    locator: S3Locator,
    suffix: String,
) -> impl Stream<Item = Result<ObjectEntry, Error>> {
    stream::try_unfold(Cursor::Start, move |cursor| {
        let s3 = s3.clone();
        let locator = locator.clone();
        let suffix = suffix.clone();
        async move {
            let continuation_token = match cursor {
                Cursor::Start => None,
                Cursor::Next(token) => Some(token),
                Cursor::Done => return Ok(None),
            };
            let request = ListObjectsV2Request {
                bucket: locator.bucket.clone(),
                prefix: if locator.prefix.is_empty() {
                    None
                } else {
                    Some(locator.prefix.clone())
                },
                max_keys: Some(PAGE_SIZE),
                continuation_token,
                ..Default::default()
            };
            let response = s3.list_objects_v2(request).await?;

            let contents = match response.contents {
                Some(contents) => contents,
                None => return Ok(Some((Vec::new(), Cursor::Done))),
            };
            debug!("listing page carried {} keys", contents.len());

            let entries: Vec<ObjectEntry> = contents
                .into_iter()
                .filter_map(|object| {
                    let key = object.key?;
                    if !(key.starts_with(&locator.prefix) && key.ends_with(&suffix)) {
                        return None;
                    }
                    Some(ObjectEntry {
                        url: format!("s3://{}/{}", locator.bucket, key),
                        version: object
                            .e_tag
                            .unwrap_or_default()
                            .trim_matches('"')
                            .to_string(),
                    })
                })
                .collect();

            let cursor = match response.next_continuation_token {
                Some(token) => Cursor::Next(token),
                None => Cursor::Done,
            };
            Ok::<_, Error>(Some((entries, cursor)))
        }
    })
    .map_ok(|entries| stream::iter(entries.into_iter().map(Ok)))
    .try_flatten()
}
