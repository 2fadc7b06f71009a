use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use csv::{QuoteStyle, WriterBuilder};
use futures::prelude::*;
use log::info;

use super::list::ObjectEntry;
use super::Error;

const HEADER: [&str; 4] = ["original_url", "dataset", "filename", "version"];

/// Consumes the listing stream and writes the fully quoted 4-column CSV,
/// one row per entry plus the header. Entries are pulled one at a time, so
/// the full result set is never held in memory. Returns the number of data
/// rows written.
pub async fn write_manifest<S>(
    entries: S,
    dataset: &str,
    split_key: &str,
    csv_path: &Path,
    overwrite: bool,
) -> Result<u64, Error>
where
    S: Stream<Item = Result<ObjectEntry, Error>>,
{
    let file = open_output(csv_path, overwrite)?;
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(file);
    writer.write_record(&HEADER)?;

    futures::pin_mut!(entries);
    let mut rows = 0u64;
    while let Some(entry) = entries.try_next().await? {
        let filename = derive_filename(&entry.url, split_key);
        writer.write_record(&[entry.url.as_str(), dataset, filename.as_str(), entry.version.as_str()])?;
        rows += 1;
    }
    writer.flush()?;

    info!("wrote {} rows to {}", rows, csv_path.display());
    Ok(rows)
}

/// The part of the URL after the last `<split_key>/`, with every path
/// separator doubled. Separators already doubled in the key are not
/// escaped further; the encoding is lossy on such names.
fn derive_filename(url: &str, split_key: &str) -> String {
    let separator = format!("{}/", split_key);
    url.rsplit(separator.as_str())
        .next()
        .unwrap_or(url)
        .replace("/", "//")
}

/// Exclusive-create by default; a pre-existing file is only replaced when
/// overwrite was requested.
fn open_output(path: &Path, overwrite: bool) -> Result<File, Error> {
    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    options.open(path).map_err(|e| {
        if e.kind() == io::ErrorKind::AlreadyExists {
            Error::OutputExists(path.to_path_buf())
        } else {
            Error::Io(e)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use futures::stream;
    use tempfile::tempdir;

    fn entry(url: &str, version: &str) -> Result<ObjectEntry, Error> {
        Ok(ObjectEntry {
            url: url.to_string(),
            version: version.to_string(),
        })
    }

    #[test]
    fn filename_drops_prefix_and_doubles_separators() {
        assert_eq!(
            derive_filename("s3://bucket/prefix/sub/file.txt", "prefix"),
            "sub//file.txt"
        );
        assert_eq!(derive_filename("s3://bucket/prefix/file.txt", "prefix"), "file.txt");
        // empty split key degrades to the basename
        assert_eq!(derive_filename("s3://bucket/file.txt", ""), "file.txt");
    }

    #[tokio::test]
    async fn writes_header_and_quoted_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("manifest.csv");
        let entries = stream::iter(vec![
            entry("s3://bucket/data/sub/a.txt", "etag-a"),
            entry("s3://bucket/data/b.txt", "etag-b"),
        ]);

        let rows = write_manifest(entries, "data", "data", &path, false)
            .await
            .unwrap();
        assert_eq!(rows, 2);

        let written = fs::read_to_string(&path).unwrap();
        let mut lines = written.lines();
        assert_eq!(
            lines.next(),
            Some(r#""original_url","dataset","filename","version""#)
        );
        assert_eq!(
            lines.next(),
            Some(r#""s3://bucket/data/sub/a.txt","data","sub//a.txt","etag-a""#)
        );
        assert_eq!(
            lines.next(),
            Some(r#""s3://bucket/data/b.txt","data","b.txt","etag-b""#)
        );
        assert_eq!(lines.next(), None);
    }

    #[tokio::test]
    async fn empty_stream_leaves_header_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("manifest.csv");
        let entries = stream::iter(Vec::<Result<ObjectEntry, Error>>::new());

        let rows = write_manifest(entries, "data", "data", &path, false)
            .await
            .unwrap();
        assert_eq!(rows, 0);

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "\"original_url\",\"dataset\",\"filename\",\"version\"\n");
    }

    #[tokio::test]
    async fn existing_output_conflicts_unless_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("manifest.csv");
        fs::write(&path, "stale").unwrap();

        let entries = stream::iter(Vec::<Result<ObjectEntry, Error>>::new());
        match write_manifest(entries, "data", "data", &path, false).await {
            Err(Error::OutputExists(p)) => assert_eq!(p, path),
            other => panic!("expected OutputExists, got {:?}", other),
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), "stale");

        let entries = stream::iter(vec![entry("s3://bucket/data/a.txt", "etag-a")]);
        write_manifest(entries, "data", "data", &path, true)
            .await
            .unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with(r#""original_url""#));
        assert!(written.contains("etag-a"));
    }
}
