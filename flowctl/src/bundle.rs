//! Outer bundle archives: one zip aggregating the per-product export
//! archives, entries named `"{product}-{originalFilename}"`. Entry bytes
//! are the products' own archives and stay opaque here.

use std::{fs, io::Read, io::Write, path::Path};

use anyhow::{Context, Result, bail};
use bytes::Bytes;
use flowgate::prelude::{BUNDLE_PRODUCTS, Product, ProductArchive};
use zip::ZipArchive;

/// An import bundle may hold at most one entry per bundle product.
pub const BUNDLE_ENTRY_LIMIT: usize = 3;

/// Default bundle filename in the working directory, when the user gives
/// no path.
pub fn default_bundle_name() -> String {
    format!(
        "flowgate-export-{}.zip",
        chrono::Local::now().format("%Y-%m-%dT%H-%M-%S")
    )
}

/// Writes the outer bundle zip. This is the one fatal step of an export:
/// everything else tolerates per-product failure, but an unwritable
/// destination fails the command.
pub fn write_bundle(path: &Path, entries: &[(String, Bytes)]) -> Result<()> {
    let file = fs::File::create(path)
        .with_context(|| format!("could not create bundle file {}", path.display()))?;
    let mut writer = zip::ZipWriter::new(file);
    for (name, bytes) in entries {
        writer.start_file(name.as_str(), zip::write::SimpleFileOptions::default())?;
        writer.write_all(bytes)?;
    }
    writer.finish()?;
    Ok(())
}

/// Opens a bundle and unpacks its entries, mapping each to its owning
/// product. Structural problems (missing file, not a zip, too many entries,
/// an entry not addressed to a known bundle product) are hard errors
/// reported before any import call.
pub fn read_bundle(path: &Path) -> Result<Vec<ProductArchive>> {
    let file = fs::File::open(path)
        .with_context(|| format!("could not open bundle file {}", path.display()))?;
    let mut zip = ZipArchive::new(file)
        .with_context(|| format!("{} is not a zip archive", path.display()))?;

    if zip.len() > BUNDLE_ENTRY_LIMIT {
        bail!("The sent file should only contain the Core, Ingestion, or QueryFlow export files.");
    }

    let mut archives = Vec::new();
    for idx in 0..zip.len() {
        let mut entry = zip.by_index(idx)?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        let product = product_for_entry(&name)?;
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes)?;
        archives.push(ProductArchive {
            product,
            name,
            bytes: bytes.into(),
        });
    }
    Ok(archives)
}

/// Determines the owning product from the entry name's leading component.
fn product_for_entry(name: &str) -> Result<Product> {
    name.split('-')
        .next()
        .and_then(|prefix| prefix.parse::<Product>().ok())
        .filter(|product| BUNDLE_PRODUCTS.contains(product))
        .with_context(|| format!("bundle entry {name:?} does not belong to a known product"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_test_bundle(path: &Path, entries: &[(&str, &[u8])]) {
        let file = fs::File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        for (name, bytes) in entries {
            writer
                .start_file(*name, zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(bytes).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn bundle_round_trip() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("bundle.zip");
        let entries = vec![
            ("core-export.zip".to_string(), Bytes::from_static(b"aa")),
            ("queryflow-export.zip".to_string(), Bytes::from_static(b"bb")),
        ];
        write_bundle(&path, &entries).unwrap();

        let archives = read_bundle(&path).unwrap();
        assert_eq!(archives.len(), 2);
        assert_eq!(archives[0].product, Product::Core);
        assert_eq!(archives[0].name, "core-export.zip");
        assert_eq!(archives[0].bytes, Bytes::from_static(b"aa"));
        assert_eq!(archives[1].product, Product::QueryFlow);
    }

    #[test]
    fn four_entries_are_rejected_before_any_dispatch() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("bundle.zip");
        write_test_bundle(
            &path,
            &[
                ("core-a.zip", b"a"),
                ("ingestion-b.zip", b"b"),
                ("queryflow-c.zip", b"c"),
                ("core-d.zip", b"d"),
            ],
        );
        let err = read_bundle(&path).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The sent file should only contain the Core, Ingestion, or QueryFlow export files."
        );
    }

    #[test]
    fn unknown_product_prefix_is_a_hard_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("bundle.zip");
        write_test_bundle(&path, &[("metrics-a.zip", b"a")]);
        let err = read_bundle(&path).unwrap_err();
        assert!(err.to_string().contains("does not belong to a known product"));
    }

    #[test]
    fn staging_entries_are_not_accepted() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("bundle.zip");
        write_test_bundle(&path, &[("staging-a.zip", b"a")]);
        assert!(read_bundle(&path).is_err());
    }

    #[test]
    fn missing_file_and_non_zip_are_distinct_errors() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("nope.zip");
        let err = read_bundle(&missing).unwrap_err();
        assert!(err.to_string().contains("could not open bundle file"));

        let not_zip = temp.path().join("plain.txt");
        fs::write(&not_zip, b"plain text").unwrap();
        let err = read_bundle(&not_zip).unwrap_err();
        assert!(err.to_string().contains("is not a zip archive"));
    }

    #[test]
    fn default_name_carries_the_flowgate_prefix() {
        let name = default_bundle_name();
        assert!(name.starts_with("flowgate-export-"));
        assert!(name.ends_with(".zip"));
    }
}
