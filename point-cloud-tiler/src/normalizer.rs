//! Input normalisation: hands the engine an uncompressed LAS file whenever possible.
use crate::error::{Result, TilerError};
use crate::laz::{PointCloudFormat, create_reader};
use crate::progress::points_bar;
use las::Writer;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Returns a path the tiling engine reads reliably.
/// LAS input passes through untouched, LAZ input is decompressed to a sibling `.las`.
pub fn ensure_engine_input(input_path: &Path) -> Result<PathBuf> {
    match PointCloudFormat::from_path(input_path)? {
        PointCloudFormat::Las => Ok(input_path.to_path_buf()),
        PointCloudFormat::Laz => uncompress_laz_to_las(input_path),
    }
}

/// Decompresses a LAZ file into a sibling LAS file and returns its path.
/// An existing sibling that is at least as new as the source is reused as is.
pub fn uncompress_laz_to_las(laz_path: &Path) -> Result<PathBuf> {
    let las_path = laz_path.with_extension("las");

    if is_fresh(laz_path, &las_path) {
        debug!(
            "Reusing up-to-date {} for {}",
            las_path.display(),
            laz_path.display()
        );
        return Ok(las_path);
    }

    info!(
        "Uncompressing {} -> {}",
        laz_path.display(),
        las_path.display()
    );
    decode_into(laz_path, &las_path).map_err(|source| TilerError::Decompression {
        path: laz_path.to_path_buf(),
        source,
    })?;

    Ok(las_path)
}

/// True when `target` exists and its modification time is not older than `source`.
/// Missing files or unreadable timestamps count as stale.
pub fn is_fresh(source: &Path, target: &Path) -> bool {
    let modified = |path: &Path| fs::metadata(path).and_then(|meta| meta.modified());

    match (modified(source), modified(target)) {
        (Ok(source_time), Ok(target_time)) => target_time >= source_time,
        _ => false,
    }
}

/// Streams points from the LAZ reader straight into an uncompressed writer.
/// The header point count only drives the progress bar: it may be wrong.
fn decode_into(laz_path: &Path, las_path: &Path) -> las::Result<()> {
    let mut reader = create_reader(laz_path)?;
    let header = reader.header().clone();
    let total_points = header.number_of_points();

    // The writer picks the point format compression from the target extension.
    let written = (|| {
        let mut writer = Writer::from_path(las_path, header)?;
        let pb = points_bar(total_points, "Decoding points");
        for (idx, point_result) in reader.points().enumerate() {
            writer.write_point(point_result?)?;

            if idx % 50_000 == 0 {
                pb.set_position(idx as u64);
            }
        }
        pb.finish_with_message("Points decoded");
        writer.close()
    })();

    if written.is_err() {
        // Never leave a partial file behind: it would look fresh on the next run.
        if let Err(e) = fs::remove_file(las_path) {
            debug!("Could not remove partial {}: {e}", las_path.display());
        }
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use las::{Builder, Point};
    use std::fs::File;
    use std::time::{Duration, SystemTime};

    fn set_mtime(path: &Path, time: SystemTime) {
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(time)
            .unwrap();
    }

    #[test]
    fn las_input_is_returned_unchanged() {
        let path = Path::new("/data/cloud.las");
        assert_eq!(ensure_engine_input(path).unwrap(), path);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = ensure_engine_input(Path::new("/data/cloud.xyz")).unwrap_err();
        assert!(matches!(err, TilerError::InputFormat { .. }));
    }

    #[test]
    fn fresh_sibling_is_reused_without_decoding() {
        let temp = TempDir::new().unwrap();
        // Not a valid LAZ file: reaching the decoder would fail.
        let laz = temp.child("cloud.laz");
        laz.write_str("not really laz").unwrap();
        let las = temp.child("cloud.las");
        las.write_str("cached").unwrap();

        let now = SystemTime::now();
        set_mtime(laz.path(), now - Duration::from_secs(60));
        set_mtime(las.path(), now);

        let out = ensure_engine_input(laz.path()).unwrap();
        assert_eq!(out, las.path());
        las.assert("cached");
    }

    #[test]
    fn stale_sibling_triggers_decoding() {
        let temp = TempDir::new().unwrap();
        let laz = temp.child("cloud.laz");
        laz.write_str("not really laz").unwrap();
        let las = temp.child("cloud.las");
        las.write_str("stale").unwrap();

        let now = SystemTime::now();
        set_mtime(las.path(), now - Duration::from_secs(60));
        set_mtime(laz.path(), now);

        let err = uncompress_laz_to_las(laz.path()).unwrap_err();
        assert!(matches!(err, TilerError::Decompression { .. }));
    }

    #[test]
    fn inflated_point_count_does_not_abort_decoding() {
        let temp = TempDir::new().unwrap();
        let laz = temp.child("cloud.laz");
        let mut writer =
            Writer::from_path(laz.path(), Builder::from((1, 2)).into_header().unwrap()).unwrap();
        for i in 0..3 {
            writer
                .write_point(Point {
                    x: f64::from(i),
                    ..Default::default()
                })
                .unwrap();
        }
        writer.close().unwrap();
        drop(writer);

        // Legacy point record count of a LAS 1.2 header.
        let mut bytes = fs::read(laz.path()).unwrap();
        bytes[107..111].copy_from_slice(&u32::MAX.to_le_bytes());
        fs::write(laz.path(), bytes).unwrap();

        match uncompress_laz_to_las(laz.path()) {
            Err(TilerError::Decompression { path, .. }) => {
                assert_eq!(path, laz.path());
                temp.child("cloud.las").assert(predicates::path::missing());
            }
            Ok(las) => {
                let mut reader = las::Reader::from_path(&las).unwrap();
                assert_eq!(reader.points().count(), 3);
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn freshness_requires_both_files() {
        let temp = TempDir::new().unwrap();
        let source = temp.child("a.laz");
        source.touch().unwrap();

        assert!(!is_fresh(source.path(), &temp.path().join("a.las")));
        assert!(!is_fresh(&temp.path().join("missing.laz"), source.path()));
    }

    #[test]
    fn equal_timestamps_count_as_fresh() {
        let temp = TempDir::new().unwrap();
        let source = temp.child("a.laz");
        source.touch().unwrap();
        let target = temp.child("a.las");
        target.touch().unwrap();

        let time = SystemTime::now() - Duration::from_secs(5);
        set_mtime(source.path(), time);
        set_mtime(target.path(), time);

        assert!(is_fresh(source.path(), target.path()));
    }
}
