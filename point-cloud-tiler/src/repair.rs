//! Post-processing of the engine's tileset manifests.
//!
//! The engine stores auxiliary `tileset.<N>.json` files and all payloads under
//! `points/`, but does not always write URIs relative to the file that holds them.
//! Two passes fix this in place:
//!
//! * root pass: bare `tileset.<N>.json` references in `tileset.json` gain the
//!   `points/` prefix when the target exists there;
//! * auxiliary pass: `points/...` references inside `points/tileset.<N>.json`
//!   lose the prefix when the stripped target exists, since they would otherwise
//!   resolve to `points/points/...`.
//!
//! Both passes are idempotent and never fail: problems end up in the
//! diagnostics of the returned report and the affected file is left as it was.
use crate::manifest::Tileset;
use constants::layout::{
    MANIFEST_EXTENSION, MANIFEST_STEM, POINTS_DIR, POINTS_PREFIX, ROOT_MANIFEST,
};
use log::{debug, info};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Outcome of the root manifest pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RootRepair {
    /// The root manifest was rewritten.
    pub modified: bool,
    /// Why something could not be checked or written.
    pub diagnostics: Vec<String>,
}

/// Outcome of the auxiliary manifest pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AuxiliaryRepair {
    /// Number of auxiliary manifests rewritten.
    pub modified_files: usize,
    pub diagnostics: Vec<String>,
}

/// Combined outcome of both passes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RepairReport {
    pub root: RootRepair,
    pub auxiliary: AuxiliaryRepair,
}

/// Runs the root pass, then the auxiliary pass, and logs what changed.
pub fn repair_output(output_dir: &Path) -> RepairReport {
    let report = RepairReport {
        root: repair_root_manifest(output_dir),
        auxiliary: repair_auxiliary_manifests(output_dir),
    };

    for diagnostic in report
        .root
        .diagnostics
        .iter()
        .chain(&report.auxiliary.diagnostics)
    {
        debug!("Manifest repair: {diagnostic}");
    }
    if report.root.modified {
        info!("Prefixed child tileset URIs in {ROOT_MANIFEST} with {POINTS_PREFIX}");
    }
    if report.auxiliary.modified_files > 0 {
        info!(
            "Normalized URIs in {} sub-tileset(s) under {POINTS_DIR}/",
            report.auxiliary.modified_files
        );
    }
    report
}

/// Rewrites bare `tileset.<N>.json` references in the root manifest to `points/tileset.<N>.json`
/// when that file exists. Other URIs are never touched.
pub fn repair_root_manifest(output_dir: &Path) -> RootRepair {
    let mut report = RootRepair::default();
    let manifest_path = output_dir.join(ROOT_MANIFEST);
    let points_dir = output_dir.join(POINTS_DIR);

    if !manifest_path.is_file() || !points_dir.is_dir() {
        return report;
    }

    let mut tileset = match Tileset::from_path(&manifest_path) {
        Ok(tileset) => tileset,
        Err(e) => {
            report
                .diagnostics
                .push(format!("skipped {}: {e}", manifest_path.display()));
            return report;
        }
    };

    let diagnostics = &mut report.diagnostics;
    let rewrites = tileset.rewrite_uris(|uri| {
        if !is_bare_manifest_name(uri) {
            return None;
        }
        is_existing_file(&points_dir.join(uri), diagnostics)
            .then(|| format!("{POINTS_PREFIX}{uri}"))
    });

    if rewrites > 0 {
        match tileset.write_compact(&manifest_path) {
            Ok(()) => report.modified = true,
            Err(e) => report
                .diagnostics
                .push(format!("could not write {}: {e}", manifest_path.display())),
        }
    }
    report
}

/// Strips the redundant `points/` prefix from references inside every
/// `points/tileset.<N>.json` when the stripped target exists in `points/`.
pub fn repair_auxiliary_manifests(output_dir: &Path) -> AuxiliaryRepair {
    let mut report = AuxiliaryRepair::default();
    let points_dir = output_dir.join(POINTS_DIR);

    if !points_dir.is_dir() {
        return report;
    }

    let entries = match fs::read_dir(&points_dir) {
        Ok(entries) => entries,
        Err(e) => {
            report
                .diagnostics
                .push(format!("could not list {}: {e}", points_dir.display()));
            return report;
        }
    };

    let mut manifests: Vec<_> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(is_auxiliary_manifest_name)
                && path.is_file()
        })
        .collect();
    manifests.sort();

    for manifest_path in manifests {
        let mut tileset = match Tileset::from_path(&manifest_path) {
            Ok(tileset) => tileset,
            Err(e) => {
                report
                    .diagnostics
                    .push(format!("skipped {}: {e}", manifest_path.display()));
                continue;
            }
        };

        let diagnostics = &mut report.diagnostics;
        let rewrites = tileset.rewrite_uris(|uri| {
            let stripped = uri.strip_prefix(POINTS_PREFIX)?;
            is_existing_file(&points_dir.join(stripped), diagnostics)
                .then(|| stripped.to_string())
        });

        if rewrites == 0 {
            continue;
        }
        match tileset.write_compact(&manifest_path) {
            Ok(()) => report.modified_files += 1,
            Err(e) => report
                .diagnostics
                .push(format!("could not write {}: {e}", manifest_path.display())),
        }
    }
    report
}

/// Starts with `tileset.`, ends with `.json`, has no directory component.
pub fn is_bare_manifest_name(uri: &str) -> bool {
    uri.starts_with(MANIFEST_STEM)
        && uri.ends_with(MANIFEST_EXTENSION)
        && !uri.contains(['/', '\\'])
}

/// Exactly `tileset.<N>.json` with `N` made of ASCII digits.
pub fn is_auxiliary_manifest_name(name: &str) -> bool {
    name.strip_prefix(MANIFEST_STEM)
        .and_then(|rest| rest.strip_suffix(MANIFEST_EXTENSION))
        .is_some_and(|index| !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()))
}

/// Existence check that records anything other than "not found" as a diagnostic.
fn is_existing_file(path: &Path, diagnostics: &mut Vec<String>) -> bool {
    match fs::metadata(path) {
        Ok(meta) => meta.is_file(),
        Err(e) if e.kind() == ErrorKind::NotFound => false,
        Err(e) => {
            diagnostics.push(format!("could not check {}: {e}", path.display()));
            false
        }
    }
}
