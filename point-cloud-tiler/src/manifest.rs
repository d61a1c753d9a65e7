//! 3D Tiles tileset manifest model.
//!
//! The document is kept as parsed JSON so a rewrite changes nothing but the
//! replaced URIs: key order, unknown fields and odd entries all survive.
//! Only `root`, `content`, `contents`, `children` and `uri` are interpreted, and
//! any of them with an unexpected shape is skipped rather than rejected.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Tileset manifest document: `{ "root": <node>, ... }`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct Tileset {
    document: Value,
}

/// Failure to load or store a manifest file.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid tileset json: {0}")]
    Json(#[from] serde_json::Error),
}

impl Tileset {
    /// Loads a manifest. Invalid UTF-8 sequences are replaced rather than rejected.
    pub fn from_path(path: &Path) -> Result<Self, ManifestError> {
        let bytes = fs::read(path)?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(serde_json::from_str(&text)?)
    }

    /// Overwrites `path` with compact single-line JSON, the engine's own output style.
    pub fn write_compact(&self, path: &Path) -> Result<(), ManifestError> {
        let json = serde_json::to_vec(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Offers every string reference URI of the tree to `rewrite`.
    /// A returned value replaces the URI. Returns the number of replacements.
    pub fn rewrite_uris<F>(&mut self, mut rewrite: F) -> usize
    where
        F: FnMut(&str) -> Option<String>,
    {
        match self.document.get_mut("root") {
            Some(root) => rewrite_node(root, &mut rewrite),
            None => 0,
        }
    }

    /// All string reference URIs in depth-first order.
    pub fn uris(&self) -> Vec<&str> {
        let mut uris = Vec::new();
        if let Some(root) = self.document.get("root") {
            collect_uris(root, &mut uris);
        }
        uris
    }
}

/// `content` first, then the 3D Tiles 1.1 `contents` list.
fn references(node: &Value) -> impl Iterator<Item = &Value> {
    let contents: &[Value] = match node.get("contents") {
        Some(Value::Array(contents)) => contents.as_slice(),
        _ => &[],
    };
    node.get("content").into_iter().chain(contents)
}

fn children(node: &Value) -> &[Value] {
    match node.get("children") {
        Some(Value::Array(children)) => children,
        _ => &[],
    }
}

fn rewrite_node<F>(node: &mut Value, rewrite: &mut F) -> usize
where
    F: FnMut(&str) -> Option<String>,
{
    let Some(node) = node.as_object_mut() else {
        return 0;
    };

    let mut count = 0;
    if let Some(content) = node.get_mut("content") {
        count += rewrite_reference(content, rewrite);
    }
    if let Some(Value::Array(contents)) = node.get_mut("contents") {
        for content in contents {
            count += rewrite_reference(content, rewrite);
        }
    }
    if let Some(Value::Array(children)) = node.get_mut("children") {
        for child in children {
            count += rewrite_node(child, rewrite);
        }
    }
    count
}

fn rewrite_reference<F>(reference: &mut Value, rewrite: &mut F) -> usize
where
    F: FnMut(&str) -> Option<String>,
{
    let Some(uri) = reference.get_mut("uri") else {
        return 0;
    };
    match uri.as_str().and_then(|current| rewrite(current)) {
        Some(new_uri) => {
            *uri = Value::String(new_uri);
            1
        }
        None => 0,
    }
}

fn collect_uris<'a>(node: &'a Value, uris: &mut Vec<&'a str>) {
    uris.extend(
        references(node).filter_map(|reference| reference.get("uri").and_then(Value::as_str)),
    );
    for child in children(node) {
        collect_uris(child, uris);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn sample() -> Tileset {
        serde_json::from_value(json!({
            "asset": {"version": "1.0"},
            "geometricError": 500.0,
            "root": {
                "boundingVolume": {"box": [0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1]},
                "content": {"uri": "points/r.pnts"},
                "children": [
                    {"content": {"uri": "tileset.1.json", "extras": {"id": 7}}},
                    {
                        "contents": [{"uri": "a.pnts"}, {"group": 1}, {"uri": "b.pnts"}],
                        "children": [{"refine": "ADD", "content": {"uri": "deep.pnts"}}]
                    }
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn walks_content_contents_and_children() {
        assert_eq!(
            sample().uris(),
            ["points/r.pnts", "tileset.1.json", "a.pnts", "b.pnts", "deep.pnts"]
        );
    }

    #[test]
    fn rewrite_counts_replacements() {
        let mut tileset = sample();
        let count = tileset.rewrite_uris(|uri| uri.ends_with(".pnts").then(|| format!("x/{uri}")));
        assert_eq!(count, 4);
        assert_eq!(
            tileset.uris(),
            ["x/points/r.pnts", "tileset.1.json", "x/a.pnts", "x/b.pnts", "x/deep.pnts"]
        );
    }

    #[test]
    fn unknown_fields_survive_a_round_trip() {
        let original = json!({
            "asset": {"version": "1.0", "generator": "engine"},
            "root": {
                "transform": [1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1],
                "content": {"uri": "tileset.1.json", "boundingVolume": {"sphere": [0, 0, 0, 1]}},
                "children": [{"geometricError": 1.5, "contents": [{"group": 2}]}]
            },
            "extensionsUsed": ["3DTILES_content_gltf"]
        });
        let tileset: Tileset = serde_json::from_value(original.clone()).unwrap();
        assert_eq!(serde_json::to_value(&tileset).unwrap(), original);
    }

    #[test]
    fn key_order_is_preserved() {
        let text = r#"{"asset":{"version":"1.0"},"root":{"boundingVolume":{"sphere":[0,0,0,1]},"content":{"uri":"a.pnts","extras":{}},"children":[]},"geometricError":1.0}"#;
        let mut tileset: Tileset = serde_json::from_str(text).unwrap();
        tileset.rewrite_uris(|_| Some("b.pnts".to_string()));

        assert_eq!(
            serde_json::to_string(&tileset).unwrap(),
            text.replace("a.pnts", "b.pnts")
        );
    }

    #[test]
    fn odd_entries_are_skipped_individually() {
        let original = json!({
            "root": {
                "content": {"uri": 7},
                "contents": [null, "r.pnts", {"uri": ["x"]}, {"uri": "a.pnts"}],
                "children": [
                    null,
                    3,
                    {"content": "tileset.1.json"},
                    {"children": {"not": "a list"}},
                    {"content": {"uri": "b.pnts"}}
                ]
            }
        });
        let mut tileset: Tileset = serde_json::from_value(original.clone()).unwrap();
        assert_eq!(tileset.uris(), ["a.pnts", "b.pnts"]);

        let count = tileset.rewrite_uris(|uri| Some(format!("x/{uri}")));

        let mut expected = original;
        expected["root"]["contents"][3]["uri"] = json!("x/a.pnts");
        expected["root"]["children"][4]["content"]["uri"] = json!("x/b.pnts");
        assert_eq!(count, 2);
        assert_eq!(serde_json::to_value(&tileset).unwrap(), expected);
    }

    #[rstest]
    #[case(json!({"asset": {}}))]
    #[case(json!({"root": null}))]
    #[case(json!({"root": [1, 2]}))]
    #[case(json!(["not", "a", "tileset"]))]
    fn documents_without_a_root_node_have_no_uris(#[case] document: Value) {
        let mut tileset: Tileset = serde_json::from_value(document).unwrap();
        assert!(tileset.uris().is_empty());
        assert_eq!(tileset.rewrite_uris(|_| Some(String::new())), 0);
    }

    #[test]
    fn compact_output_has_no_whitespace() {
        let dir = assert_fs::TempDir::new().unwrap();
        let path = dir.path().join("tileset.json");
        sample().write_compact(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains('\n'));
        assert!(!written.contains(": "));
        assert_eq!(Tileset::from_path(&path).unwrap(), sample());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let dir = assert_fs::TempDir::new().unwrap();
        let path = dir.path().join("tileset.json");
        std::fs::write(&path, "{\"root\": ").unwrap();
        assert!(matches!(Tileset::from_path(&path), Err(ManifestError::Json(_))));
        assert!(matches!(
            Tileset::from_path(&dir.path().join("missing.json")),
            Err(ManifestError::Io(_))
        ));
    }
}
