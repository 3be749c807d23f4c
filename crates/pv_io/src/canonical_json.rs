//! Canonical JSON: object keys in byte order at every depth, array order
//! untouched, compact output without a trailing newline. Radar, summary and
//! positions output all go through here so identical inputs give identical
//! bytes, and the generation token hashes the same form.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

/// Rebuild `v` with every object's keys inserted in sorted order. The
/// result serializes identically whether or not serde_json keeps insertion
/// order.
pub fn canonicalize(v: Value) -> Value {
    match v {
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::new();
            for (k, val) in entries {
                sorted.insert(k, canonicalize(val));
            }
            Value::Object(sorted)
        }
        scalar => scalar,
    }
}

pub fn to_canonical_json_bytes(v: &Value) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&canonicalize(v.clone()))
}

/// Serialize any value through `Value` into canonical bytes.
pub fn to_canonical_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let v = serde_json::to_value(value)?;
    serde_json::to_vec(&canonicalize(v))
}

/// Write canonical JSON for `value` to `path`, creating parent directories.
/// The bytes land in a sibling temp file first and are renamed over `path`,
/// so readers never see a half-written result.
pub fn write_canonical_file<T: Serialize + ?Sized>(value: &T, path: &Path) -> io::Result<()> {
    let bytes = to_canonical_bytes(value).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = sibling_tmp(path);
    let written = fs::File::create(&tmp).and_then(|mut f| {
        f.write_all(&bytes)?;
        f.sync_all()
    });
    match written.and_then(|()| fs::rename(&tmp, path)) {
        Ok(()) => Ok(()),
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            Err(e)
        }
    }
}

/// "<name>.<pid>.tmp" next to `target`.
fn sibling_tmp(target: &Path) -> PathBuf {
    let name = target.file_name().and_then(|s| s.to_str()).unwrap_or("out");
    target.with_file_name(format!("{name}.{}.tmp", std::process::id()))
}
