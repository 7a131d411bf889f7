// Copyright 2022 Lucas Javaudin
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// https://creativecommons.org/licenses/by-nc-nd/4.0/legalcode

//! Imports / exports through JSON files.
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::parameters::Parameters;

/// Extension of zstd-compressed files.
const ZSTD_EXTENSION: &str = "zst";

/// Deserializes the parameters of an analysis from a JSON file.
pub fn get_parameters_from_json(path: &Path) -> Result<Parameters> {
    read_json(path).context("Failed to read parameters")
}

/// Reads some deserializable data from an uncompressed or a zstd-compressed JSON file.
///
/// The file is decompressed if its extension is `.zst`.
pub fn read_json<D: DeserializeOwned>(filename: &Path) -> Result<D> {
    let mut bytes = Vec::new();
    File::open(filename)
        .with_context(|| format!("Unable to open file `{filename:?}`"))?
        .read_to_end(&mut bytes)
        .with_context(|| format!("Unable to read file `{filename:?}`"))?;
    let decoded_bytes = if filename.extension().and_then(|s| s.to_str()) == Some(ZSTD_EXTENSION) {
        zstd::decode_all(bytes.as_slice())
            .with_context(|| format!("Unable to decode zstd-compressed file `{filename:?}`"))?
    } else {
        bytes
    };
    serde_json::from_slice(&decoded_bytes)
        .with_context(|| format!("Unable to parse file `{filename:?}`"))
}

/// Writes some serializable data as a pretty-printed JSON file.
///
/// The file is stored in the given directory, with filename "{name}.json". Returns the path of
/// the file.
pub fn write_json<D: Serialize>(data: &D, output_dir: &Path, name: &str) -> Result<PathBuf> {
    let filename = output_dir.join(format!("{name}.json"));
    let file = File::create(&filename)
        .with_context(|| format!("Unable to create file `{filename:?}`"))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .with_context(|| format!("Unable to serialize data to `{filename:?}`"))?;
    writer
        .flush()
        .with_context(|| format!("Unable to write file `{filename:?}`"))?;
    Ok(filename)
}

/// Writes some serializable data as a zstd-compressed JSON file.
///
/// The file is stored in the given directory, with filename "{name}.json.zst". Returns the path
/// of the file.
pub fn write_compressed_json<D: Serialize>(
    data: &D,
    output_dir: &Path,
    name: &str,
) -> Result<PathBuf> {
    let filename = output_dir.join(format!("{name}.json.{ZSTD_EXTENSION}"));
    let buffer = serde_json::to_vec(data)
        .with_context(|| format!("Unable to serialize data to `{filename:?}`"))?;
    let encoded_buffer = zstd::encode_all(buffer.as_slice(), 0)
        .with_context(|| format!("Unable to compress data for `{filename:?}`"))?;
    File::create(&filename)
        .with_context(|| format!("Unable to create file `{filename:?}`"))?
        .write_all(&encoded_buffer)
        .with_context(|| format!("Unable to write file `{filename:?}`"))?;
    Ok(filename)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("congestion_core_json_{name}"));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn json_test() {
        let dir = temp_dir("plain");
        let data: BTreeMap<String, f64> = [("a".to_owned(), 1.5), ("b".to_owned(), 2.0)].into();
        let path = write_json(&data, &dir, "data").unwrap();
        assert_eq!(path.file_name().unwrap(), "data.json");
        let read: BTreeMap<String, f64> = read_json(&path).unwrap();
        assert_eq!(read, data);
    }

    #[test]
    fn compressed_json_test() {
        let dir = temp_dir("zstd");
        let data = vec![1u32, 2, 3];
        let path = write_compressed_json(&data, &dir, "data").unwrap();
        assert_eq!(path.file_name().unwrap(), "data.json.zst");
        let read: Vec<u32> = read_json(&path).unwrap();
        assert_eq!(read, data);
    }

    #[test]
    fn missing_file_test() {
        let err = read_json::<Vec<u32>>(Path::new("this/file/does/not/exist.json")).unwrap_err();
        assert!(err.to_string().contains("Unable to open file"));
    }
}
