use super::{extract, ArchiveFormat};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_root(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    std::env::temp_dir().join(format!("sfetch-extract-test-{name}-{nanos}"))
}

fn write_tar_gz(path: &std::path::Path, entries: &[(&str, &[u8])]) {
    let file = fs::File::create(path).expect("create archive");
    let enc = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    let mut builder = tar::Builder::new(enc);
    for (name, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, *data).expect("append entry");
    }
    builder.into_inner().expect("finish tar").finish().expect("finish gzip");
}

// Constructs a tar entry with an arbitrary raw name, bypassing the `tar`
// crate's own `set_path` validation (which refuses `..` and absolute paths)
// so we can exercise this extractor's own zip-slip defenses against an
// archive a hostile server could actually produce.
fn write_tar_gz_with_raw_name(path: &std::path::Path, raw_name: &[u8], data: &[u8]) {
    let file = fs::File::create(path).expect("create archive");
    let enc = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    let mut builder = tar::Builder::new(enc);
    let mut header = tar::Header::new_old();
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    header.set_entry_type(tar::EntryType::Regular);
    {
        let old = header.as_old_mut();
        let len = raw_name.len().min(old.name.len());
        old.name[..len].copy_from_slice(&raw_name[..len]);
    }
    header.set_cksum();
    builder.append(&header, data).expect("append raw entry");
    builder.into_inner().expect("finish tar").finish().expect("finish gzip");
}

fn write_tar_gz_symlink(path: &std::path::Path, link_name: &str, target: &str) {
    let file = fs::File::create(path).expect("create archive");
    let enc = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    let mut builder = tar::Builder::new(enc);
    let mut header = tar::Header::new_gnu();
    header.set_entry_type(tar::EntryType::Symlink);
    header.set_size(0);
    header.set_mode(0o777);
    header.set_cksum();
    builder
        .append_link(&mut header, link_name, target)
        .expect("append symlink entry");
    builder.into_inner().expect("finish tar").finish().expect("finish gzip");
}

fn write_zip(path: &std::path::Path, entries: &[(&str, &[u8])]) {
    let file = fs::File::create(path).expect("create archive");
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for (name, data) in entries {
        zip.start_file(*name, options).expect("start zip entry");
        zip.write_all(data).expect("write zip entry");
    }
    zip.finish().expect("finish zip");
}

#[test]
fn extracts_tar_gz_entries_into_the_output_root() {
    let root = temp_root("tar-gz-ok");
    fs::create_dir_all(&root).unwrap();
    let archive = root.join("tool.tar.gz");
    write_tar_gz(&archive, &[("bin/tool", b"#!/bin/sh\necho hi\n")]);

    let out = root.join("out");
    extract(&archive, &out, ArchiveFormat::TarGz).expect("extract");

    assert_eq!(fs::read(out.join("bin/tool")).unwrap(), b"#!/bin/sh\necho hi\n");

    fs::remove_dir_all(root).unwrap();
}

#[test]
fn extracts_zip_entries_into_the_output_root() {
    let root = temp_root("zip-ok");
    fs::create_dir_all(&root).unwrap();
    let archive = root.join("tool.zip");
    write_zip(&archive, &[("tool.exe", b"binary-content")]);

    let out = root.join("out");
    extract(&archive, &out, ArchiveFormat::Zip).expect("extract");

    assert_eq!(fs::read(out.join("tool.exe")).unwrap(), b"binary-content");

    fs::remove_dir_all(root).unwrap();
}

#[test]
fn rejects_tar_entries_that_escape_the_extraction_root() {
    let root = temp_root("tar-slip");
    fs::create_dir_all(&root).unwrap();
    let archive = root.join("evil.tar.gz");
    write_tar_gz_with_raw_name(&archive, b"../evil", b"pwned");

    let out = root.join("out");
    let err = extract(&archive, &out, ArchiveFormat::TarGz).expect_err("must reject ../ entry");
    assert!(err.to_string().contains("escapes"));
    assert!(!root.join("evil").exists());

    fs::remove_dir_all(root).unwrap();
}

#[test]
fn rejects_tar_entries_with_absolute_paths() {
    let root = temp_root("tar-abs");
    fs::create_dir_all(&root).unwrap();
    let archive = root.join("evil.tar.gz");
    write_tar_gz_with_raw_name(&archive, b"/etc/evil", b"pwned");

    let out = root.join("out");
    let err = extract(&archive, &out, ArchiveFormat::TarGz).expect_err("must reject absolute entry");
    assert!(err.to_string().contains("absolute"));

    fs::remove_dir_all(root).unwrap();
}

#[test]
fn rejects_symlink_entries_in_tar_archives() {
    let root = temp_root("tar-symlink");
    fs::create_dir_all(&root).unwrap();
    let archive = root.join("evil.tar.gz");
    write_tar_gz_symlink(&archive, "link", "/etc/passwd");

    let out = root.join("out");
    let err = extract(&archive, &out, ArchiveFormat::TarGz).expect_err("must reject symlink entry");
    assert!(err.to_string().contains("symlink"));

    fs::remove_dir_all(root).unwrap();
}

#[test]
fn rejects_zip_entries_that_escape_the_extraction_root() {
    let root = temp_root("zip-slip");
    fs::create_dir_all(&root).unwrap();
    let archive = root.join("evil.zip");
    write_zip(&archive, &[("../../evil", b"pwned")]);

    let out = root.join("nested").join("out");
    // The zip crate's enclosed_name() refuses to resolve traversal entries,
    // which this extractor treats as the same ExtractionUnsafe failure as
    // an explicit `..` segment.
    let result = extract(&archive, &out, ArchiveFormat::Zip);
    assert!(result.is_err());
    assert!(!root.join("evil").exists());

    fs::remove_dir_all(root).unwrap();
}
