use std::{
    fs::{self, File},
    io::Write,
    path::Path,
};

use zip::{ZipWriter, write::FileOptions};

/// Write `files` (relative path, content) under `root`, creating parents.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (rel, body) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, body).expect("write fixture file");
    }
}

/// Write a zip at `path`. A `None` body adds a directory marker for the name.
pub fn write_zip(path: &Path, entries: &[(&str, Option<&str>)]) {
    let file = File::create(path).expect("create zip file");
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default();

    for (name, body) in entries {
        match body {
            Some(body) => {
                zip.start_file(*name, options).expect("start zip entry");
                zip.write_all(body.as_bytes()).expect("write zip entry");
            }
            None => {
                zip.add_directory(*name, options).expect("add zip directory");
            }
        }
    }

    zip.finish().expect("finish zip");
}
