//! Code and screenshot uploads, one request per file, each degrading to a
//! local reading of the file when the backend is unavailable.
use std::path::{Path, PathBuf};

use blackbook_core::{CodeFile, FileHandle, Figure};
use blackbook_logging::{bb_info, bb_warn};
use futures_util::future::join_all;

use crate::submission::{UploadField, UploadPart};
use crate::Backend;

/// Language tag for a source file, by extension.
pub fn guess_language(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "py" => "python",
        "js" => "javascript",
        "ts" => "typescript",
        "java" => "java",
        "cpp" => "cpp",
        "c" => "c",
        "cs" => "csharp",
        "php" => "php",
        "html" => "html",
        "css" => "css",
        "sql" => "sql",
        "json" => "json",
        "rs" => "rust",
        _ => "text",
    }
}

/// Upload each code file; files the backend rejects are read locally.
/// Unreadable files are dropped.
pub async fn upload_code_files(backend: &dyn Backend, paths: &[PathBuf]) -> Vec<CodeFile> {
    let results = join_all(paths.iter().map(|path| upload_code_file(backend, path))).await;
    results.into_iter().flatten().collect()
}

async fn upload_code_file(backend: &dyn Backend, path: &Path) -> Option<CodeFile> {
    let part = match UploadPart::from_path(UploadField::CodeFiles, path).await {
        Ok(part) => part,
        Err(err) => {
            bb_warn!("Cannot read code file {:?}: {}", path, err);
            return None;
        }
    };
    let local_name = part.file_name.clone();
    let local_text = String::from_utf8_lossy(&part.bytes).into_owned();

    let remote = match backend.upload_files(vec![part]).await {
        Ok(uploaded) => uploaded.code_files.into_iter().next(),
        Err(err) => {
            bb_warn!("Upload of {} failed, reading locally: {}", local_name, err);
            None
        }
    };

    let mut file = match remote {
        Some(item) => {
            bb_info!("Uploaded {} as {}", local_name, item.filename);
            let name = if item.name.is_empty() { local_name } else { item.name };
            let language = if item.language.is_empty() {
                guess_language(&name).to_string()
            } else {
                item.language
            };
            CodeFile::from_text(name, language, item.content)
        }
        None => {
            let language = guess_language(&local_name);
            CodeFile::from_text(local_name, language, local_text)
        }
    };
    file.file = Some(FileHandle::from_path(path));
    Some(file)
}

/// Upload each screenshot. Figures always preview from the local file;
/// `file_url` is set only when the backend stored the image.
pub async fn upload_screenshots(
    backend: &dyn Backend,
    paths: &[PathBuf],
    upload_url: impl Fn(&str) -> Option<String>,
) -> Vec<Figure> {
    let results = join_all(paths.iter().map(|path| upload_screenshot(backend, path))).await;
    results
        .into_iter()
        .flatten()
        .enumerate()
        .map(|(idx, (path, stored))| {
            let handle = FileHandle::from_path(&path);
            Figure {
                file_url: stored.as_deref().and_then(&upload_url).unwrap_or_default(),
                preview_url: path.to_string_lossy().into_owned(),
                caption: handle.file_name(),
                figure_no: format!("Figure {}.1", idx + 1),
                file: Some(handle),
            }
        })
        .collect()
}

async fn upload_screenshot(
    backend: &dyn Backend,
    path: &Path,
) -> Option<(PathBuf, Option<String>)> {
    let part = match UploadPart::from_path(UploadField::Screenshots, path).await {
        Ok(part) => part,
        Err(err) => {
            bb_warn!("Cannot read screenshot {:?}: {}", path, err);
            return None;
        }
    };
    let name = part.file_name.clone();
    let stored = match backend.upload_files(vec![part]).await {
        Ok(uploaded) => uploaded.screenshots.into_iter().next().map(|s| s.filename),
        Err(err) => {
            bb_warn!("Upload of {} failed, keeping local copy: {}", name, err);
            None
        }
    };
    Some((path.to_path_buf(), stored))
}
