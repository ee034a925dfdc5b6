//! File import into the media library.

use std::path::Path;

use medialib_core::{FileUpload, MediaLibrary};

use crate::cli::{GlobalOpts, UploadArgs};
use crate::error::CliError;
use crate::output;

use super::rows::DocumentRow;

/// MIME type for common workspace file extensions; `None` lets the portal sniff.
fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "odt" => "application/vnd.oasis.opendocument.text",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ods" => "application/vnd.oasis.opendocument.spreadsheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "odp" => "application/vnd.oasis.opendocument.presentation",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mp3" => "audio/mpeg",
        "ogg" => "audio/ogg",
        "wav" => "audio/wav",
        "txt" => "text/plain",
        _ => return None,
    };
    Some(mime)
}

async fn read_upload(path: &Path) -> Result<FileUpload, CliError> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| CliError::Validation {
            field: "file".into(),
            reason: format!("'{}' is not a file", path.display()),
        })?;
    let mut upload = FileUpload::new(file_name, bytes);
    upload.content_type = content_type_for(path).map(str::to_owned);
    Ok(upload)
}

pub async fn handle(
    library: &MediaLibrary,
    args: UploadArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut files = Vec::with_capacity(args.files.len());
    for path in &args.files {
        files.push(read_upload(path).await?);
    }
    let total = files.len();

    let mut uploaded = Vec::new();
    let mut failed = 0;
    for (path, result) in args.files.iter().zip(library.import_files(files).await) {
        match result {
            Ok(doc) => uploaded.push(doc),
            Err(e) => {
                failed += 1;
                tracing::warn!(file = %path.display(), error = %e, "upload failed");
                if !global.quiet {
                    eprintln!("✗ {}: {e}", path.display());
                }
            }
        }
    }

    let out = output::render_list(
        &global.output,
        &uploaded,
        |d| DocumentRow::from(d),
        |d| d.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);

    if failed > 0 {
        return Err(CliError::UploadFailed { failed, total });
    }
    Ok(())
}
