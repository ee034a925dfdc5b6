//! Folder browsing over the session's own documents.

use std::sync::Arc;

use medialib_core::{Document, Folder, MediaLibrary, SearchFilter, SourceKind};
use serde::Serialize;

use crate::cli::{FoldersArgs, FoldersCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::rows::{DocumentRow, FolderRow};

/// Contents of an opened folder, as serialized for structured output.
#[derive(Serialize)]
struct FolderListing {
    path: String,
    folders: Vec<Arc<Folder>>,
    documents: Vec<Arc<Document>>,
}

pub async fn handle(
    library: &MediaLibrary,
    args: FoldersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    library.sync_source(SourceKind::Mine).await?;

    match args.command {
        FoldersCommand::List { search } => {
            let filter = SearchFilter::new(search.as_deref().unwrap_or_default());
            let folders = library.search_folders(SourceKind::Mine, &filter);
            let out = output::render_list(
                &global.output,
                &folders,
                |f| FolderRow::from(f),
                |f| f.path.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        FoldersCommand::Open { path } => {
            let view = library.open_folder_path(&path).await?;
            let listing = FolderListing {
                path: view.path().to_owned(),
                folders: view.folders().snapshot().to_vec(),
                documents: view.documents().snapshot().to_vec(),
            };

            let out = match global.output {
                OutputFormat::Table => {
                    let folders = output::render_list(
                        &global.output,
                        &listing.folders,
                        |f| FolderRow::from(f),
                        |f| f.path.clone(),
                    )?;
                    let docs = output::render_list(
                        &global.output,
                        &listing.documents,
                        |d| DocumentRow::from(d),
                        |d| d.id.to_string(),
                    )?;
                    format!("{}\n\nFolders:\n{folders}\n\nDocuments:\n{docs}", listing.path)
                }
                OutputFormat::Plain => listing
                    .folders
                    .iter()
                    .map(|f| f.path.clone())
                    .chain(listing.documents.iter().map(|d| d.id.to_string()))
                    .collect::<Vec<_>>()
                    .join("\n"),
                _ => output::render_single(
                    &global.output,
                    &listing,
                    |l| l.path.clone(),
                    |l| l.path.clone(),
                )?,
            };
            output::print_output(&out, global.quiet);
            library.close_folder();
            Ok(())
        }
    }
}
