//! Protected copies of selected documents.

use medialib_core::{CoreError, MediaLibrary, SourceKind};

use crate::cli::{DuplicateArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::rows::{DocumentRow, document_detail};

pub async fn handle(
    library: &MediaLibrary,
    args: DuplicateArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let kind = SourceKind::from(args.source);
    library.sync_source(kind).await?;

    let available = library.documents(kind);
    let selection = library.selection();
    selection.clear();
    for id in &args.ids {
        let doc = available
            .iter()
            .find(|d| d.id.as_str() == id.as_str())
            .ok_or_else(|| {
                CliError::from(CoreError::NotFound {
                    entity_type: "document".into(),
                    identifier: id.clone(),
                })
            })?;
        selection.select(doc.id.clone());
    }

    let picked = selection.selected_in(&available);
    let copies = library.select_documents(kind, &picked).await?;
    tracing::info!(source = %kind, count = copies.len(), "documents selected");

    let out = if let [copy] = copies.as_slice() {
        output::render_single(&global.output, copy, document_detail, |d| d.id.to_string())?
    } else {
        output::render_list(
            &global.output,
            &copies,
            |d| DocumentRow::from(d),
            |d| d.id.to_string(),
        )?
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
