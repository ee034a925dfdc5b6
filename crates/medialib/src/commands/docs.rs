//! Document listing and search.

use medialib_core::{DocumentQuery, MediaLibrary, SearchFilter, SourceKind};

use crate::cli::{DocsArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::rows::DocumentRow;

pub async fn handle(
    library: &MediaLibrary,
    args: DocsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let kind = match args.source {
        Some(source) => SourceKind::from(source),
        None => library.default_source()?,
    };
    library.sync_source(kind).await?;

    let search = args.search.as_deref().unwrap_or_default();
    let docs = match args.role {
        Some(role) => library.search(kind, &DocumentQuery::new(role.into(), search)),
        None => SearchFilter::new(search).apply(&library.documents(kind)),
    };
    tracing::debug!(source = %kind, shown = docs.len(), "documents listed");

    let out = output::render_list(
        &global.output,
        &docs,
        |d| DocumentRow::from(d),
        |d| d.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
