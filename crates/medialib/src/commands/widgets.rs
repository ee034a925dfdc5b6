//! Widget listing.

use std::sync::Arc;

use tabled::Tabled;

use medialib_core::{CoreError, MediaLibrary, Widget};

use crate::cli::{GlobalOpts, WidgetsArgs};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct WidgetRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Script")]
    js: String,
}

impl From<&Arc<Widget>> for WidgetRow {
    fn from(w: &Arc<Widget>) -> Self {
        Self {
            name: w.name.clone(),
            path: w.path.clone().unwrap_or_default(),
            js: w.js.clone().unwrap_or_default(),
        }
    }
}

fn detail(w: &Arc<Widget>) -> String {
    [
        format!("Name:   {}", w.name),
        format!("ID:     {}", w.id),
        format!("Path:   {}", w.path.as_deref().unwrap_or("-")),
        format!("Script: {}", w.js.as_deref().unwrap_or("-")),
        format!("i18n:   {}", w.i18n.as_deref().unwrap_or("-")),
    ]
    .join("\n")
}

pub async fn handle(
    library: &MediaLibrary,
    args: WidgetsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let widgets = library.widgets();
    widgets.sync().await?;

    let out = match args.name {
        Some(name) => {
            let widget = widgets.find_widget(&name).ok_or_else(|| CoreError::NotFound {
                entity_type: "widget".into(),
                identifier: name,
            })?;
            output::render_single(&global.output, &widget, detail, |w| w.name.clone())?
        }
        None => {
            let snap = widgets.widgets().snapshot();
            output::render_list(
                &global.output,
                snap.as_slice(),
                |w| WidgetRow::from(w),
                |w| w.name.clone(),
            )?
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
