use std::sync::Arc;

use futures_util::FutureExt;
use medialib_api::WorkspaceClient;

use crate::bus::{ChangeBus, ChangeEvent, CollectionKind, Source, Target};
use crate::convert;
use crate::error::CoreError;
use crate::model::Widget;
use crate::store::{Collection, Fetcher, fetcher};

/// Portal widgets, optionally narrowed to an allow-list of names.
pub struct Widgets {
    widgets: Collection<Widget>,
    bus: ChangeBus,
}

impl Widgets {
    pub(crate) fn new(
        client: Arc<WorkspaceClient>,
        allowlist: Option<Vec<String>>,
        bus: ChangeBus,
    ) -> Self {
        let allowlist: Option<Arc<[String]>> = allowlist.map(Into::into);
        let widgets = fetcher(move || {
            let client = Arc::clone(&client);
            let allowlist = allowlist.clone();
            async move {
                let all = convert::widgets(client.list_widgets().await?);
                Ok(retain_allowed(all, allowlist.as_deref()))
            }
        });
        Self::with_fetcher(bus, widgets)
    }

    pub(crate) fn with_fetcher(bus: ChangeBus, widgets: Fetcher<Widget>) -> Self {
        Self {
            widgets: Collection::new(
                Target::collection(Source::Widgets, CollectionKind::Widgets),
                bus.clone(),
                widgets,
            ),
            bus,
        }
    }

    pub async fn sync(&self) -> Result<(), CoreError> {
        super::join_syncs(
            &self.bus,
            &Source::Widgets,
            vec![(CollectionKind::Widgets, self.widgets.sync().boxed())],
        )
        .await
    }

    pub fn widgets(&self) -> &Collection<Widget> {
        &self.widgets
    }

    pub fn find_widget(&self, name: &str) -> Option<Arc<Widget>> {
        self.widgets.find(|w| w.name == name)
    }

    /// Tell consumers the widget layout should be re-applied.
    pub fn apply(&self) {
        self.bus
            .trigger(ChangeEvent::Changed(self.widgets.target().clone()));
    }
}

/// Keep only widgets named in `allowlist`, in payload order.
fn retain_allowed(mut widgets: Vec<Widget>, allowlist: Option<&[String]>) -> Vec<Widget> {
    if let Some(names) = allowlist {
        widgets.retain(|w| names.iter().any(|n| *n == w.name));
    }
    widgets
}
