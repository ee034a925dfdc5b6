// Portal widget catalogue

use tracing::debug;

use crate::error::Error;
use crate::workspace::client::WorkspaceClient;
use crate::workspace::models::{RawWidget, Record};

impl WorkspaceClient {
    /// List the widgets installed on the portal.
    ///
    /// `GET /widgets`
    pub async fn list_widgets(&self) -> Result<Vec<Record<RawWidget>>, Error> {
        let url = self.url("widgets")?;
        debug!("listing widgets");
        self.get_records(url).await
    }
}
