// Workspace API surface
//
// Documents, folders and widgets served by the portal. Endpoint groups
// are inherent methods on `WorkspaceClient`, split across files so
// `client` stays focused on transport mechanics.

pub mod client;
pub mod documents;
pub mod models;
pub mod widgets;
