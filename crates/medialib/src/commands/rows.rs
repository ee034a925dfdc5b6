//! Table rows shared by the document and folder listings.

use std::sync::Arc;

use bytesize::ByteSize;
use chrono::NaiveDateTime;
use tabled::Tabled;

use medialib_core::{Document, Folder};

fn created(at: Option<NaiveDateTime>) -> String {
    at.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

#[derive(Tabled)]
pub struct DocumentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "File")]
    filename: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Owner")]
    owner: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&Arc<Document>> for DocumentRow {
    fn from(d: &Arc<Document>) -> Self {
        Self {
            id: d.id.to_string(),
            title: d.title().to_owned(),
            filename: d.filename.clone(),
            role: d.role().to_string(),
            size: d.size.map(|s| ByteSize::b(s).to_string()).unwrap_or_default(),
            owner: d.owner_name.clone().or_else(|| d.owner.clone()).unwrap_or_default(),
            created: created(d.created()),
        }
    }
}

pub fn document_detail(d: &Arc<Document>) -> String {
    let mut lines = vec![
        format!("ID:        {}", d.id),
        format!("Title:     {}", d.title()),
        format!("File:      {}", d.filename),
        format!("Role:      {}", d.role()),
        format!("Type:      {}", d.content_type.as_deref().unwrap_or("-")),
    ];
    if let Some(size) = d.size {
        lines.push(format!("Size:      {}", ByteSize::b(size)));
    }
    if let Some(ref folder) = d.folder {
        lines.push(format!("Folder:    {folder}"));
    }
    lines.push(format!("Protected: {}", d.protected));
    lines.join("\n")
}

#[derive(Tabled)]
pub struct FolderRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&Arc<Folder>> for FolderRow {
    fn from(f: &Arc<Folder>) -> Self {
        Self {
            id: f.id.to_string(),
            name: f.name.clone(),
            path: f.path.clone(),
            created: created(f.created),
        }
    }
}
