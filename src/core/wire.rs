//! Request encoding for the disk-image creation service
//!
//! A disk is created with one request per disk plan: the target image name
//! goes in the path, the body is `{ "label": ..., "contents": [...] }`. Each
//! contents element is either a plain file name (copy the whole file) or an
//! object `{ name, start?, length?, rename? }`.

use crate::plan::{DiskPlan, FileOperation};
use serde::{Deserialize, Serialize};

/// One element of a creation request's `contents` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentEntry {
    /// Whole file, written under its own name
    File(String),

    /// Slice and/or rename of an uploaded file
    Slice {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        length: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rename: Option<String>,
    },
}

impl From<&FileOperation> for ContentEntry {
    fn from(operation: &FileOperation) -> Self {
        match operation {
            FileOperation::WholeFile {
                source,
                output_name,
            } if source == output_name => ContentEntry::File(source.clone()),
            FileOperation::WholeFile {
                source,
                output_name,
            } => ContentEntry::Slice {
                name: source.clone(),
                start: None,
                length: None,
                rename: Some(output_name.clone()),
            },
            FileOperation::RangeChunk {
                source,
                start,
                length,
                output_name,
            } => ContentEntry::Slice {
                name: source.clone(),
                start: Some(*start),
                length: Some(*length),
                rename: Some(output_name.clone()),
            },
        }
    }
}

#[derive(Serialize)]
struct RequestBody<'a> {
    label: &'a str,
    contents: &'a [ContentEntry],
}

/// Everything needed to create one disk image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDiskRequest {
    /// Target image file name
    pub name: String,

    pub label: String,

    pub contents: Vec<ContentEntry>,
}

impl CreateDiskRequest {
    pub fn new(name: impl Into<String>, label: impl Into<String>, plan: &DiskPlan) -> Self {
        CreateDiskRequest {
            name: name.into(),
            label: label.into(),
            contents: plan.iter().map(ContentEntry::from).collect(),
        }
    }

    /// JSON body of the request (`name` travels in the path)
    pub fn body(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(RequestBody {
            label: &self.label,
            contents: &self.contents,
        })
    }
}
