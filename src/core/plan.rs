//! Distribution plan data model
//!
//! Everything here is plain data: a plan is built fresh for every call and
//! handed to the caller, who turns each [`DiskPlan`] into one disk image.

use serde::{Deserialize, Serialize};

/// A file available for placement
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateFile {
    pub name: String,
    pub size: u64,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        CandidateFile {
            name: name.into(),
            size,
        }
    }
}

/// One entry written to a target disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FileOperation {
    /// The whole source file, copied verbatim
    WholeFile { source: String, output_name: String },

    /// `length` bytes of the source starting at byte `start`
    RangeChunk {
        source: String,
        start: u64,
        length: u64,
        output_name: String,
    },
}

impl FileOperation {
    pub fn source_name(&self) -> &str {
        match self {
            FileOperation::WholeFile { source, .. } | FileOperation::RangeChunk { source, .. } => {
                source
            }
        }
    }

    pub fn output_name(&self) -> &str {
        match self {
            FileOperation::WholeFile { output_name, .. }
            | FileOperation::RangeChunk { output_name, .. } => output_name,
        }
    }

    /// Byte offset into the source, for chunks only
    pub fn start(&self) -> Option<u64> {
        match self {
            FileOperation::RangeChunk { start, .. } => Some(*start),
            FileOperation::WholeFile { .. } => None,
        }
    }

    /// Number of bytes read from `start`, for chunks only
    pub fn length(&self) -> Option<u64> {
        match self {
            FileOperation::RangeChunk { length, .. } => Some(*length),
            FileOperation::WholeFile { .. } => None,
        }
    }

    pub fn is_chunk(&self) -> bool {
        matches!(self, FileOperation::RangeChunk { .. })
    }
}

/// Operations slated for one disk image, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiskPlan {
    operations: Vec<FileOperation>,
}

impl DiskPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, operation: FileOperation) {
        self.operations.push(operation);
    }

    pub fn operations(&self) -> &[FileOperation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// True for a disk holding a piece of a split file
    pub fn is_split(&self) -> bool {
        self.operations.iter().any(FileOperation::is_chunk)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileOperation> {
        self.operations.iter()
    }
}

impl From<Vec<FileOperation>> for DiskPlan {
    fn from(operations: Vec<FileOperation>) -> Self {
        DiskPlan { operations }
    }
}

impl<'a> IntoIterator for &'a DiskPlan {
    type Item = &'a FileOperation;
    type IntoIter = std::slice::Iter<'a, FileOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}

/// Disk plans in creation order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DistributionResult {
    disks: Vec<DiskPlan>,
}

impl DistributionResult {
    pub fn new(disks: Vec<DiskPlan>) -> Self {
        DistributionResult { disks }
    }

    pub fn disks(&self) -> &[DiskPlan] {
        &self.disks
    }

    pub fn disk_count(&self) -> usize {
        self.disks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.disks.is_empty()
    }

    /// Total number of operations over all disks
    pub fn operation_count(&self) -> usize {
        self.disks.iter().map(DiskPlan::len).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DiskPlan> {
        self.disks.iter()
    }
}

impl<'a> IntoIterator for &'a DistributionResult {
    type Item = &'a DiskPlan;
    type IntoIter = std::slice::Iter<'a, DiskPlan>;

    fn into_iter(self) -> Self::IntoIter {
        self.disks.iter()
    }
}
