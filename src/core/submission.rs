//! Per-disk submission tracking
//!
//! Each disk of a plan becomes one creation request. A request moves through
//! `Pending -> Submitting -> Done | Failed`; a failed disk can be submitted
//! again, a done disk cannot.

use crate::error::{PlanError, Result};
use crate::geometry::DiskGeometry;
use crate::naming::numbered_label;
use crate::plan::DistributionResult;
use crate::validation::{validate_disk_name, validate_label};
use crate::wire::CreateDiskRequest;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// File extension of created disk images
pub const ADF_EXTENSION: &str = "adf";

/// Where a disk stands in the submission process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmissionState {
    Pending,
    Submitting,
    Done,
    Failed { reason: String },
}

impl SubmissionState {
    fn name(&self) -> &'static str {
        match self {
            SubmissionState::Pending => "pending",
            SubmissionState::Submitting => "submitting",
            SubmissionState::Done => "done",
            SubmissionState::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionState::Failed { reason } => write!(f, "failed: {}", reason),
            other => f.write_str(other.name()),
        }
    }
}

/// External service that turns a request into a disk image
pub trait DiskImageService {
    type Error: fmt::Display;

    /// Create one disk image; must not overwrite an existing image
    fn create_disk(&mut self, request: &CreateDiskRequest) -> std::result::Result<(), Self::Error>;
}

/// One disk's request and its state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskSubmission {
    index: usize,
    request: CreateDiskRequest,
    state: SubmissionState,
}

impl DiskSubmission {
    pub fn new(index: usize, request: CreateDiskRequest) -> Self {
        DiskSubmission {
            index,
            request,
            state: SubmissionState::Pending,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn request(&self) -> &CreateDiskRequest {
        &self.request
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == SubmissionState::Done
    }

    fn transition(&mut self, to: SubmissionState) -> Result<()> {
        let allowed = matches!(
            (&self.state, &to),
            (
                SubmissionState::Pending | SubmissionState::Failed { .. },
                SubmissionState::Submitting
            ) | (
                SubmissionState::Submitting,
                SubmissionState::Done | SubmissionState::Failed { .. }
            )
        );

        if !allowed {
            return Err(PlanError::InvalidTransition {
                disk: self.index,
                from: self.state.name(),
                to: to.name(),
            });
        }

        self.state = to;
        Ok(())
    }

    /// Pending or failed -> submitting
    pub fn begin(&mut self) -> Result<()> {
        self.transition(SubmissionState::Submitting)
    }

    /// Submitting -> done
    pub fn complete(&mut self) -> Result<()> {
        self.transition(SubmissionState::Done)
    }

    /// Submitting -> failed
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<()> {
        self.transition(SubmissionState::Failed {
            reason: reason.into(),
        })
    }
}

/// How disk images and their labels are named
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskNaming {
    /// Image file name without extension
    pub base_name: String,

    /// Volume label; numbered when a plan spans several disks
    pub label: String,
}

impl DiskNaming {
    pub fn new(base_name: impl Into<String>, label: impl Into<String>) -> Self {
        DiskNaming {
            base_name: base_name.into(),
            label: label.into(),
        }
    }

    /// `<base>.adf` for a single disk, `<base>-<n>.adf` within a set
    ///
    /// Numbers are zero-padded to the width of `total` so images sort in order.
    pub fn image_name(&self, index: usize, total: usize) -> String {
        if total <= 1 {
            return format!("{}.{}", self.base_name, ADF_EXTENSION);
        }

        let width = total.to_string().len();
        format!(
            "{}-{:0width$}.{}",
            self.base_name,
            index + 1,
            ADF_EXTENSION,
            width = width
        )
    }

    pub fn label(&self, index: usize, total: usize, max_chars: usize) -> String {
        numbered_label(&self.label, index + 1, total, max_chars)
    }
}

/// Outcome of one pass over a batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReport {
    /// Disks created during this pass
    pub created: Vec<usize>,

    /// Disks that failed during this pass, with the service's reason
    pub failed: Vec<(usize, String)>,
}

impl SubmissionReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// The submissions for every disk of one plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionBatch {
    disks: Vec<DiskSubmission>,
}

impl SubmissionBatch {
    /// Build one pending request per disk
    pub fn prepare(
        result: &DistributionResult,
        naming: &DiskNaming,
        geometry: &DiskGeometry,
    ) -> Result<Self> {
        validate_disk_name(&naming.base_name)?;
        validate_label(&naming.label, geometry.max_output_name)?;

        let total = result.disk_count();
        let disks = result
            .iter()
            .enumerate()
            .map(|(index, plan)| {
                let request = CreateDiskRequest::new(
                    naming.image_name(index, total),
                    naming.label(index, total, geometry.max_output_name),
                    plan,
                );
                DiskSubmission::new(index, request)
            })
            .collect();

        debug!("Prepared {} disk requests for '{}'", total, naming.base_name);
        Ok(SubmissionBatch { disks })
    }

    pub fn disks(&self) -> &[DiskSubmission] {
        &self.disks
    }

    /// True once every disk has been created
    pub fn is_complete(&self) -> bool {
        self.disks.iter().all(DiskSubmission::is_done)
    }

    /// Submit every disk not yet done, one after another
    ///
    /// A failure does not stop the pass. Calling this again retries only the
    /// disks that failed.
    pub fn submit<S: DiskImageService>(&mut self, service: &mut S) -> Result<SubmissionReport> {
        let mut report = SubmissionReport::default();

        for disk in self.disks.iter_mut().filter(|disk| !disk.is_done()) {
            disk.begin()?;
            debug!("Creating disk image {}", disk.request.name);

            match service.create_disk(&disk.request) {
                Ok(()) => {
                    disk.complete()?;
                    report.created.push(disk.index);
                }
                Err(e) => {
                    let reason = e.to_string();
                    warn!("Failed to create {}: {}", disk.request.name, reason);
                    disk.fail(reason.clone())?;
                    report.failed.push((disk.index, reason));
                }
            }
        }

        info!(
            "Submission pass: {} created, {} failed",
            report.created.len(),
            report.failed.len()
        );
        Ok(report)
    }
}
