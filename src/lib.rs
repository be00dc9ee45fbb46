//! # adf-distribute - Disk Distribution Planning for Amiga Disk Images
//!
//! `adf-distribute` decides how a set of files is spread over fixed-capacity
//! disk images (880 KiB ADFs by default):
//!
//! - **Splitting**: a file larger than one disk is cut into ordered chunks
//!   named `<name>.001`, `<name>.002`, ..., one chunk per disk
//! - **Packing**: everything else is packed first-fit by descending size,
//!   charging a fixed metadata overhead per file
//! - **Naming**: every output name respects the 30 character FFS limit
//!
//! Planning is pure: it takes `(name, size)` records and returns a
//! serializable plan. Creating the images is left to a [`DiskImageService`].
//!
//! ## Quick Start
//!
//! ```rust
//! use adf_distribute::{distribute, CandidateFile};
//!
//! let files = vec![
//!     CandidateFile::new("game.lha", 900_000),
//!     CandidateFile::new("readme.txt", 1_000),
//! ];
//!
//! let result = distribute(&files);
//!
//! // Two disks for the split archive, one for the readme
//! assert_eq!(result.disk_count(), 3);
//! assert_eq!(result.disks()[0].operations()[0].output_name(), "game.lha.001");
//! ```
//!
//! ## Submitting a Plan
//!
//! ```rust
//! use adf_distribute::{CandidateFile, DiskNaming, Planner, Result};
//!
//! # fn main() -> Result<()> {
//! let planner = Planner::new();
//! let result = planner.plan_checked(&[CandidateFile::new("demo.exe", 200_000)])?;
//!
//! let batch = planner.prepare_submission(&result, &DiskNaming::new("demo", "Demo"))?;
//! assert_eq!(batch.disks()[0].request().name, "demo.adf");
//! # Ok(())
//! # }
//! ```

pub mod core;

pub use crate::core::{allocator, error, geometry, naming, plan, submission, validation, wire};

pub use crate::core::{
    allocator::{DiskAllocator, FirstFitAllocator},
    error::{PlanError, Result},
    geometry::{
        DiskGeometry, ADF_DISK_SIZE, BUFFER_SPACE, MAX_FFS_FILENAME, META_SPACE_PER_FILE,
        USABLE_SIZE,
    },
    plan::{CandidateFile, DiskPlan, DistributionResult, FileOperation},
    submission::{
        DiskImageService, DiskNaming, DiskSubmission, SubmissionBatch, SubmissionReport,
        SubmissionState,
    },
    wire::{ContentEntry, CreateDiskRequest},
};

use std::path::PathBuf;
use tracing::{debug, info};

/// Distribute `files` over 880 KiB disks with the reference geometry
///
/// Never fails; an empty input gives an empty result.
pub fn distribute(files: &[CandidateFile]) -> DistributionResult {
    FirstFitAllocator::default().distribute(files)
}

/// Planning front end bound to one disk geometry
///
/// # Examples
///
/// ```rust
/// use adf_distribute::{CandidateFile, DiskGeometry, Planner};
///
/// # fn main() -> adf_distribute::Result<()> {
/// let planner = Planner::with_geometry(DiskGeometry::amiga_hd())?;
/// let result = planner.plan(&[CandidateFile::new("big.iso", 1_500_000)]);
/// assert_eq!(result.disk_count(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Planner {
    allocator: FirstFitAllocator,
}

impl Planner {
    /// Planner for the reference 880 KiB geometry
    pub fn new() -> Self {
        Self::default()
    }

    /// Planner for a custom geometry
    ///
    /// # Errors
    ///
    /// Returns `InvalidGeometry` if the geometry leaves no usable space or
    /// no room for chunk names.
    pub fn with_geometry(geometry: DiskGeometry) -> Result<Self> {
        geometry.validate()?;
        Ok(Planner {
            allocator: FirstFitAllocator::new(geometry),
        })
    }

    pub fn geometry(&self) -> &DiskGeometry {
        self.allocator.geometry()
    }

    /// Plan without any validation
    pub fn plan(&self, files: &[CandidateFile]) -> DistributionResult {
        self.allocator.distribute(files)
    }

    /// Plan a candidate list the disk-image service will accept
    ///
    /// # Errors
    ///
    /// - `EmptyName` / `DuplicateName` for a bad candidate list
    /// - `OutputNameConflict` if truncation makes two names on one disk equal
    pub fn plan_checked(&self, files: &[CandidateFile]) -> Result<DistributionResult> {
        validation::validate_candidates(files)?;
        let result = self.plan(files);
        validation::check_output_names(&result)?;
        debug!(
            "Checked plan: {} operations on {} disks",
            result.operation_count(),
            result.disk_count()
        );
        Ok(result)
    }

    /// Turn a plan into pending creation requests
    pub fn prepare_submission(
        &self,
        result: &DistributionResult,
        naming: &DiskNaming,
    ) -> Result<SubmissionBatch> {
        SubmissionBatch::prepare(result, naming, self.geometry())
    }
}

/// Builder for a [`Planner`] from presets and configuration files
///
/// # Examples
///
/// ```rust,no_run
/// use adf_distribute::PlannerBuilder;
///
/// # fn main() -> adf_distribute::Result<()> {
/// let planner = PlannerBuilder::new()
///     .config_file("/etc/adf-distribute/geometry.toml")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PlannerBuilder {
    geometry: DiskGeometry,
    config_file: Option<PathBuf>,
}

impl PlannerBuilder {
    /// Start from the reference geometry
    pub fn new() -> Self {
        PlannerBuilder {
            geometry: DiskGeometry::default(),
            config_file: None,
        }
    }

    /// Use a specific geometry (for example a preset)
    pub fn geometry(mut self, geometry: DiskGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Load the geometry from a TOML file; overrides [`Self::geometry`]
    pub fn config_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Build the planner, loading and validating the geometry
    pub fn build(self) -> Result<Planner> {
        let geometry = match self.config_file {
            Some(path) => DiskGeometry::load(&path)?,
            None => self.geometry,
        };

        info!(
            "Planning for {} byte disks ({} usable)",
            geometry.disk_size,
            geometry.usable_size()
        );
        Planner::with_geometry(geometry)
    }
}

impl Default for PlannerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
