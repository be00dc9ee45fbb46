//! Validation for candidate lists, disk labels and disk image names
//!
//! The allocator itself accepts anything; these checks run in front of it
//! (candidates) and behind it (output name conflicts) when a caller wants a
//! plan that the disk-image service will accept.

use crate::error::{PlanError, Result};
use crate::plan::{CandidateFile, DistributionResult};
use regex::Regex;
use std::collections::HashSet;

/// AmigaDOS reserves `:` (volume) and `/` (directory) in names
const LABEL_PATTERN: &str = r"^[^:/]+$";

/// Reject empty and repeated candidate names
///
/// Zero-byte files are accepted; they are packed like any other file.
pub fn validate_candidates(files: &[CandidateFile]) -> Result<()> {
    let mut seen = HashSet::with_capacity(files.len());

    for (index, file) in files.iter().enumerate() {
        if file.name.is_empty() {
            return Err(PlanError::EmptyName { index });
        }
        if !seen.insert(file.name.as_str()) {
            return Err(PlanError::DuplicateName(file.name.clone()));
        }
    }

    Ok(())
}

/// Validate a disk label against the FFS limits
///
/// # Examples
///
/// ```
/// use adf_distribute::validation::validate_label;
///
/// assert!(validate_label("Workbench", 30).is_ok());
/// assert!(validate_label("", 30).is_err());
/// assert!(validate_label("DF0:", 30).is_err());
/// ```
pub fn validate_label(label: &str, max_chars: usize) -> Result<()> {
    if label.is_empty() {
        return Err(PlanError::InvalidLabel(
            "label cannot be empty".to_string(),
        ));
    }

    let length = label.chars().count();
    if length > max_chars {
        return Err(PlanError::InvalidLabel(format!(
            "label length exceeds limit; max {}, is {}",
            max_chars, length
        )));
    }

    let re = Regex::new(LABEL_PATTERN).map_err(|e| PlanError::InvalidLabel(e.to_string()))?;
    if !re.is_match(label) {
        return Err(PlanError::InvalidLabel(format!(
            "label '{}' cannot contain ':' or '/'",
            label
        )));
    }

    Ok(())
}

/// Validate the base file name of a disk image
pub fn validate_disk_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(PlanError::InvalidDiskName(
            "name cannot be empty".to_string(),
        ));
    }

    if name == "." || name == ".." {
        return Err(PlanError::InvalidDiskName(format!(
            "'{}' is not a file name",
            name
        )));
    }

    if name.contains(['/', '\\', '\0']) {
        return Err(PlanError::InvalidDiskName(format!(
            "'{}' cannot contain path separators",
            name
        )));
    }

    Ok(())
}

/// Reject disks on which two operations would write the same name
///
/// FFS compares names case-insensitively. Two long names sharing a prefix
/// can collide once truncated.
pub fn check_output_names(result: &DistributionResult) -> Result<()> {
    for (disk, plan) in result.iter().enumerate() {
        let mut seen = HashSet::with_capacity(plan.len());
        for operation in plan {
            if !seen.insert(operation.output_name().to_lowercase()) {
                return Err(PlanError::OutputNameConflict {
                    disk,
                    name: operation.output_name().to_string(),
                });
            }
        }
    }

    Ok(())
}
