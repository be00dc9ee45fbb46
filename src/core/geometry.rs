//! Disk geometry: the capacity constants every plan is computed against
//!
//! All limits derive from one nominal disk size. The reference values match a
//! double-density Amiga floppy (880 KiB) formatted with the Fast File System.
//!
//! A geometry can be loaded from TOML:
//!
//! ```toml
//! [geometry]
//! disk_size = 901120
//! buffer_space = 15360
//! meta_space_per_file = 2048
//! max_output_name = 30
//! ```

use crate::error::{PlanError, Result};
use crate::naming::chunk_suffix;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Raw capacity of a double-density ADF (880 KiB)
pub const ADF_DISK_SIZE: u64 = 880 * 1024;

/// Raw capacity of a high-density ADF (1760 KiB)
pub const ADF_HD_DISK_SIZE: u64 = 1760 * 1024;

/// Headroom kept free on every disk
pub const BUFFER_SPACE: u64 = 15 * 1024;

/// Payload ceiling of a double-density ADF
pub const USABLE_SIZE: u64 = ADF_DISK_SIZE - BUFFER_SPACE;

/// Bookkeeping overhead charged per whole file when packing
pub const META_SPACE_PER_FILE: u64 = 2 * 1024;

/// FFS filename and volume label limit
pub const MAX_FFS_FILENAME: usize = 30;

/// Capacity constants for one target medium
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskGeometry {
    /// Raw medium capacity in bytes
    pub disk_size: u64,

    /// Reserved headroom subtracted from `disk_size`
    pub buffer_space: u64,

    /// Per-file overhead charged against the usable size for whole-file packing
    pub meta_space_per_file: u64,

    /// Maximum number of characters in any output name
    pub max_output_name: usize,
}

impl Default for DiskGeometry {
    fn default() -> Self {
        Self::amiga_dd()
    }
}

#[derive(Deserialize)]
struct GeometryFile {
    #[serde(default)]
    geometry: DiskGeometry,
}

impl DiskGeometry {
    /// Double-density 880 KiB floppy (the reference configuration)
    pub const fn amiga_dd() -> Self {
        DiskGeometry {
            disk_size: ADF_DISK_SIZE,
            buffer_space: BUFFER_SPACE,
            meta_space_per_file: META_SPACE_PER_FILE,
            max_output_name: MAX_FFS_FILENAME,
        }
    }

    /// High-density 1760 KiB floppy
    pub const fn amiga_hd() -> Self {
        DiskGeometry {
            disk_size: ADF_HD_DISK_SIZE,
            ..Self::amiga_dd()
        }
    }

    /// Maximum payload per disk, split chunks included
    pub fn usable_size(&self) -> u64 {
        self.disk_size.saturating_sub(self.buffer_space)
    }

    /// Length of the suffix on the last chunk of the largest possible file
    pub fn widest_chunk_suffix(&self) -> usize {
        let max_chunks = u64::MAX.div_ceil(self.usable_size().max(1));
        chunk_suffix(max_chunks - 1).len()
    }

    /// Check that the geometry can hold at least one byte and every chunk name
    pub fn validate(&self) -> Result<()> {
        if self.usable_size() == 0 {
            return Err(PlanError::InvalidGeometry(format!(
                "buffer space ({}) leaves no usable space on a {} byte disk",
                self.buffer_space, self.disk_size
            )));
        }

        // One character of stem plus the widest chunk suffix.
        let min_name = 1 + self.widest_chunk_suffix();
        if self.max_output_name < min_name {
            return Err(PlanError::InvalidGeometry(format!(
                "max output name {} is shorter than {} characters",
                self.max_output_name, min_name
            )));
        }

        Ok(())
    }

    /// Parse a `[geometry]` table; absent fields keep the reference values
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let file: GeometryFile = toml::from_str(source)?;
        file.geometry.validate()?;
        Ok(file.geometry)
    }

    /// Load and validate a geometry file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        debug!("Loading disk geometry from {:?}", path.as_ref());
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_usable_size() {
        let geometry = DiskGeometry::default();
        assert_eq!(geometry.disk_size, 901120);
        assert_eq!(geometry.usable_size(), USABLE_SIZE);
        assert_eq!(USABLE_SIZE, 885760);
        assert_eq!(geometry.meta_space_per_file, 2048);
        assert_eq!(geometry.max_output_name, 30);
    }

    #[test]
    fn test_hd_preset() {
        let geometry = DiskGeometry::amiga_hd();
        assert_eq!(geometry.usable_size(), 1760 * 1024 - 15 * 1024);
        assert!(geometry.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_no_usable_space() {
        let geometry = DiskGeometry {
            buffer_space: ADF_DISK_SIZE,
            ..DiskGeometry::default()
        };
        assert!(matches!(
            geometry.validate(),
            Err(PlanError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_validate_rejects_short_names() {
        // u64::MAX bytes need 20_825_894_230_616 chunks: ".20825894230616"
        assert_eq!(DiskGeometry::default().widest_chunk_suffix(), 15);

        let geometry = DiskGeometry {
            max_output_name: 15,
            ..DiskGeometry::default()
        };
        assert!(geometry.validate().is_err());

        let geometry = DiskGeometry {
            max_output_name: 16,
            ..DiskGeometry::default()
        };
        assert!(geometry.validate().is_ok());
    }

    #[test]
    fn test_validate_accounts_for_chunk_count_on_tiny_disks() {
        let geometry = DiskGeometry {
            disk_size: 100,
            buffer_space: 0,
            meta_space_per_file: 0,
            max_output_name: 5,
        };
        assert!(matches!(
            geometry.validate(),
            Err(PlanError::InvalidGeometry(_))
        ));

        let geometry = DiskGeometry {
            max_output_name: 1 + geometry.widest_chunk_suffix(),
            ..geometry
        };
        assert_eq!(geometry.max_output_name, 20);
        assert!(geometry.validate().is_ok());
    }

    #[test]
    fn test_toml_partial_override() {
        let geometry = DiskGeometry::from_toml_str(
            r#"
            [geometry]
            buffer_space = 0
            max_output_name = 20
            "#,
        )
        .unwrap();

        assert_eq!(geometry.disk_size, ADF_DISK_SIZE);
        assert_eq!(geometry.usable_size(), ADF_DISK_SIZE);
        assert_eq!(geometry.max_output_name, 20);
    }

    #[test]
    fn test_toml_empty_document_is_reference() {
        let geometry = DiskGeometry::from_toml_str("").unwrap();
        assert_eq!(geometry, DiskGeometry::amiga_dd());
    }

    #[test]
    fn test_toml_parse_error() {
        let err = DiskGeometry::from_toml_str("[geometry]\ndisk_size = \"big\"").unwrap_err();
        assert!(matches!(err, PlanError::Config(_)));
    }

    #[test]
    fn test_toml_invalid_geometry() {
        let err = DiskGeometry::from_toml_str("[geometry]\ndisk_size = 1024\nbuffer_space = 2048")
            .unwrap_err();
        assert!(matches!(err, PlanError::InvalidGeometry(_)));
    }
}
