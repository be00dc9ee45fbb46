//! Disk distribution strategies
//!
//! The allocator works in two phases:
//! - Oversized files (larger than one disk's usable size) are split into
//!   chunks, one chunk per disk
//! - The remaining files are packed first-fit by descending size

pub mod pack;
pub mod split;

use crate::geometry::DiskGeometry;
use crate::plan::{CandidateFile, DistributionResult};
use tracing::info;

/// Distribution allocator trait
///
/// Implementations are pure: no I/O, no shared state, same input same output.
pub trait DiskAllocator {
    /// Decide which disk every file (or piece of a file) goes to
    fn distribute(&self, files: &[CandidateFile]) -> DistributionResult;

    /// Geometry the plans are computed against
    fn geometry(&self) -> &DiskGeometry;
}

/// Greedy first-fit-by-descending-size allocator
///
/// Does not search for the optimal disk count; it places the largest
/// remaining file first and fills the rest of the disk with the largest
/// files that still fit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FirstFitAllocator {
    geometry: DiskGeometry,
}

impl FirstFitAllocator {
    pub fn new(geometry: DiskGeometry) -> Self {
        FirstFitAllocator { geometry }
    }

    /// Split the input into (oversized, fitting), each sorted by size descending
    ///
    /// The sort is stable so equal sizes keep their input order.
    fn partition<'a>(
        &self,
        files: &'a [CandidateFile],
    ) -> (Vec<&'a CandidateFile>, Vec<&'a CandidateFile>) {
        let usable = self.geometry.usable_size();
        let (mut oversized, mut fitting): (Vec<_>, Vec<_>) =
            files.iter().partition(|file| file.size > usable);

        oversized.sort_by(|a, b| b.size.cmp(&a.size));
        fitting.sort_by(|a, b| b.size.cmp(&a.size));

        (oversized, fitting)
    }
}

impl DiskAllocator for FirstFitAllocator {
    fn distribute(&self, files: &[CandidateFile]) -> DistributionResult {
        let (oversized, fitting) = self.partition(files);

        let mut disks = Vec::new();
        for file in &oversized {
            disks.extend(split::split_file(file, &self.geometry));
        }
        let split_disks = disks.len();

        disks.extend(pack::pack_files(fitting, &self.geometry));

        info!(
            "Distributed {} files onto {} disks ({} split, {} packed)",
            files.len(),
            disks.len(),
            split_disks,
            disks.len() - split_disks
        );

        DistributionResult::new(disks)
    }

    fn geometry(&self) -> &DiskGeometry {
        &self.geometry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::USABLE_SIZE;
    use crate::plan::FileOperation;

    fn files(entries: &[(&str, u64)]) -> Vec<CandidateFile> {
        entries
            .iter()
            .map(|(name, size)| CandidateFile::new(*name, *size))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let result = FirstFitAllocator::default().distribute(&[]);
        assert!(result.is_empty());
    }

    #[test]
    fn test_exactly_usable_is_fitting() {
        let result = FirstFitAllocator::default().distribute(&files(&[("edge", USABLE_SIZE)]));
        assert_eq!(result.disk_count(), 1);
        assert!(!result.disks()[0].is_split());
    }

    #[test]
    fn test_one_byte_over_is_split() {
        let result = FirstFitAllocator::default().distribute(&files(&[("edge", USABLE_SIZE + 1)]));
        assert_eq!(result.disk_count(), 2);
        assert_eq!(result.disks()[1].operations()[0].length(), Some(1));
    }

    #[test]
    fn test_split_disks_come_first() {
        let input = files(&[("small", 10), ("big", 2 * USABLE_SIZE), ("medium", 5000)]);
        let result = FirstFitAllocator::default().distribute(&input);

        assert_eq!(result.disk_count(), 3);
        assert!(result.disks()[0].is_split());
        assert!(result.disks()[1].is_split());
        assert!(!result.disks()[2].is_split());

        let names: Vec<_> = result.disks()[2]
            .iter()
            .map(FileOperation::source_name)
            .collect();
        assert_eq!(names, vec!["medium", "small"]);
    }

    #[test]
    fn test_oversized_sorted_descending() {
        let input = files(&[("b", USABLE_SIZE + 10), ("a", 2 * USABLE_SIZE + 10)]);
        let result = FirstFitAllocator::default().distribute(&input);

        let sources: Vec<_> = result
            .iter()
            .map(|disk| disk.operations()[0].source_name())
            .collect();
        assert_eq!(sources, vec!["a", "a", "a", "b", "b"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let input = files(&[("first", 500_000), ("second", 500_000), ("third", 500_000)]);
        let result = FirstFitAllocator::default().distribute(&input);

        let sources: Vec<_> = result
            .iter()
            .map(|disk| disk.operations()[0].source_name())
            .collect();
        assert_eq!(sources, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_input_not_mutated() {
        let input = files(&[("z", 1), ("y", 2_000_000), ("x", 3)]);
        let before = input.clone();
        FirstFitAllocator::default().distribute(&input);
        assert_eq!(input, before);
    }

    #[test]
    fn test_custom_geometry() {
        let geometry = DiskGeometry {
            disk_size: 1000,
            buffer_space: 0,
            meta_space_per_file: 100,
            max_output_name: 30,
        };
        let allocator = FirstFitAllocator::new(geometry);
        let result = allocator.distribute(&files(&[("a", 2500), ("b", 400), ("c", 400)]));

        // 3 chunks of "a"; with "b" placed, 1000 - (2*100 + 400) leaves room for "c"
        assert_eq!(result.disk_count(), 4);
        assert_eq!(result.disks()[3].len(), 2);
        assert_eq!(allocator.geometry().usable_size(), 1000);
    }
}
