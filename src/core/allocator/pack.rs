//! First-fit packing of files that fit on a single disk
//!
//! Metadata overhead is charged prospectively: the free space seen by a
//! candidate already includes the overhead of the candidate itself.

use crate::geometry::DiskGeometry;
use crate::naming::truncate_name;
use crate::plan::{CandidateFile, DiskPlan, FileOperation};
use tracing::debug;

/// A disk being filled by the packing phase
#[derive(Debug)]
pub struct PackedDisk<'a> {
    files: Vec<&'a CandidateFile>,
    geometry: &'a DiskGeometry,
}

impl<'a> PackedDisk<'a> {
    pub fn new(geometry: &'a DiskGeometry) -> Self {
        PackedDisk {
            files: Vec::new(),
            geometry,
        }
    }

    /// Bytes of file data placed so far
    pub fn payload(&self) -> u64 {
        self.files.iter().map(|file| file.size).sum()
    }

    /// Overhead for the files on the disk plus the next one, plus their payload
    pub fn taken_space(&self) -> u64 {
        self.geometry
            .meta_space_per_file
            .saturating_mul(self.files.len() as u64 + 1)
            .saturating_add(self.payload())
    }

    /// Room left for one more file, or `None` once the disk is overcommitted
    pub fn free_space(&self) -> Option<u64> {
        self.geometry.usable_size().checked_sub(self.taken_space())
    }

    pub fn fits(&self, file: &CandidateFile) -> bool {
        self.free_space().is_some_and(|free| file.size <= free)
    }

    pub fn place(&mut self, file: &'a CandidateFile) {
        self.files.push(file);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Whole-file operations in placement order
    pub fn into_plan(self) -> DiskPlan {
        let max = self.geometry.max_output_name;
        self.files
            .into_iter()
            .map(|file| FileOperation::WholeFile {
                source: file.name.clone(),
                output_name: truncate_name(&file.name, max),
            })
            .collect::<Vec<_>>()
            .into()
    }
}

/// Pack `pool` (sorted by size descending) onto as many disks as it takes
///
/// Every disk starts with the largest remaining file, then the pool is
/// rescanned from its head for the first file that still fits, until none do.
pub fn pack_files(mut pool: Vec<&CandidateFile>, geometry: &DiskGeometry) -> Vec<DiskPlan> {
    let mut disks = Vec::new();

    while !pool.is_empty() {
        let mut disk = PackedDisk::new(geometry);
        disk.place(pool.remove(0));

        while let Some(index) = pool.iter().position(|file| disk.fits(file)) {
            disk.place(pool.remove(index));
        }

        debug!(
            "Closed packed disk {} with {} files, {} bytes",
            disks.len(),
            disk.len(),
            disk.payload()
        );
        disks.push(disk.into_plan());
    }

    disks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::USABLE_SIZE;

        const META: u64 = 2048;

    fn pack(files: &[CandidateFile]) -> Vec<DiskPlan> {
        pack_files(files.iter().collect(), &DiskGeometry::default())
    }

    fn names(disk: &DiskPlan) -> Vec<&str> {
        disk.iter().map(FileOperation::source_name).collect()
    }

    #[test]
    fn test_free_space_charges_next_file() {
        let geometry = DiskGeometry::default();
        let file = CandidateFile::new("a", 1000);
        let mut disk = PackedDisk::new(&geometry);

        assert!(disk.is_empty());
        assert_eq!(disk.free_space(), Some(USABLE_SIZE - META));
        disk.place(&file);
        assert!(!disk.is_empty());
        assert_eq!(disk.free_space(), Some(USABLE_SIZE - 2 * META - 1000));
    }

    #[test]
    fn test_prospective_overhead_decides_fit() {
        // After "big" is placed, exactly USABLE_SIZE - 2*META - big bytes are free.
        let big = USABLE_SIZE - 2 * META - 5000;
        let files = vec![
            CandidateFile::new("big", big),
            CandidateFile::new("over", 5001),
            CandidateFile::new("exact", 5000),
        ];

        let disks = pack(&files);
        assert_eq!(disks.len(), 2);
        assert_eq!(names(&disks[0]), vec!["big", "exact"]);
        assert_eq!(names(&disks[1]), vec!["over"]);
    }

    #[test]
    fn test_head_placed_unconditionally() {
        // A file of exactly USABLE_SIZE bytes overcommits the disk once placed.
        let files = vec![CandidateFile::new("full", USABLE_SIZE), CandidateFile::new("zero", 0)];

        let disks = pack(&files);
        assert_eq!(disks.len(), 2);
        assert_eq!(names(&disks[0]), vec!["full"]);
        assert_eq!(names(&disks[1]), vec!["zero"]);
    }

    #[test]
    fn test_zero_size_files_share_a_disk() {
        let files: Vec<_> = (0..5)
            .map(|i| CandidateFile::new(format!("empty{}", i), 0))
            .collect();

        let disks = pack(&files);
        assert_eq!(disks.len(), 1);
        assert_eq!(disks[0].len(), 5);
    }

    #[test]
    fn test_first_fit_rescans_from_head() {
        let files = vec![
            CandidateFile::new("a", 600_000),
            CandidateFile::new("b", 300_000),
            CandidateFile::new("c", 200_000),
            CandidateFile::new("d", 100_000),
            CandidateFile::new("e", 50_000),
        ];

        let disks = pack(&files);
        // With a, c and e placed, d no longer fits: 4 * 2048 + 950_000 > usable
        assert_eq!(names(&disks[0]), vec!["a", "c", "e"]);
        assert_eq!(names(&disks[1]), vec!["b", "d"]);
    }

    #[test]
    fn test_long_names_truncated() {
        let long = "n".repeat(45);
        let files = vec![CandidateFile::new(long.clone(), 10)];

        let disks = pack(&files);
        let op = &disks[0].operations()[0];
        assert_eq!(op.source_name(), long);
        assert_eq!(op.output_name(), "n".repeat(30));
        assert_eq!(op.start(), None);
    }
}
