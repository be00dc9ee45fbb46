//! Splitting of files larger than one disk
//!
//! Chunk `i` covers `[i * usable, min((i + 1) * usable, size))` and lands
//! alone on its own disk.

use crate::geometry::DiskGeometry;
use crate::naming::chunk_output_name;
use crate::plan::{CandidateFile, DiskPlan, FileOperation};
use tracing::debug;

/// Number of chunks needed for `size` bytes
pub fn chunk_count(size: u64, usable: u64) -> u64 {
    size.div_ceil(usable)
}

/// One single-chunk disk per piece of `file`, in chunk order
pub fn split_file(file: &CandidateFile, geometry: &DiskGeometry) -> Vec<DiskPlan> {
    // An unvalidated geometry can report zero usable bytes.
    let usable = geometry.usable_size().max(1);
    let count = chunk_count(file.size, usable);

    debug!(
        "Splitting {} ({} bytes) into {} chunks of up to {} bytes",
        file.name, file.size, count, usable
    );

    (0..count)
        .map(|index| {
            let start = index * usable;
            let length = usable.min(file.size - start);
            DiskPlan::from(vec![FileOperation::RangeChunk {
                source: file.name.clone(),
                start,
                length,
                output_name: chunk_output_name(&file.name, index, geometry.max_output_name),
            }])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_count() {
        assert_eq!(chunk_count(885761, 885760), 2);
        assert_eq!(chunk_count(885760 * 3, 885760), 3);
        assert_eq!(chunk_count(885760 * 3 + 1, 885760), 4);
    }

    #[test]
    fn test_split_ranges() {
        let file = CandidateFile::new("a", 900000);
        let disks = split_file(&file, &DiskGeometry::default());

        assert_eq!(disks.len(), 2);
        let first = &disks[0].operations()[0];
        let second = &disks[1].operations()[0];

        assert_eq!((first.start(), first.length()), (Some(0), Some(885760)));
        assert_eq!((second.start(), second.length()), (Some(885760), Some(14240)));
        assert_eq!(first.output_name(), "a.001");
        assert_eq!(second.output_name(), "a.002");
    }

    #[test]
    fn test_exact_multiple_has_full_last_chunk() {
        let file = CandidateFile::new("iso", 885760 * 2);
        let disks = split_file(&file, &DiskGeometry::default());

        assert_eq!(disks.len(), 2);
        assert_eq!(disks[1].operations()[0].length(), Some(885760));
    }

    #[test]
    fn test_every_disk_holds_one_chunk() {
        let file = CandidateFile::new("huge", 10_000_000);
        let disks = split_file(&file, &DiskGeometry::default());

        assert_eq!(disks.len(), 12);
        assert!(disks.iter().all(|disk| disk.len() == 1 && disk.is_split()));
        assert_eq!(disks[11].operations()[0].output_name(), "huge.012");
    }
}
