//! Pagination assembler.
//!
//! Pure and deterministic: partitions an ordered chapter sequence into
//! contiguous fixed-size runs for output, carrying a global chapter
//! numbering across runs. No I/O happens here.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::ChapterRecord;

/// A contiguous run of chapters bundled for a single output artifact.
///
/// `start` and `end` are global 1-based chapter numbers, not indexes into
/// the group: numbering continues from the configured starting number, so
/// group *k* starts where group *k-1* ended plus one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    /// Chapters in this run, in reading order.
    pub chapters: Vec<ChapterRecord>,

    /// Global number of the first chapter in the run.
    pub start: usize,

    /// Global number of the last chapter in the run.
    pub end: usize,
}

/// Partition chapters into groups of `group_size`.
///
/// The last group may be shorter; no group is ever empty. Global numbering
/// begins at `start_number`. A `group_size` below 1 is rejected with
/// [`Error::InvalidGroupSize`] rather than silently coerced.
///
/// # Example
///
/// ```rust
/// use chaptermill::{paginate, ChapterRecord, ChapterRef};
///
/// let chapters: Vec<ChapterRecord> = (1..=5)
///     .map(|n| {
///         ChapterRecord::from(ChapterRef {
///             name: format!("Chapter {n}"),
///             url: format!("https://example.com/c/{n}"),
///         })
///     })
///     .collect();
///
/// let groups = paginate(&chapters, 2, 1)?;
/// assert_eq!(groups.len(), 3);
/// assert_eq!((groups[2].start, groups[2].end), (5, 5));
/// # Ok::<(), chaptermill::Error>(())
/// ```
pub fn paginate(
    chapters: &[ChapterRecord],
    group_size: usize,
    start_number: usize,
) -> Result<Vec<Group>> {
    if group_size < 1 {
        return Err(Error::InvalidGroupSize(group_size));
    }

    let mut groups = Vec::with_capacity(chapters.len().div_ceil(group_size));

    for (index, run) in chapters.chunks(group_size).enumerate() {
        let start = start_number + index * group_size;
        groups.push(Group {
            chapters: run.to_vec(),
            start,
            end: start + run.len() - 1,
        });
    }

    Ok(groups)
}
