//! Garbage Collection
//!
//! Rebuilds a store from its valid entries only, dropping tombstoned and
//! orphaned bytes.
//!
//! ## Procedure
//! 1. Open the source, create the destination with the same config
//! 2. For every valid source slot (ascending): read the original, insert it
//!    into the destination under the same id, then materialize whatever
//!    derived resolutions the source already had
//! 3. Close both and rename the destination over the source
//!
//! The destination runs its own dedup, so which entry ends up as the
//! reference for shared content depends on destination insertion order.
//! On any failure before step 3 the source is left as it was and the
//! partial destination file stays on disk.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::codec::{ImageCodec, RasterCodec};
use crate::error::{ImgStoreError, Result};
use crate::layout::Resolution;
use crate::store::{ImgStore, OpenMode};

/// Outcome of a compaction run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactStats {
    /// Number of valid entries carried over
    pub entries_copied: u32,

    /// Source file size before compaction
    pub bytes_before: u64,

    /// Size of the rebuilt file
    pub bytes_after: u64,
}

/// Compact the store at `path`, using `tmp_path` for the rebuilt copy
pub fn compact(path: impl AsRef<Path>, tmp_path: impl AsRef<Path>) -> Result<CompactStats> {
    compact_with_codec(path, tmp_path, Arc::new(RasterCodec))
}

/// Same as [`compact`] with an explicit codec for re-materialization
pub fn compact_with_codec(
    path: impl AsRef<Path>,
    tmp_path: impl AsRef<Path>,
    codec: Arc<dyn ImageCodec>,
) -> Result<CompactStats> {
    let (path, tmp_path) = (path.as_ref(), tmp_path.as_ref());
    if path == tmp_path {
        return Err(ImgStoreError::InvalidArgument(
            "temporary path must differ from store path".to_string(),
        ));
    }

    let mut source = ImgStore::open(path, OpenMode::ReadWrite)?.with_codec(Arc::clone(&codec));
    let bytes_before = source.file_len()?;

    let config = source.header().config();
    let mut dest = ImgStore::create(tmp_path, &config)?.with_codec(codec);

    let copied = copy_valid_entries(&mut source, &mut dest);

    // Release both handles before touching the directory entries
    let bytes_after = dest.file_len();
    source.close();
    dest.close();

    let entries_copied = match copied {
        Ok(n) => n,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                tmp = %tmp_path.display(),
                error = %e,
                "compaction aborted, source left untouched"
            );
            return Err(e);
        }
    };
    let bytes_after = bytes_after?;

    fs::rename(tmp_path, path)?;

    tracing::info!(
        path = %path.display(),
        entries_copied,
        bytes_before,
        bytes_after,
        "compaction complete"
    );

    Ok(CompactStats {
        entries_copied,
        bytes_before,
        bytes_after,
    })
}

fn copy_valid_entries(source: &mut ImgStore, dest: &mut ImgStore) -> Result<u32> {
    let mut copied = 0;

    for index in 0..source.slots().len() {
        let slot = &source.slots()[index];
        if !slot.is_valid() {
            continue;
        }

        let img_id = slot.img_id.clone();
        let derived: Vec<Resolution> = Resolution::DERIVED
            .into_iter()
            .filter(|&res| slot.has(res))
            .collect();

        let original = source.read(&img_id, Resolution::Original)?;
        let dest_index = dest.insert(&original, &img_id)?;

        for res in derived {
            dest.materialize(res, dest_index)?;
        }
        copied += 1;
    }

    Ok(copied)
}
