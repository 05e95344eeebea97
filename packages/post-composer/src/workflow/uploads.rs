use std::path::PathBuf;

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::debug;

use super::WorkflowStep;
use crate::error::{PublishError, Result};
use crate::traits::repository::ContentRepository;
use crate::types::EntityId;

/// Upload `paths` with at most `concurrency` uploads in flight.
///
/// Ids come back in input order regardless of completion order. The first
/// failure ends the stream; uploads still in flight are dropped and whatever
/// already reached the repository stays there.
pub(crate) async fn upload_in_order<R>(
    repo: &R,
    paths: &[PathBuf],
    concurrency: usize,
) -> Result<Vec<EntityId>>
where
    R: ContentRepository + ?Sized,
{
    stream::iter(paths.iter().enumerate())
        .map(|(index, path)| async move {
            debug!(index, path = %path.display(), "Uploading content image");
            repo.upload_asset(path)
                .await
                .map_err(|source| PublishError::Upload {
                    step: WorkflowStep::UploadContentImages,
                    path: path.clone(),
                    source,
                })
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}
