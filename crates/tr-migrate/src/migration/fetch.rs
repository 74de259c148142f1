use crate::{Migration, MigrationError, MigrationResult};

use tr_core::{ClientResult, EntityKind};

impl Migration {
    /// Run the source and target fetches concurrently. Either failing fails
    /// the phase.
    pub(crate) async fn fetch_both<T, S, D>(
        &self,
        kind: EntityKind,
        source: S,
        target: D,
    ) -> MigrationResult<(Vec<T>, Vec<T>)>
    where
        S: Future<Output = ClientResult<Vec<T>>>,
        D: Future<Output = ClientResult<Vec<T>>>,
    {
        let (source, target) = tokio::join!(source, target);

        let source = source.map_err(|e| {
            MigrationError::fetch(kind, "source", self.src_project, e.to_string())
        })?;
        let target = target.map_err(|e| {
            MigrationError::fetch(kind, "target", self.dst_project, e.to_string())
        })?;

        log::debug!(
            "Fetched {} source and {} target {kind}",
            source.len(),
            target.len()
        );
        Ok((source, target))
    }

    /// Like [`Migration::fetch_both`], but a single failing side degrades to
    /// an empty list with a warning. Only a failure on both sides is an error.
    pub(crate) fn tolerate_partial<T>(
        &self,
        kind: EntityKind,
        source: ClientResult<Vec<T>>,
        target: ClientResult<Vec<T>>,
    ) -> MigrationResult<(Vec<T>, Vec<T>)> {
        match (source, target) {
            (Ok(source), Ok(target)) => Ok((source, target)),
            (Ok(source), Err(e)) => {
                log::warn!(
                    "Fetching {kind} from target project {} failed, continuing with source only: {e}",
                    self.dst_project
                );
                Ok((source, Vec::new()))
            }
            (Err(e), Ok(target)) => {
                log::warn!(
                    "Fetching {kind} from source project {} failed, continuing with target only: {e}",
                    self.src_project
                );
                Ok((Vec::new(), target))
            }
            (Err(source_err), Err(target_err)) => Err(MigrationError::fetch_both(
                kind,
                source_err.to_string(),
                target_err.to_string(),
            )),
        }
    }
}
