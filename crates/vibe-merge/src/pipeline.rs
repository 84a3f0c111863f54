//! Merge orchestration.

use std::path::PathBuf;

use tracing::{debug, info};

use vibe_models::{MergeJob, MergeStage};
use vibe_store::StoreClient;

use crate::compose::build_composition;
use crate::error::{MergeError, MergeResult};
use crate::identity::assign_identifiers;
use crate::validate::validate_inputs;

/// The merge orchestrator: the only entry point the surrounding application
/// calls. One invocation is one job; jobs share no state, so any number of
/// pipelines may run in parallel without coordination.
#[derive(Clone)]
pub struct MergePipeline {
    store: StoreClient,
}

impl MergePipeline {
    /// Create a pipeline over a configured store client.
    pub fn new(store: StoreClient) -> Self {
        Self { store }
    }

    /// Merge the input files into one, returning the output path.
    ///
    /// Stages run linearly: validate, resolve kind, publish each input in
    /// order, compose, fetch. Any failure discards the whole job; there is
    /// no resume-from-checkpoint, and already-published resources are left
    /// in place remotely (republishing overwrites, so a re-run is safe).
    pub async fn merge(
        &self,
        inputs: &[PathBuf],
        output_path: Option<PathBuf>,
    ) -> MergeResult<PathBuf> {
        let validated = validate_inputs(inputs)?;
        let output_path =
            output_path.unwrap_or_else(|| default_output_path(&validated.extension));

        let mut job = MergeJob::new(
            validated.files.clone(),
            validated.kind,
            validated.extension.clone(),
            output_path,
        );
        job.advance(MergeStage::Validated);

        job.advance(MergeStage::KindResolved);
        info!(
            job_id = %job.id,
            stage = %job.stage,
            kind = %job.kind,
            extension = %job.extension,
            inputs = job.inputs.len(),
            output = %job.output_path.display(),
            "Merge job started"
        );

        let identifiers = assign_identifiers(&job.inputs);

        job.advance(MergeStage::Publishing);
        for (file, identifier) in job.inputs.iter().zip(&identifiers) {
            debug!(job_id = %job.id, file = %file.display(), identifier = %identifier, "Publishing input");
            let resource = self
                .store
                .publish(file, identifier)
                .await
                .map_err(|e| MergeError::publish(file.clone(), e))?;
            job.resources.push(resource);
        }

        let spec = build_composition(&job.resources, job.output_format());
        let locator = self.store.delivery_url(&spec);
        job.composition = Some(spec);
        job.advance(MergeStage::Composed);
        info!(job_id = %job.id, stage = %job.stage, locator = %locator, "Composition resolved");

        self.store
            .fetch_to_file(&locator, &job.output_path)
            .await
            .map_err(|e| MergeError::retrieval(e, retrieval_hint(&job)))?;
        job.advance(MergeStage::Fetched);

        job.advance(MergeStage::Done);
        info!(
            job_id = %job.id,
            stage = %job.stage,
            output = %job.output_path.display(),
            "Merge job done"
        );

        Ok(job.output_path)
    }
}

/// Default output path when the caller supplies none: `merged<ext>` in the
/// working directory.
pub fn default_output_path(extension: &str) -> PathBuf {
    PathBuf::from(format!("merged{extension}"))
}

/// For audio output formats, a failed retrieval is most often the caller's
/// service plan not covering the container; suggest retrying with mp3.
fn retrieval_hint(job: &MergeJob) -> Option<String> {
    if job.kind.is_audio() {
        Some(format!(
            "the store plan may not support {} output; try converting the inputs and merging as mp3",
            job.extension
        ))
    } else {
        None
    }
}
