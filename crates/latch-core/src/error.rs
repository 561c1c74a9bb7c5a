use latch_dom::live::PatchError;
use latch_dom::structural::CompareError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("dependency comparison failed: {0}")]
    Compare(#[from] CompareError),
    #[error("patch application failed: {0}")]
    Patch(#[from] PatchError),
    #[error(transparent)]
    Host(#[from] anyhow::Error),
}
