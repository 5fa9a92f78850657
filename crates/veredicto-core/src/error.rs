use thiserror::Error;
use veredicto_model::ModelError;

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("La afirmación está vacía.")]
    EmptyClaim,

    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}
