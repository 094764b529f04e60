use thiserror::Error;

/// Errors raised while staging files, before any network activity.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("\"{name}\" is larger than the 50 MB upload limit")]
    TooLarge { name: String },

    #[error("could not read \"{name}\": {source}")]
    Unreadable {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the two-stage pipeline. All of them abort the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No API endpoint configured. Set DOCREPORT_API_BASE or fill in the endpoint field.")]
    MissingEndpoint,

    #[error("{stage} request failed with status {status}: {detail}")]
    Upstream {
        stage: &'static str,
        status: u16,
        detail: String,
    },

    #[error("OCR returned no usable text for \"{file}\"")]
    EmptyResult { file: String },

    #[error("{stage} returned invalid JSON: {source}")]
    InvalidJson {
        stage: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}
