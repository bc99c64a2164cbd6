use thiserror::Error;

/// Failures while building the scene for a fresh graphics context.
///
/// All of these are fatal for the affected resource; there is no retry. The
/// caller logs the error and leaves the surface cleared to black.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to compile {stage} shader: {log}")]
    ShaderCompile { stage: &'static str, log: String },

    #[error("failed to link shader program: {log}")]
    ProgramLink { log: String },

    #[error("failed to read asset {id:?}: {source}")]
    Asset {
        id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image asset {id:?}: {source}")]
    ImageDecode {
        id: String,
        #[source]
        source: image::ImageError,
    },
}
