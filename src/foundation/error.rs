/// Convenience result type used across the crate.
pub type PhotoResult<T> = Result<T, PhotoError>;

/// Top-level error taxonomy used by the public entry points.
#[derive(thiserror::Error, Debug)]
pub enum PhotoError {
    /// A mandatory parameter (for example the text of a text layer) is missing or empty.
    #[error("params required: {0}")]
    ParamsRequired(String),

    /// A color, shadow, or other style field could not be parsed.
    #[error("style parse error: {0}")]
    StyleParse(String),

    /// A source image could not be resolved, fetched, or decoded.
    #[error("image load failed: {0}")]
    ImageLoadFailed(String),

    /// Layout, paint, or drawing failed while rendering a layer.
    #[error("render error: {context}")]
    Render {
        /// What was being rendered when the failure happened.
        context: String,
        /// The underlying cause.
        #[source]
        source: anyhow::Error,
    },

    /// The finished surface could not be encoded or persisted.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PhotoError {
    /// Build a [`PhotoError::ParamsRequired`] value.
    pub fn params_required(msg: impl Into<String>) -> Self {
        Self::ParamsRequired(msg.into())
    }

    /// Build a [`PhotoError::StyleParse`] value.
    pub fn style_parse(msg: impl Into<String>) -> Self {
        Self::StyleParse(msg.into())
    }

    /// Build a [`PhotoError::ImageLoadFailed`] value.
    pub fn image_load(msg: impl Into<String>) -> Self {
        Self::ImageLoadFailed(msg.into())
    }

    /// Build a [`PhotoError::Render`] value wrapping `source`.
    pub fn render(context: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Render {
            context: context.into(),
            source: source.into(),
        }
    }

    /// Build a [`PhotoError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
