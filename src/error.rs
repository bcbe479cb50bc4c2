pub type DynError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type Result<T> = std::result::Result<T, Error>;

/// Failures that end a listing run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing, unreadable or expired session.
    #[error("{0}")]
    Config(String),

    /// Connection, page fetch or current-user fetch failed.
    #[error("{context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: DynError,
    },

    /// Role lookup for a single account failed.
    #[error("Failed to get roles for user '{username}': {source}")]
    Resolution {
        username: String,
        #[source]
        source: DynError,
    },

    /// The search scope could not be determined.
    #[error("{0}")]
    Scope(String),

    #[error("can't write output: {0}")]
    Output(#[from] std::io::Error),

    /// A worker task panicked or was aborted.
    #[error("worker failed: {0}")]
    Worker(String),

    /// The server answered with a non-2xx status.
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn scope(msg: impl Into<String>) -> Self {
        Self::Scope(msg.into())
    }

    /// Status error for a failed response; an empty body is reported as such.
    pub fn status(status: u16, body: &str) -> Self {
        let body = body.trim();
        Self::Status {
            status,
            body: if body.is_empty() {
                "empty response body".to_string()
            } else {
                body.to_string()
            },
        }
    }

    pub fn transport(context: impl Into<String>, source: impl Into<DynError>) -> Self {
        Self::Transport {
            context: context.into(),
            source: source.into(),
        }
    }
}

/// Attach a human readable message to a foreign error, turning it into a transport failure.
pub trait Context<T> {
    fn with_transport<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E> Context<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_transport<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| Error::Transport {
            context: f(),
            source: Box::new(e),
        })
    }
}
