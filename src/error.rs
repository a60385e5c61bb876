use failure::Fail;

#[derive(Debug, Fail)]
pub enum TracerError {
    #[fail(display = "invalid image size {}x{}, both dimensions must be positive", width, height)]
    InvalidImageSize { width: u32, height: u32 },

    #[fail(display = "an image needs at least one band")]
    NoBands,

    #[fail(display = "a per-pixel sample limit must be at least 1")]
    InvalidSampleLimit,

    #[fail(display = "can't create a thread pool with 0 threads")]
    NoThreads,

    #[fail(display = "failed to spawn worker thread {}: {}", index, cause)]
    ThreadSpawn {
        index: usize,
        #[cause]
        cause: std::io::Error,
    },

    #[fail(display = "renderer has already been started")]
    AlreadyStarted,

    #[fail(display = "invalid value {:?} for {}", value, flag)]
    InvalidArgument { flag: String, value: String },

    #[fail(display = "missing value for {}", flag)]
    MissingArgument { flag: String },

    #[fail(display = "unknown argument {}", _0)]
    UnknownArgument(String),
}
