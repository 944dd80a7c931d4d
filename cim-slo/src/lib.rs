pub mod errors;
pub mod regexp;

pub type Result<T, E = errors::WithBacktrace> = core::result::Result<T, E>;
