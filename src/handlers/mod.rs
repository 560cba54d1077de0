pub mod healthz;
pub mod todo;
