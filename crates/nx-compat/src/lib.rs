pub mod cache;
pub mod env;
pub mod errors;
pub mod executor_context;
pub mod executor_invoker;
pub mod executor_options;
pub mod executor_resolver;
pub mod fs;
pub mod loaders;
pub mod logging;
pub mod moon;
pub mod nx;
pub mod nx_compat;
pub mod nx_converter;
pub mod package_resolver;

pub use errors::NxCompatError;
pub use nx_compat::NxCompat;
