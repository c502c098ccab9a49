use crate::cache::DataCache;
use crate::env::AdapterEnv;
use crate::errors::NxCompatError;
use crate::executor_context::build_executor_context;
use crate::executor_invoker::{ExecutorInvoker, NodeExecutorInvoker};
use crate::executor_options::{apply_schema_defaults, parse_executor_args};
use crate::executor_resolver::{ExecutorIdentifier, ExecutorResolver, PackageExecutorResolver};
use crate::fs::{FileSystem, RealFileSystem};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Everything needed to run an Nx executor within a moon task.
pub struct NxCompat {
    pub cache: DataCache,
    pub env: AdapterEnv,
    pub fs: Arc<dyn FileSystem>,
    pub invoker: Box<dyn ExecutorInvoker>,
    pub resolver: Box<dyn ExecutorResolver>,
}

impl NxCompat {
    pub fn new(env: AdapterEnv, working_dir: &Path) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

        Self {
            cache: DataCache::new(),
            invoker: Box::new(NodeExecutorInvoker::new(&env.node_bin, &env.working_dir)),
            resolver: Box::new(PackageExecutorResolver::new(Arc::clone(&fs), working_dir)),
            env,
            fs,
        }
    }

    /// Resolve the executor, build its context, run it,
    /// and return the process exit code.
    pub async fn execute(&self, executor: &str, args: &[String]) -> Result<u8, NxCompatError> {
        let identifier = ExecutorIdentifier::parse(executor)?;
        let resolved = self.resolver.resolve(&identifier)?;

        let mut options = parse_executor_args(args);

        if let Some(schema_path) = &resolved.schema_path {
            apply_schema_defaults(self.fs.as_ref(), schema_path, &mut options)?;
        }

        let context = build_executor_context(&self.cache, &self.env, executor, &options).await?;

        // The export is only checked once imported by the invoker. Importing
        // it earlier would load the module (and run its side effects) twice.
        let outcome = self.invoker.invoke(&resolved, &options, &context).await?;
        let exit_code = if outcome.is_success() { 0 } else { 1 };

        debug!(executor, exit_code, "Executor finished");

        Ok(exit_code)
    }
}
