pub type CmdResult<T> = plum::Result<(T, i32)>;

pub(crate) struct GlobalArgs {
    /// Explicit configuration file, if given.
    pub config: Option<String>,
    /// JSON envelope on stdout instead of human-readable lines.
    pub json: bool,
}

impl GlobalArgs {
    /// Load the configuration this invocation points at.
    pub fn load_config(&self) -> plum::Result<plum::config::LoadedConfig> {
        plum::config::load(self.config.as_deref())
    }
}

pub mod deploy;
pub mod server;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (plum::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Deploy(args) => dispatch!(args, global, deploy),
        crate::Commands::Server(args) => dispatch!(args, global, server),
    }
}
