//! Raw-mode interactive shell: tab-completing command line, history, and
//! a small `--flag value` grammar for submitting tasks without the HTTP
//! ingress. Ported from the original's `shell` package.

pub mod ansi;
pub mod command;
pub mod history;
pub mod shell;
pub mod tokens;

use std::sync::Arc;

use taskhive_ingress::Backend;

pub use command::{parse_args, parse_task_from_cmd, split_command_line, ParseTaskError};
pub use history::RingBuffer;
pub use shell::{Shell, ShellError};
pub use tokens::default_token_groups;

/// Runs the shell with the default command grammar, matching the original's
/// `StartInteractiveShell`. `backend` is the same ingress backend the HTTP
/// and gRPC surfaces use, and `runtime` lets the blocking read loop bridge
/// into it on ENTER.
pub fn start_interactive_shell(
    backend: Arc<dyn Backend>,
    runtime: tokio::runtime::Handle,
) -> Result<(), ShellError> {
    let mut shell = Shell::new(backend, runtime);
    shell.run(&default_token_groups())
}
