//! # Interactive Store Console
//!
//! An interactive shell for browsing and manipulating a hierarchical
//! namespace in a pluggable backing store.
//!
//! ## Design
//!
//! - All path arithmetic lives in `fs_path`; handlers resolve every
//!   operand against the session's working directory before touching a
//!   backend
//! - Backends hide behind the `fs_store::FileStore` capability trait;
//!   copies run through `copy_engine` whichever pair of backends is
//!   involved
//! - One command at a time: the loop blocks until a command finishes
//!   before prompting again
//! - Command failures become one line of output; the session survives

pub mod commands;
pub mod config;
pub mod interactive;
pub mod session;

pub use commands::{parse_command, Command, CommandHandler, CommandOutcome, ConsoleError, Parsed};
pub use config::{ConfigError, ConsoleConfig, LogLevelSetting};
pub use session::{Session, SessionError};

use console_log::{LogLevel, LogSink, Logger, StderrSink};
use fs_store::{InProcessTransport, MemoryStore, RemoteStore};

/// Wires a ready-to-run handler from configuration
///
/// The managed store engine and the secondary store's network client
/// live outside this workspace; the console wires their in-memory
/// stand-ins so every command path is exercisable end to end.
pub fn bootstrap(config: &ConsoleConfig) -> Result<CommandHandler<MemoryStore>, SessionError> {
    let mut store = MemoryStore::new();
    let session = Session::bootstrap(&config.home_root, &config.resolved_user(), &mut store)?;
    let logger = Logger::new(
        LogLevel::from(config.log_level),
        Box::new(StderrSink) as Box<dyn LogSink>,
    );
    let mut handler = CommandHandler::new(store, session, logger);
    if let Some(endpoint) = &config.remote_endpoint {
        let secondary = RemoteStore::new(InProcessTransport::new(MemoryStore::new()));
        handler.attach_remote(endpoint.clone(), Box::new(secondary));
    }
    Ok(handler)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_seeds_home_dir() {
        let mut config = ConsoleConfig::default();
        config.user = Some("me".to_string());

        let handler = bootstrap(&config).unwrap();
        assert_eq!(handler.session().working_dir(), "/usr/me");
    }

    #[test]
    fn test_bootstrap_attaches_remote_from_config() {
        let mut config = ConsoleConfig::default();
        config.user = Some("me".to_string());
        config.remote_endpoint = Some("node1:7000".to_string());

        let mut handler = bootstrap(&config).unwrap();
        let outcome = handler.execute("copytoremote missing.txt store://node1:7000/data");
        match outcome {
            CommandOutcome::Output(lines) => {
                // The copy reaches the engine and fails on the missing
                // source, proving the remote link is wired.
                assert_eq!(lines.len(), 1);
                assert!(lines[0].contains("does not exist"));
            }
            other => panic!("expected output, got {:?}", other),
        }
    }
}
