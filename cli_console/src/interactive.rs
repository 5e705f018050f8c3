//! Interactive loop
//!
//! Reads lines, dispatches them, prints the result, until end of input
//! or a quit command. Input and output are passed in explicitly so the
//! loop can run against captured buffers in tests; line editing and tab
//! completion stay outside this crate.

use std::io::{self, BufRead, Write};

use fs_store::FileStore;

use crate::commands::{CommandHandler, CommandOutcome};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[1;1H";

/// Runs the console until end of input or `quit`
pub fn run<S, R, W>(handler: &mut CommandHandler<S>, input: R, output: &mut W) -> io::Result<()>
where
    S: FileStore,
    R: BufRead,
    W: Write,
{
    writeln!(output, "Welcome to the store console!")?;
    writeln!(output, "Type 'help' for help. Type 'quit' or 'exit' to quit.")?;

    let mut input = input;
    loop {
        write!(output, "fs@ {}>", handler.session().working_dir())?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        match handler.execute(line.trim()) {
            CommandOutcome::Quit => break,
            CommandOutcome::Clear => {
                write!(output, "{}", CLEAR_SCREEN)?;
                output.flush()?;
            }
            CommandOutcome::Output(lines) => {
                for line in lines {
                    writeln!(output, "{}", line)?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use console_log::{LogLevel, LogSink, Logger, MemorySink};
    use fs_store::MemoryStore;
    use crate::session::Session;

    fn test_handler() -> CommandHandler<MemoryStore> {
        let mut store = MemoryStore::new();
        let session = Session::bootstrap("/usr", "me", &mut store).unwrap();
        let logger = Logger::new(LogLevel::Error, Box::new(MemorySink::new()) as Box<dyn LogSink>);
        CommandHandler::new(store, session, logger)
    }

    fn run_script(script: &str) -> String {
        let mut handler = test_handler();
        let mut output = Vec::new();
        run(&mut handler, script.as_bytes(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_banner_and_prompt() {
        let transcript = run_script("");
        assert!(transcript.starts_with("Welcome to the store console!\n"));
        assert!(transcript.contains("fs@ /usr/me>"));
    }

    #[test]
    fn test_quit_stops_loop() {
        let transcript = run_script("quit\npwd\n");
        // Nothing after quit runs.
        assert!(!transcript.contains("/usr/me\n"));
    }

    #[test]
    fn test_commands_round_trip() {
        let transcript = run_script("mkdir docs\ncd docs\npwd\nexit\n");
        assert!(transcript.contains("/usr/me/docs\n"));
        assert!(transcript.contains("fs@ /usr/me/docs>"));
    }

    #[test]
    fn test_prompt_follows_working_dir() {
        let transcript = run_script("mkdir a\ncd a\ncd ..\n");
        assert!(transcript.contains("fs@ /usr/me/a>"));
        assert!(transcript.ends_with("fs@ /usr/me>"));
    }

    #[test]
    fn test_clear_emits_escape() {
        let transcript = run_script("clear\n");
        assert!(transcript.contains(CLEAR_SCREEN));
    }
}
