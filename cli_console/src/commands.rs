//! Command parsing and dispatch
//!
//! This module turns an input line into a typed command and runs it
//! against the session and the attached stores. Handler failures are
//! recovered here and reported as a single line of output; the session
//! itself never terminates because of them.

use std::io::Read;

use console_log::{LogEntry, LogLevel, LogSink, Logger};
use copy_engine::{copy_tree, CopyError, CopyOutcome};
use fs_path::{PathError, PathResolver};
use fs_store::{FileStore, LocalStore, StoreError, StoreUri};
use thiserror::Error;

use crate::session::{Session, SessionError};

/// Errors a command can fail with
///
/// Everything here is recovered at the dispatch boundary and shown to
/// the user as one line.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Path resolution or validation failed
    #[error(transparent)]
    Path(#[from] PathError),

    /// A store operation failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A copy aborted
    #[error(transparent)]
    Copy(#[from] CopyError),

    /// A session operation failed
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// A parsed console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ls(Vec<String>),
    Mkdir(Vec<String>),
    CopyFromLocal { source: String, dest: String },
    CopyToLocal { source: String, dest: String },
    CopyFromRemote { source: String, dest: String },
    CopyToRemote { source: String, dest: String },
    NewFile { path: String, content: String },
    Rm(Vec<String>),
    Rmr(Vec<String>),
    Cat(Vec<String>),
    Pwd,
    Cd(String),
    Touch(Vec<String>),
    Help,
    Clear,
    Quit,
}

impl Command {
    /// Returns the command's name as typed
    pub fn name(&self) -> &'static str {
        match self {
            Command::Ls(_) => "ls",
            Command::Mkdir(_) => "mkdir",
            Command::CopyFromLocal { .. } => "copyfromlocal",
            Command::CopyToLocal { .. } => "copytolocal",
            Command::CopyFromRemote { .. } => "copyfromremote",
            Command::CopyToRemote { .. } => "copytoremote",
            Command::NewFile { .. } => "newfile",
            Command::Rm(_) => "rm",
            Command::Rmr(_) => "rmr",
            Command::Cat(_) => "cat",
            Command::Pwd => "pwd",
            Command::Cd(_) => "cd",
            Command::Touch(_) => "touch",
            Command::Help => "help",
            Command::Clear => "clear",
            Command::Quit => "quit",
        }
    }
}

/// Result of tokenizing one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    /// A well-formed command
    Command(Command),
    /// Right command, wrong operands
    Usage(&'static str),
    /// Not a command at all
    Unknown(String),
    /// Blank line
    Empty,
}

fn pair(
    args: Vec<String>,
    usage: &'static str,
    build: impl FnOnce(String, String) -> Command,
) -> Parsed {
    match <[String; 2]>::try_from(args) {
        Ok([source, dest]) => Parsed::Command(build(source, dest)),
        Err(_) => Parsed::Usage(usage),
    }
}

fn at_least_one(
    args: Vec<String>,
    usage: &'static str,
    build: impl FnOnce(Vec<String>) -> Command,
) -> Parsed {
    if args.is_empty() {
        Parsed::Usage(usage)
    } else {
        Parsed::Command(build(args))
    }
}

/// Tokenizes one input line into a command
///
/// Commands are matched case-insensitively. Tokens are split on
/// whitespace; there is no quoting.
pub fn parse_command(line: &str) -> Parsed {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(&cmd) = tokens.first() else {
        return Parsed::Empty;
    };
    let args: Vec<String> = tokens[1..].iter().map(|s| s.to_string()).collect();

    match cmd.to_ascii_lowercase().as_str() {
        "ls" => Parsed::Command(Command::Ls(args)),
        "mkdir" => at_least_one(args, "Usage: mkdir <path>...", Command::Mkdir),
        "copyfromlocal" => pair(args, "Usage: copyfromlocal <source> <dest>", |source, dest| {
            Command::CopyFromLocal { source, dest }
        }),
        "copytolocal" => pair(args, "Usage: copytolocal <source> <dest>", |source, dest| {
            Command::CopyToLocal { source, dest }
        }),
        "copyfromremote" => pair(args, "Usage: copyfromremote <uri> <dest>", |source, dest| {
            Command::CopyFromRemote { source, dest }
        }),
        "copytoremote" => pair(args, "Usage: copytoremote <source> <uri>", |source, dest| {
            Command::CopyToRemote { source, dest }
        }),
        "newfile" => {
            if args.len() < 2 {
                Parsed::Usage("Usage: newfile <file> <content>")
            } else {
                Parsed::Command(Command::NewFile {
                    path: args[0].clone(),
                    content: args[1..].join(" "),
                })
            }
        }
        "rm" => at_least_one(args, "Usage: rm <file | folder>...", Command::Rm),
        "rmr" => at_least_one(args, "Usage: rmr <file | folder>...", Command::Rmr),
        "cat" => at_least_one(args, "Usage: cat <file>...", Command::Cat),
        "pwd" => Parsed::Command(Command::Pwd),
        "cd" => match <[String; 1]>::try_from(args) {
            Ok([folder]) => Parsed::Command(Command::Cd(folder)),
            Err(_) => Parsed::Usage("Usage: cd <folder>"),
        },
        "touch" => at_least_one(args, "Usage: touch <file>...", Command::Touch),
        "help" => Parsed::Command(Command::Help),
        "clear" => Parsed::Command(Command::Clear),
        "quit" | "exit" => Parsed::Command(Command::Quit),
        _ => Parsed::Unknown(cmd.to_string()),
    }
}

/// What the interactive loop should do after one line
#[derive(Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Print these lines and prompt again
    Output(Vec<String>),
    /// Clear the screen
    Clear,
    /// Leave the loop
    Quit,
}

struct RemoteLink {
    endpoint: String,
    store: Box<dyn FileStore>,
}

/// Command handler over the session and the attached stores
pub struct CommandHandler<S: FileStore> {
    store: S,
    local: LocalStore,
    remote: Option<RemoteLink>,
    session: Session,
    logger: Logger<Box<dyn LogSink>>,
}

impl<S: FileStore> CommandHandler<S> {
    /// Creates a handler over a managed store and a session
    pub fn new(store: S, session: Session, logger: Logger<Box<dyn LogSink>>) -> Self {
        Self {
            store,
            local: LocalStore::new(),
            remote: None,
            session,
            logger,
        }
    }

    /// Attaches the secondary store client for the given endpoint
    pub fn attach_remote(&mut self, endpoint: impl Into<String>, store: Box<dyn FileStore>) {
        self.remote = Some(RemoteLink {
            endpoint: endpoint.into(),
            store,
        });
    }

    /// Returns the session
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Returns the managed store
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Runs one input line and folds any failure into output
    pub fn execute(&mut self, line: &str) -> CommandOutcome {
        match parse_command(line) {
            Parsed::Empty => CommandOutcome::Output(Vec::new()),
            Parsed::Usage(usage) => CommandOutcome::Output(vec![usage.to_string()]),
            Parsed::Unknown(cmd) => {
                CommandOutcome::Output(vec![format!("Can not recognize command '{}'", cmd)])
            }
            Parsed::Command(Command::Clear) => CommandOutcome::Clear,
            Parsed::Command(Command::Quit) => CommandOutcome::Quit,
            Parsed::Command(command) => {
                let name = command.name();
                self.logger
                    .log(LogEntry::new(LogLevel::Debug, "dispatch").with_command(name));
                match self.run(command) {
                    Ok(lines) => CommandOutcome::Output(lines),
                    Err(error) => {
                        self.logger.log(
                            LogEntry::new(LogLevel::Warn, error.to_string()).with_command(name),
                        );
                        CommandOutcome::Output(vec![format!("{}: {}", name, error)])
                    }
                }
            }
        }
    }

    fn run(&mut self, command: Command) -> Result<Vec<String>, ConsoleError> {
        match command {
            Command::Ls(args) => self.ls(args),
            Command::Mkdir(args) => self.mkdir(args),
            Command::CopyFromLocal { source, dest } => self.copy_from_local(source, dest),
            Command::CopyToLocal { source, dest } => self.copy_to_local(source, dest),
            Command::CopyFromRemote { source, dest } => self.copy_from_remote(source, dest),
            Command::CopyToRemote { source, dest } => self.copy_to_remote(source, dest),
            Command::NewFile { path, content } => self.newfile(path, content),
            Command::Rm(args) => self.rm(args),
            Command::Rmr(args) => self.rmr(args),
            Command::Cat(args) => self.cat(args),
            Command::Pwd => Ok(vec![self.session.working_dir().to_string()]),
            Command::Cd(arg) => self.cd(arg),
            Command::Touch(args) => self.touch(args),
            Command::Help => Ok(help_lines()),
            // Handled in execute() before dispatch.
            Command::Clear | Command::Quit => Ok(Vec::new()),
        }
    }

    fn ls(&mut self, args: Vec<String>) -> Result<Vec<String>, ConsoleError> {
        let mut targets = Vec::new();
        if args.is_empty() {
            targets.push(self.session.resolve(".")?);
        } else {
            for arg in &args {
                targets.push(self.session.resolve(arg)?);
            }
        }

        let mut lines = Vec::new();
        for target in targets {
            PathResolver::validate_dir_path(&target)?;
            let entries = self.store.list(&target)?;
            lines.push(format!("Found {} items", entries.len()));
            for entry in entries {
                lines.push(entry.to_string());
            }
        }
        Ok(lines)
    }

    fn mkdir(&mut self, args: Vec<String>) -> Result<Vec<String>, ConsoleError> {
        let mut lines = Vec::new();
        for arg in &args {
            let path = self.session.resolve(arg)?;
            PathResolver::validate_dir_path(&path)?;
            if self.store.exists(&path)? {
                lines.push(format!("Path already exists: {}", arg));
                continue;
            }
            self.store.mkdir(&path)?;
        }
        Ok(lines)
    }

    fn cd(&mut self, arg: String) -> Result<Vec<String>, ConsoleError> {
        match self.session.change_dir(&arg, &mut self.store) {
            Ok(()) => Ok(Vec::new()),
            Err(SessionError::NoSuchFolder(_)) => {
                Ok(vec![format!("cd {} : No such folder", arg)])
            }
            Err(error) => Err(error.into()),
        }
    }

    fn touch(&mut self, args: Vec<String>) -> Result<Vec<String>, ConsoleError> {
        let mut lines = Vec::new();
        for arg in &args {
            let path = self.session.resolve(arg)?;
            PathResolver::validate_file_path(&path)?;
            if self.store.exists_dir(&path)? {
                lines.push(format!("Destination path is a folder: {}", arg));
                continue;
            }
            self.store.touch_file(&path)?;
        }
        Ok(lines)
    }

    fn newfile(&mut self, path: String, content: String) -> Result<Vec<String>, ConsoleError> {
        let path = self.session.resolve(&path)?;
        PathResolver::validate_file_path(&path)?;
        if self.store.exists_dir(&path)? {
            return Ok(vec!["Destination path is a folder".to_string()]);
        }
        self.store.create_file_bytes(&path, content.as_bytes())?;
        Ok(Vec::new())
    }

    fn cat(&mut self, args: Vec<String>) -> Result<Vec<String>, ConsoleError> {
        let mut lines = Vec::new();
        for arg in &args {
            let path = self.session.resolve(arg)?;
            PathResolver::validate_file_path(&path)?;
            if self.store.exists_file(&path)? {
                let mut bytes = Vec::new();
                self.store
                    .read_file(&path)?
                    .read_to_end(&mut bytes)
                    .map_err(StoreError::Io)?;
                lines.push(String::from_utf8_lossy(&bytes).into_owned());
            } else {
                lines.push(format!("cat: {}: No such file", arg));
            }
        }
        Ok(lines)
    }

    fn rm(&mut self, args: Vec<String>) -> Result<Vec<String>, ConsoleError> {
        let mut lines = Vec::new();
        for arg in &args {
            let path = self.session.resolve(arg)?;
            if self.store.exists_file(&path)? {
                self.store.delete_file(&path)?;
            } else if self.store.exists_dir(&path)? {
                if self.store.count_dir_children(&path)? != 0 {
                    lines.push(format!("rm: {}: The folder is not empty", arg));
                } else {
                    self.store.delete_dir(&path, false)?;
                }
            } else {
                lines.push(format!("rm: {} : No such file or folder", arg));
            }
        }
        Ok(lines)
    }

    fn rmr(&mut self, args: Vec<String>) -> Result<Vec<String>, ConsoleError> {
        let mut lines = Vec::new();
        for arg in &args {
            let path = self.session.resolve(arg)?;
            if self.store.exists_file(&path)? {
                self.store.delete_file(&path)?;
            } else if self.store.exists_dir(&path)? {
                self.store.delete_dir(&path, true)?;
            } else {
                lines.push(format!("rmr: {} : No such file or folder", arg));
            }
        }
        Ok(lines)
    }

    fn copy_from_local(&mut self, source: String, dest: String) -> Result<Vec<String>, ConsoleError> {
        let dest = self.session.resolve(&dest)?;
        PathResolver::validate_dir_path(&dest)?;
        if self.store.exists_dir(&dest)? {
            return Ok(vec!["Destination path is a folder".to_string()]);
        }
        let source = PathResolver::normalize(&source);
        if !self.local.exists(&source)? {
            return Ok(vec![format!("Source '{}' does not exist", source)]);
        }
        let outcome = copy_tree(&mut self.local, &mut self.store, &source, &dest)?;
        self.log_copy("copyfromlocal", &outcome);
        Ok(Vec::new())
    }

    fn copy_to_local(&mut self, source: String, dest: String) -> Result<Vec<String>, ConsoleError> {
        let source = self.session.resolve(&source)?;
        let dest = PathResolver::normalize(&dest);
        let outcome = copy_tree(&mut self.store, &mut self.local, &source, &dest)?;
        self.log_copy("copytolocal", &outcome);
        Ok(Vec::new())
    }

    fn copy_from_remote(&mut self, source: String, dest: String) -> Result<Vec<String>, ConsoleError> {
        let uri = StoreUri::parse(&source)?;
        let dest = self.session.resolve(&dest)?;
        let Some(link) = self.remote.as_mut() else {
            return Ok(vec!["No secondary store is attached".to_string()]);
        };
        if link.endpoint != uri.endpoint {
            return Ok(vec![format!("Not connected to '{}'", uri.endpoint)]);
        }
        let outcome = copy_tree(link.store.as_mut(), &mut self.store, &uri.path, &dest)?;
        self.log_copy("copyfromremote", &outcome);
        Ok(Vec::new())
    }

    fn copy_to_remote(&mut self, source: String, dest: String) -> Result<Vec<String>, ConsoleError> {
        let uri = StoreUri::parse(&dest)?;
        let source = self.session.resolve(&source)?;
        let Some(link) = self.remote.as_mut() else {
            return Ok(vec!["No secondary store is attached".to_string()]);
        };
        if link.endpoint != uri.endpoint {
            return Ok(vec![format!("Not connected to '{}'", uri.endpoint)]);
        }
        let outcome = copy_tree(&mut self.store, link.store.as_mut(), &source, &uri.path)?;
        self.log_copy("copytoremote", &outcome);
        Ok(Vec::new())
    }

    fn log_copy(&mut self, command: &str, outcome: &CopyOutcome) {
        self.logger.log(
            LogEntry::new(LogLevel::Debug, "copy finished")
                .with_command(command)
                .with_field("files", outcome.files_copied.to_string())
                .with_field("folders", outcome.dirs_created.to_string()),
        );
    }
}

fn help_lines() -> Vec<String> {
    [
        "List of all console commands:",
        "cd <folder>",
        "pwd",
        "ls <path>...",
        "mkdir <path>...",
        "touch <file>...",
        "newfile <file> <content>",
        "cat <file>...",
        "rm <file | folder>...",
        "rmr <file | folder>...",
        "copyfromlocal <source> <dest>",
        "copytolocal <source> <dest>",
        "copyfromremote <uri> <dest>",
        "copytoremote <source> <uri>",
        "clear",
        "quit | exit",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
