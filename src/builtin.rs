use crate::command::{ExitCode, StageIo};
use crate::env::ShellState;
use crate::external::find_in_path;
use anyhow::Result;
use argh::{EarlyExit, FromArgs};
use std::ffi::OsStr;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed
/// directly in-process against the stage's stdio triple, without spawning a
/// child process.
pub(crate) trait Builtin: Sized + FromArgs {
    /// Canonical name of the command, e.g. "echo" or "cd".
    fn name() -> &'static str;

    /// Executes the command using the provided IO streams and shell state.
    ///
    /// Return value follows shell conventions: 0 for success, non-zero for
    /// error.
    fn run(self, io: &mut StageIo<'_>, state: &mut ShellState) -> Result<ExitCode>;
}

/// The fixed builtin registry, resolved once per stage by exact name match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinKind {
    Exit,
    Echo,
    Type,
    Pwd,
    Cd,
    History,
}

impl BuiltinKind {
    /// Every builtin name, for the completion engine.
    pub const NAMES: [&'static str; 6] = ["exit", "echo", "type", "pwd", "cd", "history"];

    pub fn lookup(name: &str) -> Option<Self> {
        match name {
            "exit" => Some(Self::Exit),
            "echo" => Some(Self::Echo),
            "type" => Some(Self::Type),
            "pwd" => Some(Self::Pwd),
            "cd" => Some(Self::Cd),
            "history" => Some(Self::History),
            _ => None,
        }
    }

    /// Parse `args` for this builtin and run it against the stage IO.
    pub fn run(
        self,
        args: &[String],
        io: &mut StageIo<'_>,
        state: &mut ShellState,
    ) -> Result<ExitCode> {
        match self {
            Self::Exit => run_parsed::<Exit>(args, io, state),
            Self::Echo => run_parsed::<Echo>(args, io, state),
            Self::Type => run_parsed::<Type>(args, io, state),
            Self::Pwd => run_parsed::<Pwd>(args, io, state),
            Self::Cd => run_parsed::<Cd>(args, io, state),
            Self::History => run_parsed::<History>(args, io, state),
        }
    }
}

/// Parse the argument list and execute the builtin.
///
/// Both `argh` usage errors and runtime failures land on the stage's stdout;
/// diagnostics never reach the terminal directly.
fn run_parsed<B: Builtin>(
    args: &[String],
    io: &mut StageIo<'_>,
    state: &mut ShellState,
) -> Result<ExitCode> {
    let argv: Vec<&str> = args.iter().map(String::as_str).collect();
    match B::from_args(&[B::name()], &argv) {
        Ok(cmd) => match cmd.run(io, state) {
            Ok(code) => Ok(code),
            Err(e) => {
                writeln!(io.stdout, "{}", e)?;
                Ok(1)
            }
        },
        Err(EarlyExit { output, status }) => {
            io.stdout.write_all(output.as_bytes())?;
            Ok(if status.is_err() { 1 } else { 0 })
        }
    }
}

#[derive(FromArgs)]
/// Terminate the shell.
pub struct Exit {
    #[argh(positional, greedy)]
    /// ignored; present so stray arguments do not fail parsing.
    pub _args: Vec<String>,
}

impl Builtin for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn run(self, _io: &mut StageIo<'_>, state: &mut ShellState) -> Result<ExitCode> {
        state.env.request_exit();
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Write the arguments to standard output, separated by single spaces and
/// terminated by a newline.
pub struct Echo {
    #[argh(positional, greedy)]
    /// values to print as-is.
    pub args: Vec<String>,
}

impl Builtin for Echo {
    fn name() -> &'static str {
        "echo"
    }

    fn run(self, io: &mut StageIo<'_>, _state: &mut ShellState) -> Result<ExitCode> {
        writeln!(io.stdout, "{}", self.args.join(" "))?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Report how a command name would be interpreted: shell builtin or the
/// path of the executable found on PATH.
pub struct Type {
    #[argh(positional, greedy)]
    /// command names to look up; only the first is inspected.
    pub names: Vec<String>,
}

impl Builtin for Type {
    fn name() -> &'static str {
        "type"
    }

    fn run(self, io: &mut StageIo<'_>, state: &mut ShellState) -> Result<ExitCode> {
        // Without an argument, type prints nothing.
        let Some(name) = self.names.first() else {
            return Ok(0);
        };
        if BuiltinKind::lookup(name).is_some() {
            writeln!(io.stdout, "{} is a shell builtin", name)?;
            return Ok(0);
        }
        let found = state
            .env
            .search_paths()
            .and_then(|paths| find_in_path(OsStr::new(paths), OsStr::new(name)));
        match found {
            Some(path) => writeln!(io.stdout, "{} is {}", name, path.display())?,
            None => writeln!(io.stdout, "{}: not found", name)?,
        }
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Print the current working directory.
pub struct Pwd {}

impl Builtin for Pwd {
    fn name() -> &'static str {
        "pwd"
    }

    fn run(self, io: &mut StageIo<'_>, state: &mut ShellState) -> Result<ExitCode> {
        writeln!(io.stdout, "{}", state.env.working_dir().display())?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Change the current working directory. Without an argument this is a
/// no-op; a lone `~` stands for the HOME directory.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to, absolute or relative.
    pub target: Option<String>,
}

impl Builtin for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn run(self, io: &mut StageIo<'_>, state: &mut ShellState) -> Result<ExitCode> {
        let Some(raw) = self.target else {
            return Ok(0);
        };
        let path = if raw == "~" {
            let home = state.env.home();
            if home.is_empty() {
                // Announce the failed expansion; the chdir below fails too.
                writeln!(io.stdout, "cd: ~: No such file or directory")?;
            }
            home.to_string()
        } else {
            raw
        };
        match std::env::set_current_dir(&path) {
            Ok(()) => {
                if let Ok(cwd) = std::env::current_dir() {
                    state.env.set_working_dir(cwd);
                }
                Ok(0)
            }
            Err(_) => {
                writeln!(io.stdout, "cd: {}: No such file or directory", path)?;
                Ok(1)
            }
        }
    }
}

#[derive(FromArgs)]
/// Print every line submitted this session, numbered from 1.
pub struct History {}

impl Builtin for History {
    fn name() -> &'static str {
        "history"
    }

    fn run(self, io: &mut StageIo<'_>, state: &mut ShellState) -> Result<ExitCode> {
        for (index, line) in state.history.iter().enumerate() {
            writeln!(io.stdout, "{:>5}  {}", index + 1, line)?;
        }
        Ok(0)
    }
}
