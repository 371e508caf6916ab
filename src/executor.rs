//! Pipeline wiring and execution.
//!
//! One anonymous pipe connects each pair of adjacent stages. Builtins run
//! in-process against the chosen endpoints; externals are spawned with the
//! endpoints converted into `Stdio` handles. Every pipe end the parent
//! holds is either moved into a spawned child or dropped before waiting —
//! a child blocked on read would otherwise never see EOF.

use crate::builtin::BuiltinKind;
use crate::command::{resolve, Command, StageIo};
use crate::env::ShellState;
use crate::parser::{RedirectMode, RedirectTarget, Stage};
use anyhow::Result;
use os_pipe::{PipeReader, PipeWriter};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::process::{Child, Command as ChildCommand, Stdio};

enum InputStream {
    Inherit,
    Pipe(PipeReader),
}

impl InputStream {
    fn into_stdio(self) -> Stdio {
        match self {
            InputStream::Inherit => Stdio::inherit(),
            InputStream::Pipe(reader) => Stdio::from(reader),
        }
    }

    fn into_reader(self) -> Box<dyn Read> {
        match self {
            InputStream::Inherit => Box::new(io::stdin()),
            InputStream::Pipe(reader) => Box::new(reader),
        }
    }
}

enum OutputStream {
    Inherit,
    Pipe(PipeWriter),
    File(File),
}

impl OutputStream {
    fn into_stdio(self) -> Stdio {
        match self {
            OutputStream::Inherit => Stdio::inherit(),
            OutputStream::Pipe(writer) => Stdio::from(writer),
            OutputStream::File(file) => Stdio::from(file),
        }
    }
}

fn open_target(target: &RedirectTarget) -> io::Result<File> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(matches!(target.mode, RedirectMode::Truncate))
        .append(matches!(target.mode, RedirectMode::Append))
        .open(&target.path)
}

/// Execute a planned pipeline and reap every spawned child.
///
/// Per-stage failures (unknown command, unopenable redirection target,
/// spawn errors) are reported on stdout and skip only the affected stage;
/// the rest of the pipeline still runs, observing EOF from the gap.
pub fn run_pipeline(stages: Vec<Stage>, state: &mut ShellState) -> Result<()> {
    let count = stages.len();
    let mut children: Vec<Child> = Vec::new();
    let mut upstream: Option<PipeReader> = None;

    for (index, stage) in stages.into_iter().enumerate() {
        let stdin = match upstream.take() {
            Some(reader) => InputStream::Pipe(reader),
            None => InputStream::Inherit,
        };
        let (mut stdout, next_upstream) = if index + 1 < count {
            let (reader, writer) = os_pipe::pipe()?;
            (OutputStream::Pipe(writer), Some(reader))
        } else {
            (OutputStream::Inherit, None)
        };
        upstream = next_upstream;

        if let Some(target) = &stage.stdout {
            match open_target(target) {
                Ok(file) => stdout = OutputStream::File(file),
                Err(e) => {
                    println!("error opening file: {}", e);
                    continue;
                }
            }
        }
        let mut stderr = OutputStream::Inherit;
        if let Some(target) = &stage.stderr {
            match open_target(target) {
                Ok(file) => stderr = OutputStream::File(file),
                Err(e) => {
                    println!("error opening file: {}", e);
                    continue;
                }
            }
        }

        match resolve(&stage.argv[0], &state.env) {
            None => println!("{}: command not found", stage.argv[0]),
            Some(Command::Builtin(kind)) => {
                run_builtin_stage(kind, &stage, stdin, stdout, stderr, state);
            }
            Some(Command::External(path)) => {
                let spawned = ChildCommand::new(&path)
                    .args(&stage.argv[1..])
                    .stdin(stdin.into_stdio())
                    .stdout(stdout.into_stdio())
                    .stderr(stderr.into_stdio())
                    .envs(state.env.vars())
                    .current_dir(state.env.working_dir())
                    .spawn();
                match spawned {
                    Ok(child) => children.push(child),
                    Err(e) => println!("{}", e),
                }
            }
        }
    }

    drop(upstream);

    for mut child in children {
        if let Err(e) = child.wait() {
            println!("{}", e);
        }
    }
    Ok(())
}

fn run_builtin_stage(
    kind: BuiltinKind,
    stage: &Stage,
    stdin: InputStream,
    stdout: OutputStream,
    stderr: OutputStream,
    state: &mut ShellState,
) {
    let mut reader = stdin.into_reader();
    let mut out: Box<dyn Write> = match stdout {
        OutputStream::Inherit => Box::new(io::stdout()),
        OutputStream::Pipe(writer) => Box::new(writer),
        OutputStream::File(file) => Box::new(file),
    };
    let mut err: Box<dyn Write> = match stderr {
        OutputStream::Inherit => Box::new(io::stderr()),
        OutputStream::Pipe(writer) => Box::new(writer),
        OutputStream::File(file) => Box::new(file),
    };

    let result = {
        let mut stage_io = StageIo {
            stdin: reader.as_mut(),
            stdout: out.as_mut(),
            stderr: err.as_mut(),
        };
        kind.run(&stage.argv[1..], &mut stage_io, state)
    };
    if let Err(e) = result {
        println!("{}", e);
    }
    let _ = out.flush();
    let _ = err.flush();
    // Dropping the boxes releases any pipe or file endpoint this stage owned.
}
