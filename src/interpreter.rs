use crate::completer::ShellCompleter;
use crate::env::ShellState;
use crate::executor;
use crate::lexer;
use crate::parser::{self, ParsingError};
use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config, Editor};

pub(crate) const PROMPT: &str = "$ ";

/// The interactive shell: one of these owns all state that survives across
/// prompts (environment, submitted-line history) and drives the
/// line-editor/evaluate loop.
///
/// Example
/// ```
/// use rshell::Interpreter;
/// let mut sh = Interpreter::default();
/// sh.eval_line("echo hello");
/// ```
pub struct Interpreter {
    state: ShellState,
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            state: ShellState::new(),
        }
    }

    /// Evaluate one command line: split into words, plan the pipeline, run
    /// it. Every failure is reported on stdout here; nothing propagates to
    /// the caller.
    pub fn eval_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        let words = lexer::split_into_words(line);
        let stages = match parser::parse_pipeline(words) {
            Ok(stages) => stages,
            Err(ParsingError::EmptyStage) => {
                println!("invalid pipeline");
                return;
            }
        };
        if let Err(e) = executor::run_pipeline(stages, &mut self.state) {
            println!("{}", e);
        }
    }

    /// Prompt, read, evaluate, repeat — until EOF or `exit`.
    pub fn repl(&mut self) -> Result<()> {
        let config = Config::builder()
            .completion_type(CompletionType::Circular)
            .build();
        let mut rl: Editor<ShellCompleter, DefaultHistory> = Editor::with_config(config)?;
        rl.set_helper(Some(ShellCompleter::new()));

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(line);
                    self.state.history.push(line.to_string());
                    self.eval_line(line);
                    if self.state.env.exit_requested() {
                        break;
                    }
                }
                // An interrupted line is abandoned; the shell stays up.
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file(tag: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "rshell_repl_{}_{}_{}",
            tag,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn exit_raises_the_termination_flag() {
        let mut sh = Interpreter::new();
        assert!(!sh.state.env.exit_requested());
        sh.eval_line("exit");
        assert!(sh.state.env.exit_requested());
    }

    #[test]
    fn blank_lines_are_ignored() {
        let mut sh = Interpreter::new();
        sh.eval_line("");
        sh.eval_line("   \t  ");
        assert!(!sh.state.env.exit_requested());
    }

    #[test]
    fn invalid_pipeline_does_not_kill_the_shell() {
        let mut sh = Interpreter::new();
        sh.eval_line("a | | b");
        sh.eval_line("| cat");
        assert!(!sh.state.env.exit_requested());
    }

    #[test]
    fn history_builtin_sees_submitted_lines() {
        let mut sh = Interpreter::new();
        sh.state.history.push("echo one".to_string());
        sh.state.history.push("history".to_string());

        let out = temp_file("history");
        sh.eval_line(&format!("history > {}", out.to_string_lossy()));
        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "    1  echo one\n    2  history\n"
        );
        let _ = fs::remove_file(&out);
    }

    #[test]
    fn quoting_survives_end_to_end() {
        let mut sh = Interpreter::new();
        let out = temp_file("quoting");
        sh.eval_line(&format!("echo 'a  b'   \"c\" > {}", out.to_string_lossy()));
        assert_eq!(fs::read_to_string(&out).unwrap(), "a  b c\n");
        let _ = fs::remove_file(&out);
    }
}
