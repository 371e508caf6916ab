//! First-word tab completion over builtins and PATH executables.
//!
//! The editor calls [`ShellCompleter`] on every TAB. A single match is
//! inserted with a trailing space; an ambiguous prefix is first advanced to
//! the longest common prefix of the candidates, then rings the bell, and on
//! a second TAB prints the sorted candidate list and redraws the prompt.

use crate::builtin::BuiltinKind;
use crate::external::is_executable;
use crate::interpreter::PROMPT;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs;
use std::io::{self, Write};

#[derive(Debug, Default)]
struct CompleterState {
    last_prefix: String,
    tab_count: u32,
}

/// What a TAB press should do, decided before any terminal side effect.
#[derive(Debug, PartialEq, Eq)]
enum Action {
    Bell,
    /// Replace the current prefix with this text.
    Insert(String),
    /// Print these candidates and reprompt.
    List(Vec<String>),
}

pub struct ShellCompleter {
    state: RefCell<CompleterState>,
}

impl ShellCompleter {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(CompleterState::default()),
        }
    }
}

impl Default for ShellCompleter {
    fn default() -> Self {
        Self::new()
    }
}

/// Builtin names plus executable basenames across `search_paths`,
/// deduplicated and in lexicographic order.
fn collect_candidates(prefix: &str, search_paths: &OsStr) -> Vec<String> {
    let mut found = BTreeSet::new();
    for name in BuiltinKind::NAMES {
        if name.starts_with(prefix) {
            found.insert(name.to_string());
        }
    }
    for dir in std::env::split_paths(search_paths) {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            if let Some(name) = entry.file_name().to_str() {
                if name.starts_with(prefix) && is_executable(&entry.path()) {
                    found.insert(name.to_string());
                }
            }
        }
    }
    found.into_iter().collect()
}

fn longest_common_prefix(candidates: &[String]) -> String {
    let mut prefix = candidates[0].clone();
    for candidate in &candidates[1..] {
        while !candidate.starts_with(prefix.as_str()) {
            prefix.pop();
        }
    }
    prefix
}

fn decide(state: &mut CompleterState, prefix: &str, candidates: Vec<String>) -> Action {
    if prefix == state.last_prefix {
        state.tab_count += 1;
    } else {
        state.last_prefix = prefix.to_string();
        state.tab_count = 1;
    }

    if candidates.is_empty() {
        return Action::Bell;
    }
    if candidates.len() == 1 {
        state.tab_count = 0;
        return Action::Insert(format!("{} ", candidates[0]));
    }
    let lcp = longest_common_prefix(&candidates);
    if lcp.len() > prefix.len() {
        state.tab_count = 0;
        return Action::Insert(lcp);
    }
    if state.tab_count == 1 {
        Action::Bell
    } else {
        state.tab_count = 0;
        let mut sorted = candidates;
        sorted.sort();
        Action::List(sorted)
    }
}

fn ring_bell() {
    let mut out = io::stdout();
    let _ = out.write_all(b"\x07");
    let _ = out.flush();
}

impl Completer for ShellCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let head = &line[..pos];
        let prefix = head.trim_start();
        // Only the first word completes; arguments are left alone.
        if prefix.contains(' ') {
            return Ok((pos, Vec::new()));
        }
        let start = head.len() - prefix.len();

        let search_paths = std::env::var_os("PATH").unwrap_or_default();
        let candidates = collect_candidates(prefix, &search_paths);

        match decide(&mut self.state.borrow_mut(), prefix, candidates) {
            Action::Insert(replacement) => Ok((
                start,
                vec![Pair {
                    display: replacement.trim_end().to_string(),
                    replacement,
                }],
            )),
            Action::Bell => {
                ring_bell();
                Ok((pos, Vec::new()))
            }
            Action::List(candidates) => {
                let mut out = io::stdout();
                let _ = write!(out, "\n{}\n{}{}", candidates.join("  "), PROMPT, prefix);
                let _ = out.flush();
                Ok((pos, Vec::new()))
            }
        }
    }
}

impl Hinter for ShellCompleter {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<Self::Hint> {
        None
    }
}

impl Highlighter for ShellCompleter {}

impl Validator for ShellCompleter {}

impl Helper for ShellCompleter {}
