//! Classification of the raw command-line tokens.
//!
//! godo takes a flat token list such as `new buy milk --tag home -e` and
//! partitions it into groups, one per recognized command or option, each
//! holding the plain tokens that follow it up to the next recognized token.
//! Unrecognized tokens are never keys; they only ever show up inside the
//! argument slice of the group before them.

use std::fmt;

use crate::error::{GodoError, Result};

/// Mutually exclusive actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    New,
    List,
    Done,
    Edit,
    Delete,
    View,
    Help,
}

impl Command {
    pub const ALL: [Command; 7] = [
        Command::New,
        Command::List,
        Command::Done,
        Command::Edit,
        Command::Delete,
        Command::View,
        Command::Help,
    ];

    pub fn long(self) -> &'static str {
        match self {
            Command::New => "new",
            Command::List => "list",
            Command::Done => "done",
            Command::Edit => "edit",
            Command::Delete => "delete",
            Command::View => "view",
            Command::Help => "help",
        }
    }

    pub fn short(self) -> &'static str {
        match self {
            Command::New => "n",
            Command::List => "l",
            Command::Done => "x",
            Command::Edit => "e",
            Command::Delete => "d",
            Command::View => "v",
            Command::Help => "h",
        }
    }
}

/// Modifiers that may accompany a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opt {
    Tag,
    Created,
    Edit,
    Help,
}

impl Opt {
    pub const ALL: [Opt; 4] = [Opt::Tag, Opt::Created, Opt::Edit, Opt::Help];

    pub fn long(self) -> &'static str {
        match self {
            Opt::Tag => "--tag",
            Opt::Created => "--created",
            Opt::Edit => "--edit",
            Opt::Help => "--help",
        }
    }

    pub fn short(self) -> &'static str {
        match self {
            Opt::Tag => "-t",
            Opt::Created => "-c",
            Opt::Edit => "-e",
            Opt::Help => "-h",
        }
    }
}

/// A recognized command or option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Command(Command),
    Opt(Opt),
}

impl Token {
    /// Recognize a raw token in either its long or short spelling.
    pub fn parse(raw: &str) -> Option<Token> {
        if let Some(cmd) = Command::ALL.into_iter().find(|c| c.long() == raw || c.short() == raw) {
            return Some(Token::Command(cmd));
        }
        Opt::ALL
            .into_iter()
            .find(|o| o.long() == raw || o.short() == raw)
            .map(Token::Opt)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Command(c) => f.write_str(c.long()),
            Token::Opt(o) => f.write_str(o.long()),
        }
    }
}

/// One recognized token together with its argument slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub token: Token,
    /// The spelling actually typed (`--tag` or `-t`).
    pub raw: String,
    pub args: Vec<String>,
}

/// Split `tokens` into groups in order of appearance. Duplicates are kept.
pub fn partition(tokens: &[String]) -> Vec<Group> {
    let marks: Vec<(usize, Token)> = tokens
        .iter()
        .enumerate()
        .filter_map(|(i, raw)| Token::parse(raw).map(|token| (i, token)))
        .collect();

    marks
        .iter()
        .enumerate()
        .map(|(n, &(start, token))| {
            let end = marks.get(n + 1).map_or(tokens.len(), |&(next, _)| next);
            Group {
                token,
                raw: tokens[start].clone(),
                args: tokens[start + 1..end].to_vec(),
            }
        })
        .collect()
}

/// Mapping from a recognized token string to its argument slice.
///
/// Keys keep the order they first appeared in; a token typed twice keeps only
/// its last slice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentMap {
    entries: Vec<(String, Vec<String>)>,
}

impl ArgumentMap {
    pub fn from_groups(groups: &[Group]) -> Self {
        let mut map = ArgumentMap::default();
        for group in groups {
            map.insert(group.raw.clone(), group.args.clone());
        }
        map
    }

    fn insert(&mut self, key: String, args: Vec<String>) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = args,
            None => self.entries.push((key, args)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, args)| args.as_slice())
    }

    /// Look a concept up by its long spelling, falling back to the short one.
    pub fn get_key_args(&self, long: &str, short: &str) -> Option<&[String]> {
        self.get(long).or_else(|| self.get(short))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Classify raw tokens into an [`ArgumentMap`].
pub fn classify(tokens: &[String]) -> ArgumentMap {
    ArgumentMap::from_groups(&partition(tokens))
}

/// A resolved invocation: the action to run plus its options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Command,
    pub args: Vec<String>,
    options: Vec<(Opt, Vec<String>)>,
}

impl Invocation {
    /// Merge partitioned groups into a single invocation.
    ///
    /// The first command is the action. A command word seen after it is plain
    /// text: it and its slice are appended to the group before it. Repeated
    /// options concatenate their slices.
    pub fn resolve(groups: Vec<Group>) -> Result<Invocation> {
        let mut command: Option<(Command, Vec<String>)> = None;
        let mut options: Vec<(Opt, Vec<String>)> = Vec::new();
        // Where the previous group's tokens went.
        let mut last: Option<Token> = None;

        for group in groups {
            match group.token {
                Token::Command(cmd) if command.is_none() => {
                    command = Some((cmd, group.args));
                    last = Some(group.token);
                }
                Token::Command(_) => {
                    let mut spill = Vec::with_capacity(group.args.len() + 1);
                    spill.push(group.raw);
                    spill.extend(group.args);
                    match last {
                        Some(Token::Opt(opt)) => {
                            if let Some((_, args)) = options.iter_mut().find(|(o, _)| *o == opt) {
                                args.extend(spill);
                            }
                        }
                        _ => {
                            if let Some((_, args)) = command.as_mut() {
                                args.extend(spill);
                            }
                        }
                    }
                }
                Token::Opt(opt) => {
                    match options.iter_mut().find(|(o, _)| *o == opt) {
                        Some((_, args)) => args.extend(group.args),
                        None => options.push((opt, group.args)),
                    }
                    last = Some(group.token);
                }
            }
        }

        let wants_help = options.iter().any(|(o, _)| *o == Opt::Help);
        match command {
            // `--help` outranks `view` but not the other commands.
            Some((Command::View, _)) if wants_help => {
                Ok(Invocation { command: Command::Help, args: Vec::new(), options })
            }
            Some((command, args)) => Ok(Invocation { command, args, options }),
            None if wants_help => {
                Ok(Invocation { command: Command::Help, args: Vec::new(), options })
            }
            None => Err(GodoError::Usage(format!(
                "No command given, expected one of: {}",
                Command::ALL.map(|c| Token::Command(c).to_string()).join(", ")
            ))),
        }
    }

    pub fn has(&self, opt: Opt) -> bool {
        self.options.iter().any(|(o, _)| *o == opt)
    }

    pub fn option_args(&self, opt: Opt) -> Option<&[String]> {
        self.options
            .iter()
            .find(|(o, _)| *o == opt)
            .map(|(_, args)| args.as_slice())
    }
}
