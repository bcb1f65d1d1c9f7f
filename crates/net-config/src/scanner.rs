//! Line scanner for cmdline sources
//!
//! Turns one line into `name` / `name=value` assignments. The scanner is a
//! small state machine fed one character at a time:
//!
//! | state  | input                 | transition                              |
//! |--------|-----------------------|-----------------------------------------|
//! | Blank  | name char             | start name, Name                        |
//! | Blank  | anything else         | skip                                    |
//! | Name   | name char             | extend name                             |
//! | Name   | whitespace, end       | emit bare variable, Blank               |
//! | Name   | `=` or `"`            | start value, Value                      |
//! | Name   | anything else         | drop the partial name, skip, Blank      |
//! | Value  | `"`                   | keep, Quoted                            |
//! | Value  | whitespace, end       | emit `name=value`, Blank                |
//! | Quoted | `"`                   | keep, Value                             |
//! | Quoted | end                   | emit `name=value` (auto-closed)         |
//! | Quoted | anything else         | keep                                    |
//!
//! In Value and Quoted a backslash keeps itself and the next character
//! verbatim. Name chars are ASCII alphanumerics and `_ - . \`.

/// One `name` or `name=value` token of a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAssignment {
    pub name: String,
    pub value: Option<String>,
}

impl RawAssignment {
    pub fn bare(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: None,
        }
    }

    pub fn with_value(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: Some(value.to_string()),
        }
    }
}

impl std::fmt::Display for RawAssignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}={}", self.name, value),
            None => write!(f, "{}", self.name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Blank,
    Name,
    Value,
    Quoted,
}

/// Character-at-a-time scanner for a single line
#[derive(Debug)]
pub struct LineScanner {
    state: State,
    escaped: bool,
    name: String,
    value: String,
    assignments: Vec<RawAssignment>,
    unterminated: usize,
}

impl Default for LineScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl LineScanner {
    pub fn new() -> Self {
        Self {
            state: State::Blank,
            escaped: false,
            name: String::new(),
            value: String::new(),
            assignments: Vec::new(),
            unterminated: 0,
        }
    }

    /// Scan a whole line
    pub fn scan(line: &str) -> Vec<RawAssignment> {
        let mut scanner = Self::new();
        scanner.feed_line(line);
        scanner.finish()
    }

    /// Feed a line; comment lines are discarded
    pub fn feed_line(&mut self, line: &str) {
        if line.trim_start().starts_with('#') {
            return;
        }
        for c in line.chars() {
            self.feed(c);
        }
        self.end_of_line();
    }

    /// Number of values that ended inside an open quote
    pub fn unterminated_quotes(&self) -> usize {
        self.unterminated
    }

    pub fn finish(mut self) -> Vec<RawAssignment> {
        self.end_of_line();
        self.assignments
    }

    fn feed(&mut self, c: char) {
        match self.state {
            State::Blank => {
                if is_name_char(c) {
                    self.name.push(c);
                    self.state = State::Name;
                }
            }
            State::Name => {
                if is_name_char(c) {
                    self.name.push(c);
                } else if c.is_whitespace() {
                    self.emit_bare();
                } else if c == '=' || c == '"' {
                    self.state = State::Value;
                } else {
                    log::trace!("Skipping unexpected character {:?} after '{}'", c, self.name);
                    self.name.clear();
                    self.state = State::Blank;
                }
            }
            State::Value | State::Quoted if self.escaped => {
                self.value.push(c);
                self.escaped = false;
            }
            State::Value => match c {
                '\\' => {
                    self.value.push(c);
                    self.escaped = true;
                }
                '"' => {
                    self.value.push(c);
                    self.state = State::Quoted;
                }
                c if c.is_whitespace() => self.emit_value(),
                c => self.value.push(c),
            },
            State::Quoted => {
                match c {
                    '\\' => self.escaped = true,
                    '"' => self.state = State::Value,
                    _ => {}
                }
                self.value.push(c);
            }
        }
    }

    fn end_of_line(&mut self) {
        match self.state {
            State::Blank => {}
            State::Name => self.emit_bare(),
            State::Value => self.emit_value(),
            State::Quoted => {
                log::debug!(
                    "Unterminated quote in value of '{}', closing at end of line",
                    self.name
                );
                self.unterminated += 1;
                self.emit_value();
            }
        }
    }

    fn emit_bare(&mut self) {
        self.assignments.push(RawAssignment {
            name: std::mem::take(&mut self.name),
            value: None,
        });
        self.reset();
    }

    fn emit_value(&mut self) {
        self.assignments.push(RawAssignment {
            name: std::mem::take(&mut self.name),
            value: Some(std::mem::take(&mut self.value)),
        });
        self.reset();
    }

    fn reset(&mut self) {
        self.name.clear();
        self.value.clear();
        self.escaped = false;
        self.state = State::Blank;
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '\\')
}
