use crate::constant::*;
use crate::parser::base::ArgumentInfo;

#[derive(Debug)]
struct Entry {
    short: Option<char>,
    long: String,
    grammar: Option<String>,
    description: String,
    notes: Vec<String>,
}

impl Entry {
    fn render(&self) -> String {
        let mut line = match self.short {
            Some(s) => format!("-{s},  --{}", self.long),
            None => format!("     --{}", self.long),
        };

        if let Some(grammar) = &self.grammar {
            line.push_str(&format!("=<{grammar}>"));
        }

        line.push_str(&format!(":  {}", self.description));

        if !self.notes.is_empty() {
            line.push_str(&format!(" [{}]", self.notes.join(", ")));
        }

        line
    }
}

/// Renders the help message.
#[derive(Debug)]
pub(crate) struct Printer {
    program: String,
    description: String,
    entries: Vec<Entry>,
    help: Entry,
}

impl Printer {
    pub(crate) fn new(
        program: impl Into<String>,
        description: impl Into<String>,
        help_short: Option<char>,
        help_long: impl Into<String>,
    ) -> Self {
        Self {
            program: program.into(),
            description: description.into(),
            entries: Vec::default(),
            help: Entry {
                short: help_short,
                long: help_long.into(),
                grammar: None,
                description: HELP_MESSAGE.to_string(),
                notes: Vec::default(),
            },
        }
    }

    /// Add the line for an argument, whose type shows as `display` and whose (non-trivial) default shows as `default`.
    pub(crate) fn add(&mut self, info: &ArgumentInfo<'_>, display: &str, default: Option<String>) {
        let mut notes = Vec::default();

        if info.is_multi_value {
            notes.push("repeated".to_string());
        }

        if info.is_positional {
            notes.push("positional".to_string());
        }

        if let Some(value) = default {
            notes.push(format!("default = {value}"));
        }

        if info.is_multi_value && info.minimum_values != 0 {
            notes.push(format!("min args = {}", info.minimum_values));
        }

        self.entries.push(Entry {
            short: info.short,
            long: info.long.clone(),
            grammar: if info.is_flag {
                None
            } else {
                Some(display.to_string())
            },
            description: info.description.clone(),
            notes,
        });
    }

    pub(crate) fn render(&self) -> String {
        let mut out = format!(
            "{p}\n{d}\n\n{OPTIONS_HEADER}\n",
            p = self.program,
            d = self.description
        );

        for entry in &self.entries {
            out.push_str(&entry.render());
            out.push('\n');
        }

        out.push('\n');
        out.push_str(&self.help.render());
        out.push('\n');
        out
    }
}
