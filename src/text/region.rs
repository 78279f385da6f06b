use std::fmt::{self, Display, Formatter};

/// A Region is rendered text viewed as a list of lines. Nested PukiWiki
/// contexts (quotes, list depth) are produced by rewriting every line of an
/// already rendered fragment rather than by threading a prefix through the
/// writer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Region {
    lines: Vec<String>,
}

impl Region {
    /// Split on every `'\n'`. Empty lines are kept, including a leading or
    /// trailing one, so `apply` gives back the input unchanged.
    pub fn from_str(s: &str) -> Self {
        Region {
            lines: s.split('\n').map(str::to_owned).collect(),
        }
    }

    /// Replace every line with `f(index, line)`.
    pub fn map_lines<F>(&mut self, mut f: F) -> &mut Self
    where
        F: FnMut(usize, &str) -> String,
    {
        for (i, line) in self.lines.iter_mut().enumerate() {
            *line = f(i, line);
        }
        self
    }

    /// Join the lines back with `'\n'`.
    pub fn apply(&self) -> String {
        self.lines.join("\n")
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.apply())
    }
}
