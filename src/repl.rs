/// A `.`-prefixed shell command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meta<'a> {
    Exit,
    Tables,
    Tokens(&'a str),
    Ast(&'a str),
}

impl<'a> Meta<'a> {
    /// Splits `line` into a command word and a trimmed argument and matches
    /// the word exactly. Returns `None` when the line is not a meta command,
    /// in which case the shell runs it as a query.
    pub fn parse(line: &'a str) -> Option<Self> {
        let line = line.trim();
        let (word, arg) = match line.split_once(char::is_whitespace) {
            Some((word, arg)) => (word, arg.trim()),
            None => (line, ""),
        };
        match (word, arg) {
            (".exit", "") => Some(Meta::Exit),
            (".tables", "") => Some(Meta::Tables),
            (".tokens", arg) => Some(Meta::Tokens(arg)),
            (".ast", arg) => Some(Meta::Ast(arg)),
            _ => None,
        }
    }
}
