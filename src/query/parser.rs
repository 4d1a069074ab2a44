use super::error::{QueryErr, Result};
use super::lexer::{Lexer, Token, TokenKind};
use std::fmt;

/// Root classification of a command tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Create,
    Insert,
    Select,
    Delete,
}

impl Command {
    pub fn keyword(self) -> &'static str {
        match self {
            Command::Create => "CREATE",
            Command::Insert => "INSERT",
            Command::Select => "SELECT",
            Command::Delete => "DELETE",
        }
    }

    fn from_keyword(text: &str) -> Option<Self> {
        match text {
            "CREATE" => Some(Command::Create),
            "INSERT" => Some(Command::Insert),
            "SELECT" => Some(Command::Select),
            "DELETE" => Some(Command::Delete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    // commands, always the root
    CreateCommand,
    InsertCommand,
    SelectCommand,
    DeleteCommand,
    // specifiers
    TableSpecifier,
    ValuesSpecifier,
    WhereSpecifier,
    // arguments
    ValueListArgs,
    ValueArg,
    ConditionArgs,
}

impl NodeKind {
    pub fn command(self) -> Option<Command> {
        match self {
            NodeKind::CreateCommand => Some(Command::Create),
            NodeKind::InsertCommand => Some(Command::Insert),
            NodeKind::SelectCommand => Some(Command::Select),
            NodeKind::DeleteCommand => Some(Command::Delete),
            _ => None,
        }
    }
}

impl From<Command> for NodeKind {
    fn from(command: Command) -> Self {
        match command {
            Command::Create => NodeKind::CreateCommand,
            Command::Insert => NodeKind::InsertCommand,
            Command::Select => NodeKind::SelectCommand,
            Command::Delete => NodeKind::DeleteCommand,
        }
    }
}

/// A node of the command tree. Each node owns its children; child order is
/// significant (a `TableSpecifier` holds the table name, then the columns).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    kind: NodeKind,
    value: Box<str>,
    children: Vec<Node>,
}

impl Node {
    fn new(kind: NodeKind, value: &str) -> Self {
        Self {
            kind,
            value: value.into(),
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }

    pub fn command(&self) -> Option<Command> {
        self.kind.command()
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        writeln!(f, "{:indent$}{:?} '{}'", "", self.kind, self.value, indent = depth * 2)?;
        for child in &self.children {
            child.write_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Command,
    TableSpecifier,
    TableName,
    ValueList,
    Complete,
}

impl State {
    fn expected(self) -> &'static str {
        match self {
            State::Start => "a command (CREATE, INSERT, SELECT, DELETE)",
            State::Command => "TABLE",
            State::TableSpecifier => "a table name",
            State::TableName => "'('",
            State::ValueList => "a column name or ')'",
            State::Complete => "end of input",
        }
    }
}

fn unexpected(state: State, token: &Token) -> QueryErr {
    QueryErr::UnexpectedToken {
        expected: state.expected().into(),
        found: token.text.to_string(),
        position: token.position,
    }
}

/// Builds a command tree from tokens with a single left-to-right pass.
///
/// The insertion point is tracked as a path of child indices from the root,
/// so descending pushes an index and ascending pops one.
pub struct Parser {
    lexer: Lexer,
    root: Option<Node>,
    cursor: Vec<usize>,
    state: State,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Self {
        Self {
            lexer,
            root: None,
            cursor: Vec::new(),
            state: State::Start,
        }
    }

    /// Points the parser at new input, dropping any partial state.
    pub fn reset(&mut self, lexer: Lexer) {
        self.lexer = lexer;
        self.clear();
    }

    pub fn parse(&mut self) -> Result<Node> {
        self.clear();

        let tokens = self.lexer.tokenize();
        if tokens.is_empty() {
            return Err(QueryErr::EmptyInput);
        }
        for token in &tokens {
            self.step(token)?;
        }
        self.finish()
    }

    fn step(&mut self, token: &Token) -> Result<()> {
        match (self.state, token.kind) {
            (State::Start, TokenKind::Value) => {
                let command =
                    Command::from_keyword(&token.text).ok_or_else(|| unexpected(self.state, token))?;
                if command != Command::Create {
                    // CREATE is the only command with a grammar so far
                    return Err(QueryErr::NotImplemented {
                        command: command.keyword().into(),
                    });
                }
                self.root = Some(Node::new(command.into(), &token.text));
                self.state = State::Command;
            }
            (State::Command, TokenKind::Value) if token.is_keyword("TABLE") => {
                self.attach(NodeKind::TableSpecifier, token)?;
                self.descend();
                self.state = State::TableSpecifier;
            }
            (State::TableSpecifier, TokenKind::Value) => {
                self.attach(NodeKind::ValueArg, token)?;
                self.state = State::TableName;
            }
            (State::TableName, TokenKind::ListStart) => {
                self.attach(NodeKind::ValueListArgs, token)?;
                self.descend();
                self.state = State::ValueList;
            }
            (State::ValueList, TokenKind::Value) => {
                self.attach(NodeKind::ValueArg, token)?;
            }
            (State::ValueList, TokenKind::ListEnd) => {
                self.ascend();
                if let Some(table) = self.current() {
                    let columns = table.child(1).map_or(0, |list| list.children.len());
                    if columns == 0 {
                        return Err(QueryErr::EmptyColumnList {
                            table: table.child(0).map(|n| n.value.to_string()).unwrap_or_default(),
                        });
                    }
                }
                self.state = State::Complete;
            }
            _ => return Err(unexpected(self.state, token)),
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<Node> {
        match (self.state, self.root.take()) {
            (State::Complete, Some(root)) => Ok(root),
            (state, _) => Err(QueryErr::UnexpectedEof {
                expected: state.expected().into(),
                position: self.lexer.input().len(),
            }),
        }
    }

    fn clear(&mut self) {
        self.root = None;
        self.cursor.clear();
        self.state = State::Start;
    }

    fn current(&self) -> Option<&Node> {
        let mut node = self.root.as_ref()?;
        for &index in &self.cursor {
            node = node.children.get(index)?;
        }
        Some(node)
    }

    fn current_mut(&mut self) -> Option<&mut Node> {
        let mut node = self.root.as_mut()?;
        for &index in &self.cursor {
            node = node.children.get_mut(index)?;
        }
        Some(node)
    }

    fn attach(&mut self, kind: NodeKind, token: &Token) -> Result<()> {
        let state = self.state;
        match self.current_mut() {
            Some(parent) => {
                parent.children.push(Node::new(kind, &token.text));
                Ok(())
            }
            None => Err(unexpected(state, token)),
        }
    }

    // Moves the insertion point into the most recently attached child.
    fn descend(&mut self) {
        if let Some(last) = self.current().and_then(|n| n.children.len().checked_sub(1)) {
            self.cursor.push(last);
        }
    }

    fn ascend(&mut self) {
        self.cursor.pop();
    }
}

pub fn parse(text: &str) -> Result<Node> {
    Parser::new(Lexer::new(text)).parse()
}
