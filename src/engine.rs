use crate::error::{Error, Result};
use crate::query::{Command, Node, NodeKind, QueryErr, parse};
use crate::storage::{INTERNAL_PREFIX, Storage};
use std::collections::HashSet;
use tracing::{debug, info};

/// What an executed command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    TableCreated { name: String, columns: usize },
}

/// Arguments of a CREATE TABLE tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTable {
    pub name: String,
    pub columns: Vec<String>,
}

impl CreateTable {
    pub fn from_tree(tree: &Node) -> Result<Self> {
        let malformed = |what: &str| Error::MalformedTree(format!("CREATE TABLE without {what}"));

        let table = tree
            .children()
            .iter()
            .find(|n| n.kind() == NodeKind::TableSpecifier)
            .ok_or_else(|| malformed("a table specifier"))?;
        let name = table
            .child(0)
            .filter(|n| n.kind() == NodeKind::ValueArg)
            .ok_or_else(|| malformed("a table name"))?;
        let list = table
            .child(1)
            .filter(|n| n.kind() == NodeKind::ValueListArgs)
            .ok_or_else(|| malformed("a column list"))?;

        let columns = list
            .children()
            .iter()
            .filter(|n| n.kind() == NodeKind::ValueArg)
            .map(|n| n.value().to_string())
            .collect();
        Ok(Self {
            name: name.value().to_string(),
            columns,
        })
    }
}

/// Parses command text and applies it to a storage backend.
pub struct Engine<S> {
    storage: S,
}

impl<S: Storage> Engine<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn execute(&mut self, query: &str) -> Result<Outcome> {
        let tree = parse(query)?;
        debug!(command = ?tree.command(), "parsed command");
        self.dispatch(&tree)
    }

    pub fn dispatch(&mut self, tree: &Node) -> Result<Outcome> {
        let Some(command) = tree.command() else {
            return Err(Error::MalformedTree(format!("root is {:?}", tree.kind())));
        };
        match command {
            Command::Create => self.create_table(CreateTable::from_tree(tree)?),
            Command::Insert | Command::Select | Command::Delete => {
                Err(QueryErr::NotImplemented {
                    command: command.keyword().into(),
                }
                .into())
            }
        }
    }

    fn create_table(&mut self, create: CreateTable) -> Result<Outcome> {
        if create.name.starts_with(INTERNAL_PREFIX) {
            return Err(Error::ReservedName {
                name: create.name,
                prefix: INTERNAL_PREFIX,
            });
        }
        let mut seen = HashSet::new();
        if let Some(column) = create.columns.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(Error::DuplicateColumn {
                table: create.name,
                column: column.clone(),
            });
        }
        if self.storage.table_exists(&create.name) {
            return Err(Error::TableAlreadyExists { name: create.name });
        }
        self.storage.create_table(&create.name, &create.columns)?;
        info!(table = %create.name, columns = create.columns.len(), "table created");
        Ok(Outcome::TableCreated {
            name: create.name,
            columns: create.columns.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Document, MemoryStorage};

    fn engine() -> Engine<MemoryStorage> {
        Engine::new(MemoryStorage::new())
    }

    #[test]
    fn test_execute_create_table() {
        let mut engine = engine();
        let outcome = engine.execute("CREATE TABLE peoples (id, name, age)").unwrap();
        assert_eq!(
            outcome,
            Outcome::TableCreated {
                name: "peoples".into(),
                columns: 3,
            }
        );
        let columns: Vec<&str> = engine
            .storage()
            .columns("peoples")
            .unwrap()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(columns, vec!["id", "name", "age"]);
    }

    #[test]
    fn test_execute_existing_table() {
        let mut engine = engine();
        engine.execute("CREATE TABLE t (a)").unwrap();
        assert!(matches!(
            engine.execute("CREATE TABLE t (b)"),
            Err(Error::TableAlreadyExists { name }) if name == "t"
        ));
    }

    #[test]
    fn test_execute_duplicate_column() {
        let mut engine = engine();
        assert!(matches!(
            engine.execute("CREATE TABLE t (a, b, a)"),
            Err(Error::DuplicateColumn { column, .. }) if column == "a"
        ));
        assert!(!engine.storage().table_exists("t"));
    }

    #[test]
    fn test_execute_reserved_table_name() {
        let mut engine = engine();
        assert!(matches!(
            engine.execute("CREATE TABLE ghostdb_x (a)"),
            Err(Error::ReservedName { name, .. }) if name == "ghostdb_x"
        ));
        assert!(!engine.storage().table_exists("ghostdb_x"));
    }

    #[test]
    fn test_execute_reserved_name_in_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = Engine::new(Document::open(dir.path().join("db")).unwrap());
        assert!(matches!(
            engine.execute("CREATE TABLE ghostdb_metadata (a)"),
            Err(Error::ReservedName { .. })
        ));
        engine.execute("CREATE TABLE ghost (a)").unwrap();
        assert_eq!(engine.storage().table_names(), vec!["ghost".to_string()]);
    }

    #[test]
    fn test_execute_parse_error_executes_nothing() {
        let mut engine = engine();
        assert!(matches!(
            engine.execute("CREATE TABLE t a,b)"),
            Err(Error::Query(QueryErr::UnexpectedToken { .. }))
        ));
        assert!(matches!(
            engine.execute("CREATE TABLE t ()"),
            Err(Error::Query(QueryErr::EmptyColumnList { .. }))
        ));
        assert!(engine.storage().table_names().is_empty());
    }

    #[test]
    fn test_execute_not_implemented() {
        let mut engine = engine();
        assert!(matches!(
            engine.execute("INSERT INTO peoples (1, 'John Doe', 30)"),
            Err(Error::Query(QueryErr::NotImplemented { command })) if command == "INSERT"
        ));
    }

    #[test]
    fn test_create_table_from_tree() {
        let tree = parse("CREATE TABLE t (x y z)").unwrap();
        assert_eq!(
            CreateTable::from_tree(&tree).unwrap(),
            CreateTable {
                name: "t".into(),
                columns: vec!["x".into(), "y".into(), "z".into()],
            }
        );
    }

    #[test]
    fn test_dispatch_rejects_non_command_root() {
        let tree = parse("CREATE TABLE t (a)").unwrap();
        let table = tree.child(0).unwrap();
        assert!(matches!(
            engine().dispatch(table),
            Err(Error::MalformedTree(_))
        ));
    }
}
