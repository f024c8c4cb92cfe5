//! Dependency-ordered schema dump.
//!
//! Produces a replayable description of all tables and views: every object
//! is emitted after everything it references, so replaying the dump top to
//! bottom recreates the schema in a valid order. Table blocks are rendered
//! by the surrounding framework and passed in; view blocks are built here
//! from live introspection.
//!
//! Reference detection is the parser module's FROM/JOIN token scan; a
//! reference it cannot recognize simply leaves two objects unordered
//! relative to each other.

use serde::Serialize;
use std::fmt::Write;
use tracing::debug;

use crate::catalog::{IndexDescriptor, ViewDescriptor, ViewKind};
use crate::config::DUMP_HEREDOC_PREFIX;
use crate::connection::Connection;
use crate::ddl::ViewOps;
use crate::dependency::DependencyGraph;
use crate::error::ViewResult;
use crate::parser;

/// Decides which view names stay out of the dump.
pub trait IgnorePolicy {
    fn is_ignored(&self, name: &str) -> bool;
}

/// Supplies index metadata for a materialized view.
pub trait IndexIntrospector {
    fn indexes(&self, conn: &dyn Connection, view_name: &str) -> ViewResult<Vec<IndexDescriptor>>;
}

/// Renders an index into the same textual form used for table indexes.
pub trait IndexRenderer {
    fn assemble(&self, index: &IndexDescriptor) -> String;
}

/// A table block pre-rendered by the external table dumper.
#[derive(Debug, Clone, Serialize)]
pub struct TableDump {
    pub name: String,
    pub block: String,
}

impl TableDump {
    pub fn new(name: &str, block: &str) -> Self {
        TableDump { name: name.to_string(), block: block.to_string() }
    }
}

/// A view block: the descriptor plus its rendered index lines.
#[derive(Debug, Clone, Serialize)]
pub struct ViewDump {
    #[serde(flatten)]
    pub descriptor: ViewDescriptor,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub index_blocks: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DumpEntry {
    Table(TableDump),
    View(ViewDump),
}

impl DumpEntry {
    pub fn name(&self) -> &str {
        match self {
            DumpEntry::Table(table) => &table.name,
            DumpEntry::View(view) => &view.descriptor.name,
        }
    }
}

/// The finished dump, objects already in replay order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchemaDump {
    pub entries: Vec<DumpEntry>,
}

impl SchemaDump {
    /// Write the dump as migration-DSL text.
    pub fn write_to<W: Write>(&self, out: &mut W) -> std::fmt::Result {
        for entry in &self.entries {
            match entry {
                DumpEntry::Table(table) => {
                    writeln!(out, "{}", table.block.trim_end())?;
                    writeln!(out)?;
                }
                DumpEntry::View(view) => view.write_to(out)?,
            }
        }
        Ok(())
    }

    pub fn assemble(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out).expect("writing to a String cannot fail");
        out
    }
}

impl ViewDump {
    /// One replayable `create_view` block: a uniquely delimited multi-line
    /// literal for the definition, explicit force semantics, the
    /// materialized flag when applicable, then the view's index blocks.
    fn write_to<W: Write>(&self, out: &mut W) -> std::fmt::Result {
        let name = &self.descriptor.name;
        let heredelim = format!("{DUMP_HEREDOC_PREFIX}{}", name.to_uppercase());
        let extra_options = if self.descriptor.kind.is_materialized() {
            ", materialized: true"
        } else {
            ""
        };

        writeln!(out, "  create_view \"{name}\", <<-'{heredelim}', :force => true{extra_options}")?;
        for line in self.descriptor.definition.lines() {
            writeln!(out, "    {line}")?;
        }
        writeln!(out, "  {heredelim}")?;
        writeln!(out)?;

        for index in &self.index_blocks {
            writeln!(out, "  add_index \"{name}\", {index}")?;
        }
        if !self.index_blocks.is_empty() {
            writeln!(out)?;
        }
        Ok(())
    }
}

/// Builds a [`SchemaDump`] from live introspection plus the externally
/// rendered table blocks.
pub struct SchemaDumper<'a> {
    ops: &'a ViewOps,
    ignore: &'a dyn IgnorePolicy,
    index_introspector: &'a dyn IndexIntrospector,
    index_renderer: &'a dyn IndexRenderer,
}

impl<'a> SchemaDumper<'a> {
    pub fn new(
        ops: &'a ViewOps,
        ignore: &'a dyn IgnorePolicy,
        index_introspector: &'a dyn IndexIntrospector,
        index_renderer: &'a dyn IndexRenderer,
    ) -> Self {
        SchemaDumper { ops, ignore, index_introspector, index_renderer }
    }

    /// Enumerate, describe and order every object. Tables come first in
    /// the tie-break order; a view is always emitted after everything its
    /// definition references.
    pub fn dump(&self, conn: &dyn Connection, tables: &[TableDump]) -> ViewResult<SchemaDump> {
        let mut graph = DependencyGraph::new();
        let mut blocks: std::collections::HashMap<String, DumpEntry> =
            std::collections::HashMap::new();

        for table in tables {
            graph.add_node(&table.name);
            blocks.insert(table.name.clone(), DumpEntry::Table(table.clone()));
        }

        for view_name in self.ops.views(conn)? {
            if self.ignore.is_ignored(&view_name) {
                debug!(view = %view_name, "skipping ignored view");
                continue;
            }

            let Some((definition, kind)) = self.ops.view_full_definition(conn, &view_name, None)?
            else {
                // listed but gone by describe time; nothing to dump
                continue;
            };

            let mut descriptor = ViewDescriptor::new(&view_name, &definition, kind);
            let mut index_blocks = Vec::new();
            if kind == ViewKind::Materialized {
                descriptor.indexes = self.index_introspector.indexes(conn, &view_name)?;
                index_blocks = descriptor
                    .indexes
                    .iter()
                    .map(|index| self.index_renderer.assemble(index))
                    .collect();
            }

            graph.add_node(&view_name);
            graph.depends(&view_name, &parser::referenced_relations(&descriptor.definition));
            blocks.insert(view_name.clone(), DumpEntry::View(ViewDump { descriptor, index_blocks }));
        }

        let mut entries = Vec::with_capacity(blocks.len());
        for name in graph.sorted()? {
            if let Some(entry) = blocks.remove(&name) {
                entries.push(entry);
            }
        }

        debug!(objects = entries.len(), "schema dump assembled");
        Ok(SchemaDump { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Row;
    use crate::dialect::PostgresDialect;
    use crate::testing::MockConnection;

    struct NoIgnores;
    impl IgnorePolicy for NoIgnores {
        fn is_ignored(&self, _name: &str) -> bool {
            false
        }
    }

    struct IgnorePrefix(&'static str);
    impl IgnorePolicy for IgnorePrefix {
        fn is_ignored(&self, name: &str) -> bool {
            name.starts_with(self.0)
        }
    }

    struct NoIndexes;
    impl IndexIntrospector for NoIndexes {
        fn indexes(&self, _conn: &dyn Connection, _view_name: &str) -> ViewResult<Vec<IndexDescriptor>> {
            Ok(Vec::new())
        }
    }

    struct FixedIndexes(Vec<IndexDescriptor>);
    impl IndexIntrospector for FixedIndexes {
        fn indexes(&self, _conn: &dyn Connection, _view_name: &str) -> ViewResult<Vec<IndexDescriptor>> {
            Ok(self.0.clone())
        }
    }

    struct BasicRenderer;
    impl IndexRenderer for BasicRenderer {
        fn assemble(&self, index: &IndexDescriptor) -> String {
            let columns = index
                .columns
                .iter()
                .map(|c| format!("\"{c}\""))
                .collect::<Vec<_>>()
                .join(", ");
            let mut rendered = format!("[{columns}], name: \"{}\"", index.name);
            if index.unique {
                rendered.push_str(", unique: true");
            }
            if let Some(predicate) = &index.where_predicate {
                rendered.push_str(&format!(", where: \"{predicate}\""));
            }
            rendered
        }
    }

    /// items table + a_ones (selects from items) + ab_ones (selects from
    /// a_ones), with the view list deliberately in reverse dependency order
    fn stub_item_views(conn: &MockConnection) {
        conn.stub(
            "AS viewname",
            vec![
                Row::from_pairs(&[("viewname", Some("ab_ones"))]),
                Row::from_pairs(&[("viewname", Some("a_ones"))]),
            ],
        );
        conn.stub(
            "relname = 'ab_ones'",
            vec![Row::from_pairs(&[
                ("view_definition", Some("SELECT s FROM a_ones WHERE b = 1;")),
                ("relkind", Some("v")),
            ])],
        );
        conn.stub(
            "relname = 'a_ones'",
            vec![Row::from_pairs(&[
                ("view_definition", Some("SELECT b, s FROM items WHERE a = 1;")),
                ("relkind", Some("v")),
            ])],
        );
    }

    fn items_table() -> TableDump {
        TableDump::new(
            "items",
            "  create_table \"items\", force: :cascade do |t|\n    t.integer \"a\"\n    t.integer \"b\"\n    t.string \"s\"\n  end",
        )
    }

    #[test]
    fn test_dump_orders_views_after_their_references() {
        let conn = MockConnection::postgres("appdb");
        stub_item_views(&conn);

        let ops = ViewOps::new(Box::new(PostgresDialect::new()));
        let dump = SchemaDumper::new(&ops, &NoIgnores, &NoIndexes, &BasicRenderer)
            .dump(&conn, &[items_table()])
            .unwrap();

        let names: Vec<&str> = dump.entries.iter().map(DumpEntry::name).collect();
        assert_eq!(names, vec!["items", "a_ones", "ab_ones"]);
    }

    #[test]
    fn test_assembled_text_replays_in_order() {
        let conn = MockConnection::postgres("appdb");
        stub_item_views(&conn);

        let ops = ViewOps::new(Box::new(PostgresDialect::new()));
        let text = SchemaDumper::new(&ops, &NoIgnores, &NoIndexes, &BasicRenderer)
            .dump(&conn, &[items_table()])
            .unwrap()
            .assemble();

        let table_pos = text.find("create_table \"items\"").unwrap();
        let a_ones_pos = text.find("create_view \"a_ones\"").unwrap();
        let ab_ones_pos = text.find("create_view \"ab_ones\"").unwrap();
        assert!(table_pos < a_ones_pos);
        assert!(a_ones_pos < ab_ones_pos);
    }

    #[test]
    fn test_view_block_format() {
        let conn = MockConnection::postgres("appdb");
        stub_item_views(&conn);

        let ops = ViewOps::new(Box::new(PostgresDialect::new()));
        let text = SchemaDumper::new(&ops, &NoIgnores, &NoIndexes, &BasicRenderer)
            .dump(&conn, &[items_table()])
            .unwrap()
            .assemble();

        assert!(text.contains("create_view \"a_ones\", <<-'END_VIEW_A_ONES', :force => true\n"));
        assert!(text.contains("    SELECT b, s FROM items WHERE a = 1\n  END_VIEW_A_ONES\n"));
    }

    #[test]
    fn test_ignored_views_are_excluded() {
        let conn = MockConnection::postgres("appdb");
        stub_item_views(&conn);

        let ops = ViewOps::new(Box::new(PostgresDialect::new()));
        let text = SchemaDumper::new(&ops, &IgnorePrefix("ab_"), &NoIndexes, &BasicRenderer)
            .dump(&conn, &[items_table()])
            .unwrap()
            .assemble();

        assert!(text.contains("create_view \"a_ones\""));
        assert!(!text.contains("\"ab_ones\""));
    }

    #[test]
    fn test_materialized_view_block_carries_flag_and_indexes() {
        let conn = MockConnection::postgres("appdb");
        conn.stub(
            "AS viewname",
            vec![Row::from_pairs(&[("viewname", Some("materialized"))])],
        );
        conn.stub(
            "relname = 'materialized'",
            vec![Row::from_pairs(&[
                ("view_definition", Some("SELECT b, s FROM items WHERE a = 1;")),
                ("relkind", Some("m")),
            ])],
        );

        let indexes = FixedIndexes(vec![
            IndexDescriptor::new("index_materialized_on_s", &["s"]),
            IndexDescriptor::new("index_materialized_unique", &["b"]).unique(),
        ]);

        let ops = ViewOps::new(Box::new(PostgresDialect::new()));
        let text = SchemaDumper::new(&ops, &NoIgnores, &indexes, &BasicRenderer)
            .dump(&conn, &[items_table()])
            .unwrap()
            .assemble();

        assert!(text.contains(
            "create_view \"materialized\", <<-'END_VIEW_MATERIALIZED', :force => true, materialized: true"
        ));
        assert!(text.contains("add_index \"materialized\", [\"s\"], name: \"index_materialized_on_s\""));
        assert!(text.contains("add_index \"materialized\", [\"b\"], name: \"index_materialized_unique\", unique: true"));
    }

    #[test]
    fn test_ordinary_views_skip_index_introspection() {
        struct Exploding;
        impl IndexIntrospector for Exploding {
            fn indexes(&self, _conn: &dyn Connection, _view_name: &str) -> ViewResult<Vec<IndexDescriptor>> {
                panic!("index introspection must not run for ordinary views");
            }
        }

        let conn = MockConnection::postgres("appdb");
        stub_item_views(&conn);

        let ops = ViewOps::new(Box::new(PostgresDialect::new()));
        SchemaDumper::new(&ops, &NoIgnores, &Exploding, &BasicRenderer)
            .dump(&conn, &[items_table()])
            .unwrap();
    }

    #[test]
    fn test_view_blocks_round_trip_through_create() {
        use crate::ddl::ViewOptions;

        let conn = MockConnection::postgres("appdb");
        stub_item_views(&conn);

        let ops = ViewOps::new(Box::new(PostgresDialect::new()));
        let dump = SchemaDumper::new(&ops, &NoIgnores, &NoIndexes, &BasicRenderer)
            .dump(&conn, &[items_table()])
            .unwrap();

        // replay every view block, in dump order, against a fresh
        // connection with the force semantics the block requests
        let replay = MockConnection::postgres("otherdb");
        for entry in &dump.entries {
            if let DumpEntry::View(view) = entry {
                let mut options = ViewOptions::default().with_force();
                if view.descriptor.kind.is_materialized() {
                    options = options.with_materialized();
                }
                ops.create_view(&replay, &view.descriptor.name, view.descriptor.definition.as_str(), options)
                    .unwrap();
            }
        }

        assert_eq!(
            replay.executed_matching("CREATE VIEW"),
            vec![
                "CREATE VIEW \"a_ones\" AS SELECT b, s FROM items WHERE a = 1",
                "CREATE VIEW \"ab_ones\" AS SELECT s FROM a_ones WHERE b = 1",
            ]
        );
    }

    #[test]
    fn test_dump_serializes() {
        let conn = MockConnection::postgres("appdb");
        stub_item_views(&conn);

        let ops = ViewOps::new(Box::new(PostgresDialect::new()));
        let dump = SchemaDumper::new(&ops, &NoIgnores, &NoIndexes, &BasicRenderer)
            .dump(&conn, &[items_table()])
            .unwrap();

        let json = serde_json::to_value(&dump).unwrap();
        let entries = json["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1]["view"]["name"], "a_ones");
        assert_eq!(entries[1]["view"]["kind"], "view");
    }
}
