use nl2sql_engine::compiler::SqlCompiler;
use nl2sql_engine::error::{CompileError, GENERIC_FAILURE};
use nl2sql_engine::relationship::{Relationship, Resolver};
use nl2sql_engine::schema::Catalog;

const SCHEMA: &str = "\
Table: customers
- id (int, primary key)
- name (varchar)
- user_id (int, foreign key)

Table: users
- id (int, primary key)
- username (varchar)
";

#[test]
fn test_end_to_end_username_query() {
    let compiler = SqlCompiler::default();
    let sql = compiler.compile("get name where username = 'alice'", SCHEMA);

    assert_eq!(
        sql,
        "SELECT t1.name\n\
         FROM customers t1\n\
         JOIN users t2 ON t1.user_id = t2.id\n\
         WHERE t2.username = 'alice'"
    );
}

#[test]
fn test_schema_parsing_feeds_relationship_resolution() {
    let catalog = Catalog::parse(SCHEMA);
    assert_eq!(catalog.len(), 2);

    let rel = Resolver::default()
        .resolve(&catalog, "customers", "users")
        .unwrap();
    assert_eq!(
        rel,
        Relationship {
            source_column: "user_id".to_string(),
            target_column: "id".to_string(),
        }
    );
}

#[test]
fn test_missing_filter_yields_generic_error_regardless_of_schema() {
    let compiler = SqlCompiler::default();

    for schema in [SCHEMA, "", "Table: users\n- id (int, primary key)\n"] {
        assert_eq!(compiler.compile("list all customers", schema), GENERIC_FAILURE);
    }
}

#[test]
fn test_missing_users_table_yields_generic_error() {
    let schema = "\
Table: customers
- id (int, primary key)
- name (varchar)
- user_id (int, foreign key)
";
    let compiler = SqlCompiler::default();

    assert_eq!(
        compiler.compile("customers where username = 'alice'", schema),
        GENERIC_FAILURE
    );
    // The tagged cause is still visible internally
    assert_eq!(
        compiler
            .translate("customers where username = 'alice'", schema)
            .unwrap_err(),
        CompileError::NoUsersTable
    );
}

#[test]
fn test_larger_schema_with_prompt_table_selection() {
    let schema = "\
Table: orders
- id (int, primary key)
- total (decimal)
- placed_at (timestamp)
- user_id (int, foreign key)

Table: customers
- id (int, primary key)
- name (varchar)
- user_id (int, foreign key)

Table: users
- id (int, primary key)
- username (varchar)
- email (varchar)
";
    let compiler = SqlCompiler::default();

    let sql = compiler.compile("show orders where username = 'bob'", schema);
    assert_eq!(
        sql,
        "SELECT t1.total, t1.placed_at\n\
         FROM orders t1\n\
         JOIN users t2 ON t1.user_id = t2.id\n\
         WHERE t2.username = 'bob'"
    );

    // A prompt naming no table falls back to `customers`
    let sql = compiler.compile("anything where username = 'bob'", schema);
    assert!(sql.starts_with("SELECT t1.name\nFROM customers t1\n"));
}

#[test]
fn test_every_call_is_independent() {
    let compiler = SqlCompiler::default();

    let first = compiler.compile("get name where username = 'alice'", SCHEMA);
    let _ = compiler.compile("nonsense", "");
    let second = compiler.compile("get name where username = 'alice'", SCHEMA);

    assert_eq!(first, second);
}
