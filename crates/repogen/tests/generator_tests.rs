//! End-to-end generation tests over the public API.

use repogen::{
    CSharpSqlServerGenerator, CodeGenerator, Column, DataKind, GenerationConfig, Table,
};

fn config() -> GenerationConfig {
    GenerationConfig::from_yaml(
        "model_namespace: Shop.Models\nrepository_namespace: Shop.Repositories\n",
    )
    .unwrap()
}

fn column(name: &str, kind: DataKind) -> Column {
    Column {
        name: name.to_string(),
        kind,
        sql_type: String::new(),
        sql_type_code: 0,
        max_length: 0,
        max_int_length: 0,
        max_decimal_length: 0,
        nullable: false,
        primary_key: false,
        identity: false,
        property_name: String::new(),
        field_name: String::new(),
    }
}

fn orders_table() -> Table {
    let mut id = column("OrderId", DataKind::Int);
    id.primary_key = true;
    id.identity = true;
    let mut reference = column("reference_code", DataKind::String);
    reference.max_length = 20;
    reference.sql_type_code = 231;
    let mut total = column("Total", DataKind::Decimal);
    total.max_int_length = 10;
    total.max_decimal_length = 2;
    let mut placed = column("PlacedAt", DataKind::DateTime);
    placed.nullable = true;
    Table::new("sales", "Orders", vec![id, reference, total, placed])
}

#[test]
fn generates_model_and_repository_for_a_table() {
    let generator = CSharpSqlServerGenerator::new(config()).unwrap();
    let table = orders_table();

    let model = generator.generate_model(&table).unwrap();
    assert!(model.contains("namespace Shop.Models"));
    assert!(model.contains("public partial class Orders : BaseModel"));
    assert!(model.contains("public virtual String ReferenceCode"));
    assert!(model.contains("public virtual DateTime? PlacedAt"));

    let repo = generator.generate_repository(&table).unwrap();
    assert!(repo.contains("namespace Shop.Repositories"));
    assert!(repo.contains(
        "public sealed partial class OrdersRepository : BaseRepository<Orders>, IOrdersRepository"
    ));
    assert_eq!(generator.file_extension(), "cs");
}

#[test]
fn generation_is_deterministic() {
    let generator = CSharpSqlServerGenerator::new(config()).unwrap();
    let table = orders_table();
    assert_eq!(
        generator.generate_model(&table).unwrap(),
        generator.generate_model(&table).unwrap()
    );
    assert_eq!(
        generator.generate_repository(&table).unwrap(),
        generator.generate_repository(&table).unwrap()
    );
}

#[test]
fn renamed_columns_keep_physical_names_in_queries() {
    let generator = CSharpSqlServerGenerator::new(config()).unwrap();
    let repo = generator.generate_repository(&orders_table()).unwrap();
    // "reference_code" pascal-cases to ReferenceCode, so query primitives
    // must fall back to the physical spelling as a literal.
    assert!(repo.contains("new ColumnDefinition(\"reference_code\", typeof(String), \"[nvarchar](20)\""));
    assert!(repo.contains("ReferenceCode = GetString(row, \"reference_code\"),"));
    // Columns whose spelling survives derivation use the checked token.
    assert!(repo.contains("new ColumnDefinition(nameof(Orders.Total)"));
}

#[test]
fn version_axes_change_emitted_syntax() {
    let yaml = "model_namespace: Shop.Models\n\
                repository_namespace: Shop.Repositories\n\
                target_framework: framework35\n\
                csharp_version: csharp3\n";
    let legacy = CSharpSqlServerGenerator::new(GenerationConfig::from_yaml(yaml).unwrap()).unwrap();
    let modern = CSharpSqlServerGenerator::new(config()).unwrap();
    let table = orders_table();

    let legacy_model = legacy.generate_model(&table).unwrap();
    assert!(!legacy_model.contains("[Key]"));
    assert!(!legacy_model.contains("nameof("));
    assert!(legacy_model.contains("get { return _orderId; }"));

    let modern_model = modern.generate_model(&table).unwrap();
    assert!(modern_model.contains("[Key]"));
    assert!(modern_model.contains("[Table(\"Orders\", Schema=\"sales\")]"));
    assert!(modern_model.contains("get => _orderId;"));

    // The null guards always contain "== null"; only the search signature
    // carries per-parameter defaults.
    let legacy_repo = legacy.generate_repository(&table).unwrap();
    assert!(legacy_repo.contains("Int32? orderId,"));
    assert!(!legacy_repo.contains("orderId = null"));
    let modern_repo = modern.generate_repository(&table).unwrap();
    assert!(modern_repo.contains("Int32? orderId = null,"));
}

#[test]
fn keyword_named_columns_are_escaped() {
    let mut id = column("Id", DataKind::Int);
    id.primary_key = true;
    let namespace = column("Namespace", DataKind::String);
    let table = Table::new("dbo", "Symbols", vec![id, namespace]);
    let generator = CSharpSqlServerGenerator::new(config()).unwrap();

    let model = generator.generate_model(&table).unwrap();
    assert!(model.contains("private String _namespace;"));
    assert!(model.contains("public virtual String Namespace"));

    let repo = generator.generate_repository(&table).unwrap();
    assert!(repo.contains("String @namespace"));
    assert!(repo.contains("FindByNamespace(FindComparison.Equals, @namespace);"));
}

#[test]
fn duplicate_derived_names_get_numeric_suffixes() {
    let mut id = column("Id", DataKind::Int);
    id.primary_key = true;
    let a = column("user_name", DataKind::String);
    let b = column("UserName", DataKind::String);
    let table = Table::new("dbo", "Accounts", vec![id, a, b]);
    let generator = CSharpSqlServerGenerator::new(config()).unwrap();

    let model = generator.generate_model(&table).unwrap();
    assert!(model.contains("public virtual String UserName"));
    assert!(model.contains("public virtual String UserName2"));
}

#[test]
fn invalid_configuration_fails_before_any_generation() {
    let mut bad = config();
    bad.class_name_format = "Entity".to_string();
    let err = match CSharpSqlServerGenerator::new(bad) {
        Ok(_) => panic!("template without the {{Name}} token must be rejected"),
        Err(e) => e,
    };
    assert!(err.to_string().contains("{Name}"));
}
