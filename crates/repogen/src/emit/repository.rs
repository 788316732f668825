//! Repository interface and implementation emission.
//!
//! Selects one of three key-cardinality regimes per table (no key, single
//! key, composite key) and emits the matching operation set: CRUD, bulk
//! operations, merge, row materialization, predicate search, and per-column
//! find lookups.

use crate::naming;
use crate::schema::{Column, Table};
use crate::typemap::{self, SuppliedCheck};
use crate::version::VersionGate;

use super::{CSharpSqlServerGenerator, CodeWriter};

/// Column values per emitted line in long argument lists.
const VALUES_PER_LINE: usize = 5;

struct RepoCtx<'a> {
    gate: &'a VersionGate,
    table: &'a Table,
    /// Templated model class name.
    model: String,
    /// Auxiliary key-tuple type name (composite keys only).
    keys: String,
    /// Repository class name.
    repo: String,
    /// Repository interface name.
    iface: String,
    /// Parameter identifier used for whole-item operations.
    item_param: String,
}

impl<'a> RepoCtx<'a> {
    fn pks(&self) -> Vec<&'a Column> {
        self.table.columns.iter().filter(|c| c.primary_key).collect()
    }

    fn non_pks(&self) -> Vec<&'a Column> {
        self.table.columns.iter().filter(|c| !c.primary_key).collect()
    }

    fn property_identity(&self, col: &Column) -> String {
        self.gate.property_identity(&self.model, &col.property_name)
    }

    fn column_identity(&self, col: &Column) -> String {
        self.gate.column_identity(&self.model, col)
    }

    /// "Int32 userId, Guid groupId" for the composite positional overloads.
    fn pk_param_list(&self) -> String {
        self.pks()
            .iter()
            .map(|pk| format!("{} {}", typemap::clr_type(pk.kind), pk.field_name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub(super) fn generate(generator: &CSharpSqlServerGenerator, table: &Table) -> String {
    let config = &generator.config;
    let model = generator.model_class(table);
    let ctx = RepoCtx {
        gate: &generator.gate,
        table,
        keys: format!("{model}Keys"),
        repo: format!("{}Repository", table.class_name),
        iface: format!("I{}Repository", table.class_name),
        item_param: naming::escape_field(&naming::camel_case(&table.class_name)),
        model,
    };
    let mut w = CodeWriter::new();

    w.line(0, &format!("using {}.Base;", config.repository_namespace));
    w.line(0, &format!("using {};", config.model_namespace));
    w.line(0, "using System;");
    w.line(0, "using System.Collections.Generic;");
    w.line(0, "using System.Data;");
    w.line(0, "using System.Data.SqlClient;");
    w.line(0, "using System.Linq;");
    w.line(0, "using System.Xml;");
    w.line(0, "using Dapper;");
    w.blank();

    w.line(0, &format!("namespace {}", config.repository_namespace));
    w.line(0, "{");
    if let Some(wrapper) = &generator.wrapper {
        w.raw(&wrapper.generate_repo_wrapper(table));
    }

    if table.has_composite_key() {
        emit_keys_class(&mut w, &ctx);
    }

    emit_interface(&mut w, &ctx);

    w.line(
        1,
        &format!(
            "public sealed partial class {} : BaseRepository<{}>, {}",
            ctx.repo, ctx.model, ctx.iface
        ),
    );
    w.line(1, "{");
    emit_constructors(&mut w, &ctx);
    emit_get(&mut w, &ctx);
    emit_create(&mut w, &ctx);
    if table.has_pk() {
        emit_update(&mut w, &ctx);
        emit_delete(&mut w, &ctx);
        emit_merge(&mut w, &ctx);
    } else {
        emit_delete_by(&mut w, &ctx);
    }
    emit_to_item(&mut w, &ctx);
    emit_search(&mut w, &ctx);
    emit_find(&mut w, &ctx);
    w.line(1, "}");
    w.line(0, "}");
    w.finish()
}

fn emit_keys_class(w: &mut CodeWriter, ctx: &RepoCtx) {
    let pks = ctx.pks();
    w.line(1, &format!("public class {}", ctx.keys));
    w.line(1, "{");
    for pk in &pks {
        w.line(
            2,
            &format!(
                "public {} {} {{ get; set; }}",
                typemap::clr_type(pk.kind),
                pk.property_name
            ),
        );
    }
    w.blank();
    w.line(2, &format!("public {}() {{ }}", ctx.keys));
    w.blank();
    w.line(2, &format!("public {}(", ctx.keys));
    for (i, pk) in pks.iter().enumerate() {
        let end = if i + 1 == pks.len() { ")" } else { "," };
        w.line(
            3,
            &format!("{} {}{}", typemap::clr_type(pk.kind), pk.field_name, end),
        );
    }
    w.line(2, "{");
    for pk in &pks {
        w.line(3, &format!("{} = {};", pk.property_name, pk.field_name));
    }
    w.line(2, "}");
    w.line(1, "}");
}

fn emit_interface(w: &mut CodeWriter, ctx: &RepoCtx) {
    let pks = ctx.pks();
    let base = if pks.len() == 1 {
        format!("IPkRepository<{}>", ctx.model)
    } else {
        format!("IBaseRepository<{}>", ctx.model)
    };
    w.line(
        1,
        &format!("public partial interface {} : {}", ctx.iface, base),
    );
    w.line(1, "{");

    if ctx.table.has_composite_key() {
        let params = ctx.pk_param_list();
        w.line(2, &format!("{} Get({});", ctx.model, params));
        w.line(2, &format!("{} Get({} compositeId);", ctx.model, ctx.keys));
        w.line(
            2,
            &format!("IEnumerable<{}> Get(List<{}> compositeIds);", ctx.model, ctx.keys),
        );
        w.line(
            2,
            &format!("IEnumerable<{}> Get(params {}[] compositeIds);", ctx.model, ctx.keys),
        );
        w.blank();
        w.line(2, &format!("bool Update({} item);", ctx.model));
        w.line(2, &format!("bool Delete({});", params));
        w.line(2, &format!("bool Delete({} compositeId);", ctx.keys));
        w.line(
            2,
            &format!("bool Delete(IEnumerable<{}> compositeIds);", ctx.keys),
        );
        w.line(2, &format!("bool Merge(List<{}> items);", ctx.model));
        w.blank();
    } else if let [pk] = pks.as_slice() {
        let ty = typemap::clr_type(pk.kind);
        let f = &pk.field_name;
        w.line(2, &format!("{} Get({ty} {f});", ctx.model));
        w.line(
            2,
            &format!("IEnumerable<{}> Get(List<{ty}> {f}s);", ctx.model),
        );
        w.line(
            2,
            &format!("IEnumerable<{}> Get(params {ty}[] {f}s);", ctx.model),
        );
        w.blank();
        w.line(2, &format!("bool Update({} item);", ctx.model));
        w.line(2, &format!("bool Delete({ty} {f});"));
        w.line(2, &format!("bool Delete(IEnumerable<{ty}> {f}s);"));
        w.line(2, &format!("bool Merge(List<{}> items);", ctx.model));
        w.blank();
    } else {
        for col in &ctx.table.columns {
            w.line(
                2,
                &format!(
                    "bool DeleteBy{}({} {});",
                    col.property_name,
                    typemap::clr_type(col.kind),
                    col.field_name
                ),
            );
        }
        w.blank();
    }

    w.line(2, &format!("IEnumerable<{}> Search(", ctx.model));
    emit_search_params(w, ctx, ");");

    if ctx.table.has_composite_key() {
        w.blank();
        // Find methods on the key columns are available since no single
        // aggregate Get-by-key exists.
        for pk in &pks {
            emit_find_signatures(w, ctx, pk);
        }
    }
    w.blank();
    for col in ctx.non_pks() {
        emit_find_signatures(w, ctx, col);
    }

    w.line(1, "}");
}

fn emit_find_signatures(w: &mut CodeWriter, ctx: &RepoCtx, col: &Column) {
    let ty = typemap::find_param_type(col.kind);
    w.line(
        2,
        &format!(
            "IEnumerable<{}> FindBy{}({ty} {});",
            ctx.model, col.property_name, col.field_name
        ),
    );
    w.line(
        2,
        &format!(
            "IEnumerable<{}> FindBy{}(FindComparison comparison, {ty} {});",
            ctx.model, col.property_name, col.field_name
        ),
    );
}

fn emit_constructors(w: &mut CodeWriter, ctx: &RepoCtx) {
    w.line(
        2,
        &format!(
            "public {}(string connectionString) : this(connectionString, exception => {{ }}) {{ }}",
            ctx.repo
        ),
    );
    w.line(
        2,
        &format!(
            "public {}(string connectionString, Action<Exception> logMethod) : base(connectionString, logMethod,",
            ctx.repo
        ),
    );
    w.line(
        3,
        &format!(
            "\"{}\", \"{}\", {})",
            ctx.table.schema,
            ctx.table.name,
            ctx.table.columns.len()
        ),
    );
    w.line(2, "{");
    for col in &ctx.table.columns {
        w.line(
            3,
            &format!(
                "Columns.Add(new ColumnDefinition({}, typeof({}), \"[{}]{}\", {}, {}, {}));",
                ctx.column_identity(col),
                typemap::clr_type(col.kind),
                col.sql_type,
                typemap::sql_length_suffix(col),
                col.nullable,
                col.primary_key,
                col.identity
            ),
        );
    }
    w.line(2, "}");
}

fn emit_get(w: &mut CodeWriter, ctx: &RepoCtx) {
    let pks = ctx.pks();
    if ctx.table.has_composite_key() {
        let params = ctx.pk_param_list();

        w.blank();
        w.line(2, &format!("public {} Get({params})", ctx.model));
        w.line(2, "{");
        let chain = pks
            .iter()
            .map(|pk| format!("{}, Comparison.Equals, {}", ctx.column_identity(pk), pk.field_name))
            .collect::<Vec<_>>()
            .join(").And(");
        w.line(
            3,
            &format!("return Where({chain}).Results().FirstOrDefault();"),
        );
        w.line(2, "}");

        w.blank();
        w.line(
            2,
            &format!("public {} Get({} compositeId)", ctx.model, ctx.keys),
        );
        w.line(2, "{");
        let chain = pks
            .iter()
            .map(|pk| {
                format!(
                    "{}, Comparison.Equals, compositeId.{}",
                    ctx.column_identity(pk),
                    pk.property_name
                )
            })
            .collect::<Vec<_>>()
            .join(").And(");
        w.line(
            3,
            &format!("return Where({chain}).Results().FirstOrDefault();"),
        );
        w.line(2, "}");

        w.blank();
        w.line(
            2,
            &format!(
                "public IEnumerable<{}> Get(List<{}> compositeIds)",
                ctx.model, ctx.keys
            ),
        );
        w.line(2, "{");
        w.line(3, "return Get(compositeIds.ToArray());");
        w.line(2, "}");

        w.blank();
        w.line(
            2,
            &format!(
                "public IEnumerable<{}> Get(params {}[] compositeIds)",
                ctx.model, ctx.keys
            ),
        );
        w.line(2, "{");
        let chain = pks
            .iter()
            .map(|pk| {
                format!(
                    "{}, Comparison.In, compositeIds.Select(x => x.{}).ToList()",
                    ctx.column_identity(pk),
                    pk.property_name
                )
            })
            .collect::<Vec<_>>()
            .join(").Or(");
        w.line(3, &format!("var result = Where({chain}).Results().ToArray();"));
        w.line(
            3,
            &format!("var filteredResults = new List<{}>();", ctx.model),
        );
        w.blank();
        w.line(3, "foreach (var compositeKey in compositeIds)");
        w.line(3, "{");
        let tuple_match = pks
            .iter()
            .map(|pk| format!("x.{0} == compositeKey.{0}", pk.property_name))
            .collect::<Vec<_>>()
            .join(" && ");
        w.line(
            4,
            &format!("filteredResults.AddRange(result.Where(x => {tuple_match}));"),
        );
        w.line(3, "}");
        w.line(3, "return filteredResults;");
        w.line(2, "}");
    } else if let [pk] = pks.as_slice() {
        let ty = typemap::clr_type(pk.kind);
        let f = &pk.field_name;
        let identity = ctx.column_identity(pk);

        w.blank();
        w.line(2, &format!("public {} Get({ty} {f})", ctx.model));
        w.line(2, "{");
        w.line(
            3,
            &format!("return Where({identity}, Comparison.Equals, {f}).Results().FirstOrDefault();"),
        );
        w.line(2, "}");

        w.blank();
        w.line(
            2,
            &format!("public IEnumerable<{}> Get(List<{ty}> {f}s)", ctx.model),
        );
        w.line(2, "{");
        w.line(3, &format!("return Get({f}s.ToArray());"));
        w.line(2, "}");

        w.blank();
        w.line(
            2,
            &format!("public IEnumerable<{}> Get(params {ty}[] {f}s)", ctx.model),
        );
        w.line(2, "{");
        w.line(
            3,
            &format!("return Where({identity}, Comparison.In, {f}s).Results();"),
        );
        w.line(2, "}");
    }
}

fn emit_create(w: &mut CodeWriter, ctx: &RepoCtx) {
    let pks = ctx.pks();
    let all_cols: Vec<&Column> = ctx.table.columns.iter().collect();

    w.blank();
    w.line(2, &format!("public override bool Create({} item)", ctx.model));
    w.line(2, "{");
    w.line(3, "if (item == null)");
    w.line(4, "return false;");
    w.blank();
    w.line(3, "var validationErrors = item.Validate();");
    w.line(3, "if (validationErrors.Any())");
    w.line(4, "throw new ValidationException(validationErrors);");
    w.blank();
    emit_value_list(w, 3, "var createdKeys = BaseCreate(", &all_cols, ");");
    w.line(3, "if (createdKeys.Count != Columns.Count(x => x.PrimaryKey))");
    w.line(4, "return false;");
    w.blank();
    for pk in &pks {
        w.line(
            3,
            &format!(
                "item.{} = ({})createdKeys[{}];",
                pk.property_name,
                typemap::clr_type(pk.kind),
                ctx.property_identity(pk)
            ),
        );
    }
    w.line(3, "item.ResetDirty();");
    w.blank();
    w.line(3, "return true;");
    w.line(2, "}");

    // Identity key columns are assigned by the database and stay out of
    // the bulk row set; natural keys are included.
    let bulk_cols: Vec<&Column> = ctx
        .table
        .columns
        .iter()
        .filter(|c| !c.primary_key || !c.identity)
        .collect();

    w.blank();
    w.line(
        2,
        &format!("public override bool BulkCreate(params {}[] items)", ctx.model),
    );
    w.line(2, "{");
    w.line(3, "if (!items.Any())");
    w.line(4, "return false;");
    w.blank();
    w.line(
        3,
        "var validationErrors = items.SelectMany(x => x.Validate()).ToList();",
    );
    w.line(3, "if (validationErrors.Any())");
    w.line(4, "throw new ValidationException(validationErrors);");
    w.blank();
    w.line(3, "var dt = new DataTable();");
    w.line(
        3,
        "foreach (var mergeColumn in Columns.Where(x => !x.PrimaryKey || x.PrimaryKey && !x.Identity))",
    );
    w.line(4, "dt.Columns.Add(mergeColumn.ColumnName, mergeColumn.ValueType);");
    w.blank();
    w.line(3, "foreach (var item in items)");
    w.line(3, "{");
    emit_value_list(w, 4, "dt.Rows.Add(", &bulk_cols, ");");
    w.line(3, "}");
    w.blank();
    w.line(3, "return BulkInsert(dt);");
    w.line(2, "}");

    w.blank();
    w.line(
        2,
        &format!("public override bool BulkCreate(List<{}> items)", ctx.model),
    );
    w.line(2, "{");
    w.line(3, "return BulkCreate(items.ToArray());");
    w.line(2, "}");
}

fn emit_update(w: &mut CodeWriter, ctx: &RepoCtx) {
    let all_cols: Vec<&Column> = ctx.table.columns.iter().collect();

    w.blank();
    w.line(2, &format!("public bool Update({} item)", ctx.model));
    w.line(2, "{");
    w.line(3, "if (item == null)");
    w.line(4, "return false;");
    w.blank();
    w.line(3, "var validationErrors = item.Validate();");
    w.line(3, "if (validationErrors.Any())");
    w.line(4, "throw new ValidationException(validationErrors);");
    w.blank();
    emit_value_list(w, 3, "var success = BaseUpdate(item.DirtyColumns, ", &all_cols, ");");
    w.blank();
    w.line(3, "if (success)");
    w.line(4, "item.ResetDirty();");
    w.blank();
    w.line(3, "return success;");
    w.line(2, "}");
}

fn emit_delete(w: &mut CodeWriter, ctx: &RepoCtx) {
    let pks = ctx.pks();
    let item = &ctx.item_param;

    if let [pk] = pks.as_slice() {
        let ty = typemap::clr_type(pk.kind);
        let f = &pk.field_name;
        let prop = &pk.property_name;
        let identity = ctx.column_identity(pk);

        w.blank();
        w.line(2, &format!("public bool Delete({} {item})", ctx.model));
        w.line(2, "{");
        w.line(3, &format!("if ({item} == null)"));
        w.line(4, "return false;");
        w.blank();
        w.line(
            3,
            &format!("var deleteColumn = new DeleteColumn({identity}, {item}.{prop});"),
        );
        w.blank();
        w.line(3, "return BaseDelete(deleteColumn);");
        w.line(2, "}");

        w.blank();
        w.line(
            2,
            &format!("public bool Delete(IEnumerable<{}> items)", ctx.model),
        );
        w.line(2, "{");
        w.line(3, "if (!items.Any())");
        w.line(4, "return true;");
        w.blank();
        w.line(3, "var deleteValues = new List<object>();");
        w.line(3, "foreach (var item in items)");
        w.line(3, "{");
        w.line(4, &format!("deleteValues.Add(item.{prop});"));
        w.line(3, "}");
        w.blank();
        w.line(3, &format!("return BaseDelete({identity}, deleteValues);"));
        w.line(2, "}");

        w.blank();
        w.line(2, &format!("public bool Delete({ty} {f})"));
        w.line(2, "{");
        w.line(
            3,
            &format!("return Delete(new {} {{ {prop} = {f} }});", ctx.model),
        );
        w.line(2, "}");

        w.blank();
        w.line(2, &format!("public bool Delete(IEnumerable<{ty}> {f}s)"));
        w.line(2, "{");
        w.line(
            3,
            &format!(
                "return Delete({f}s.Select(x => new {} {{ {prop} = x }}));",
                ctx.model
            ),
        );
        w.line(2, "}");
        return;
    }

    // Composite key: every delete funnels into the staged, set-based
    // collection overload so the key tuple always matches in full.
    let params = ctx.pk_param_list();
    let ctor_args = pks
        .iter()
        .map(|pk| pk.field_name.clone())
        .collect::<Vec<_>>()
        .join(", ");

    w.blank();
    w.line(2, &format!("public bool Delete({} {item})", ctx.model));
    w.line(2, "{");
    w.line(3, &format!("if ({item} == null)"));
    w.line(4, "return false;");
    w.blank();
    let from_item = pks
        .iter()
        .map(|pk| format!("{0} = {item}.{0}", pk.property_name))
        .collect::<Vec<_>>()
        .join(", ");
    w.line(
        3,
        &format!("return Delete(new {} {{ {from_item} }});", ctx.keys),
    );
    w.line(2, "}");

    w.blank();
    w.line(2, &format!("public bool Delete({params})"));
    w.line(2, "{");
    w.line(3, &format!("return Delete(new {}({ctor_args}));", ctx.keys));
    w.line(2, "}");

    w.blank();
    w.line(2, &format!("public bool Delete({} compositeId)", ctx.keys));
    w.line(2, "{");
    w.line(3, "return Delete(new[] { compositeId });");
    w.line(2, "}");

    w.blank();
    w.line(
        2,
        &format!("public bool Delete(IEnumerable<{}> compositeIds)", ctx.keys),
    );
    w.line(2, "{");
    w.line(3, "if (!compositeIds.Any())");
    w.line(4, "return true;");
    w.blank();
    w.line(3, "var tempTableName = $\"staging{Guid.NewGuid():N}\";");
    w.line(3, "var dt = new DataTable();");
    w.line(3, "foreach (var mergeColumn in Columns.Where(x => x.PrimaryKey))");
    w.line(3, "{");
    w.line(4, "dt.Columns.Add(mergeColumn.ColumnName, mergeColumn.ValueType);");
    w.line(3, "}");
    w.blank();
    w.line(3, "foreach (var compositeId in compositeIds)");
    w.line(3, "{");
    let row_args = pks
        .iter()
        .map(|pk| format!("compositeId.{}", pk.property_name))
        .collect::<Vec<_>>()
        .join(", ");
    w.line(4, &format!("dt.Rows.Add({row_args});"));
    w.line(3, "}");
    w.blank();
    w.line(3, "CreateStagingTable(tempTableName, true);");
    w.line(3, "BulkInsert(dt, tempTableName);");
    w.line(3, "using (var cn = new SqlConnection(ConnectionString))");
    w.line(3, "{");
    w.line(4, "return cn.Execute($@\";WITH cte AS (");
    w.line(
        6,
        &format!("SELECT * FROM {}.{} o", ctx.table.schema, ctx.table.name),
    );
    let key_match = pks
        .iter()
        .map(|pk| format!("i.[{0}] = o.[{0}]", pk.name))
        .collect::<Vec<_>>()
        .join(" AND ");
    w.line(
        6,
        &format!("WHERE EXISTS (SELECT 'x' FROM {{tempTableName}} i WHERE {key_match}))"),
    );
    w.line(6, "DELETE FROM cte\") > 0;");
    w.line(3, "}");
    w.line(2, "}");
}

fn emit_delete_by(w: &mut CodeWriter, ctx: &RepoCtx) {
    for col in &ctx.table.columns {
        w.blank();
        w.line(
            2,
            &format!(
                "public bool DeleteBy{}({} {})",
                col.property_name,
                typemap::clr_type(col.kind),
                col.field_name
            ),
        );
        w.line(2, "{");
        w.line(
            3,
            &format!(
                "return BaseDelete(new DeleteColumn({}, {}));",
                ctx.column_identity(col),
                col.field_name
            ),
        );
        w.line(2, "}");
    }
}

fn emit_merge(w: &mut CodeWriter, ctx: &RepoCtx) {
    w.blank();
    w.line(2, &format!("public bool Merge(List<{}> items)", ctx.model));
    w.line(2, "{");
    w.line(3, "var mergeTable = new List<object[]>();");
    w.line(3, "foreach (var item in items)");
    w.line(3, "{");
    w.line(4, "mergeTable.Add(new object[]");
    w.line(4, "{");
    let count = ctx.table.columns.len();
    for (i, col) in ctx.table.columns.iter().enumerate() {
        let entry = if col.primary_key {
            format!("item.{}", col.property_name)
        } else {
            format!(
                "item.{}, item.DirtyColumns.Contains({})",
                col.property_name,
                ctx.property_identity(col)
            )
        };
        let end = if i + 1 == count { "" } else { "," };
        w.line(5, &format!("{entry}{end}"));
    }
    w.line(4, "});");
    w.line(3, "}");
    w.blank();
    w.line(3, "return BaseMerge(mergeTable);");
    w.line(2, "}");
}

fn emit_to_item(w: &mut CodeWriter, ctx: &RepoCtx) {
    w.blank();
    w.line(
        2,
        &format!("protected override {} ToItem(DataRow row)", ctx.model),
    );
    w.line(2, "{");
    w.line(3, &format!("var item = new {}", ctx.model));
    w.line(3, "{");
    for col in &ctx.table.columns {
        w.line(
            4,
            &format!(
                "{} = {}(row, {}),",
                col.property_name,
                typemap::row_accessor(col),
                ctx.column_identity(col)
            ),
        );
    }
    w.line(3, "};");
    w.blank();
    w.line(3, "item.ResetDirty();");
    w.line(3, "return item;");
    w.line(2, "}");
}

fn emit_search(w: &mut CodeWriter, ctx: &RepoCtx) {
    w.blank();
    w.line(2, &format!("public IEnumerable<{}> Search(", ctx.model));
    emit_search_params(w, ctx, ")");
    w.line(2, "{");
    w.line(3, "var queries = new List<QueryItem>();");
    w.blank();
    for col in &ctx.table.columns {
        let f = &col.field_name;
        let check = match typemap::supplied_check(col.kind) {
            SuppliedCheck::HasValue => format!("{f}.HasValue"),
            SuppliedCheck::NonEmptyString => format!("!string.IsNullOrEmpty({f})"),
            SuppliedCheck::HasElements => format!("{f}.Any()"),
            SuppliedCheck::NotNull => format!("{f} != null"),
        };
        let hint = if typemap::needs_type_hint(col.kind) {
            ", typeof(XmlDocument)"
        } else {
            ""
        };
        w.line(3, &format!("if ({check})"));
        w.line(
            4,
            &format!(
                "queries.Add(new QueryItem({}, {f}{hint}));",
                ctx.column_identity(col)
            ),
        );
    }
    w.blank();
    w.line(3, "return BaseSearch(queries);");
    w.line(2, "}");
}

/// Emit the per-column search parameter list, one parameter per line.
fn emit_search_params(w: &mut CodeWriter, ctx: &RepoCtx, terminator: &str) {
    let cols = &ctx.table.columns;
    let default = if ctx.gate.optional_parameters() {
        " = null"
    } else {
        ""
    };
    for (i, col) in cols.iter().enumerate() {
        let end = if i + 1 == cols.len() { terminator } else { "," };
        w.line(
            3,
            &format!(
                "{} {}{default}{end}",
                typemap::search_param_type(col.kind),
                col.field_name
            ),
        );
    }
}

fn emit_find(w: &mut CodeWriter, ctx: &RepoCtx) {
    if ctx.table.has_composite_key() {
        // No single aggregate Get-by-key exists, so the key columns get
        // find methods too.
        for pk in ctx.pks() {
            emit_find_pair(w, ctx, pk);
        }
    }
    for col in ctx.non_pks() {
        emit_find_pair(w, ctx, col);
    }
}

fn emit_find_pair(w: &mut CodeWriter, ctx: &RepoCtx, col: &Column) {
    let ty = typemap::find_param_type(col.kind);
    let f = &col.field_name;
    let prop = &col.property_name;
    let hint = if typemap::needs_type_hint(col.kind) {
        ", typeof(XmlDocument)"
    } else {
        ""
    };

    w.blank();
    w.line(
        2,
        &format!("public IEnumerable<{}> FindBy{prop}({ty} {f})", ctx.model),
    );
    w.line(2, "{");
    w.line(3, &format!("return FindBy{prop}(FindComparison.Equals, {f});"));
    w.line(2, "}");

    w.blank();
    w.line(
        2,
        &format!(
            "public IEnumerable<{}> FindBy{prop}(FindComparison comparison, {ty} {f})",
            ctx.model
        ),
    );
    w.line(2, "{");
    w.line(
        3,
        &format!(
            "return Where({}, (Comparison)Enum.Parse(typeof(Comparison), comparison.ToString()), {f}{hint}).Results();",
            ctx.column_identity(col)
        ),
    );
    w.line(2, "}");
}

/// Emit `prefix item.A, item.B, ... suffix` wrapped five values per line,
/// continuation lines one level deeper.
fn emit_value_list(
    w: &mut CodeWriter,
    level: usize,
    prefix: &str,
    cols: &[&Column],
    suffix: &str,
) {
    let values: Vec<String> = cols
        .iter()
        .map(|c| format!("item.{}", c.property_name))
        .collect();
    if values.is_empty() {
        w.line(level, &format!("{prefix}{suffix}"));
        return;
    }
    let chunks: Vec<&[String]> = values.chunks(VALUES_PER_LINE).collect();
    let last = chunks.len() - 1;
    for (i, chunk) in chunks.iter().enumerate() {
        let joined = chunk.join(", ");
        let text = match (i == 0, i == last) {
            (true, true) => format!("{prefix}{joined}{suffix}"),
            (true, false) => format!("{prefix}{joined},"),
            (false, true) => format!("{joined}{suffix}"),
            (false, false) => format!("{joined},"),
        };
        w.line(if i == 0 { level } else { level + 1 }, &text);
    }
}

#[cfg(test)]
mod tests {
    use crate::config::GenerationConfig;
    use crate::emit::{CSharpSqlServerGenerator, CodeGenerator, RepoWrapper};
    use crate::schema::{Column, DataKind, Table};
    use crate::version::{CSharpVersion, TargetFramework};

    fn col(name: &str, kind: DataKind) -> Column {
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

    fn generator() -> CSharpSqlServerGenerator {
        CSharpSqlServerGenerator::new(GenerationConfig {
            model_namespace: "App.Models".to_string(),
            repository_namespace: "App.Repositories".to_string(),
            class_name_format: "{Name}".to_string(),
            target_framework: TargetFramework::Framework45,
            csharp_version: CSharpVersion::CSharp7,
        })
        .unwrap()
    }

    fn single_key_table() -> Table {
        let mut id = col("Id", DataKind::Int);
        id.primary_key = true;
        id.identity = true;
        let name = col("Name", DataKind::String);
        Table::new("dbo", "Users", vec![id, name])
    }

    fn composite_key_table() -> Table {
        let mut user_id = col("UserId", DataKind::Int);
        user_id.primary_key = true;
        let mut group_id = col("GroupId", DataKind::Guid);
        group_id.primary_key = true;
        let role = col("Role", DataKind::String);
        Table::new("dbo", "Memberships", vec![user_id, group_id, role])
    }

    fn keyless_table() -> Table {
        let at = col("At", DataKind::DateTime);
        let message = col("Message", DataKind::String);
        Table::new("log", "Entries", vec![at, message])
    }

    #[test]
    fn test_single_key_repository_surface() {
        let output = generator()
            .generate_repository(&single_key_table())
            .unwrap();
        assert!(output.contains(
            "public partial interface IUsersRepository : IPkRepository<Users>"
        ));
        assert!(output.contains(
            "public sealed partial class UsersRepository : BaseRepository<Users>, IUsersRepository"
        ));
        assert!(output.contains("public Users Get(Int32 id)"));
        assert!(output.contains("public IEnumerable<Users> Get(List<Int32> ids)"));
        assert!(output.contains("public IEnumerable<Users> Get(params Int32[] ids)"));
        assert!(output.contains("public override bool Create(Users item)"));
        assert!(output.contains("public bool Update(Users item)"));
        assert!(output.contains("public bool Delete(Int32 id)"));
        assert!(output.contains("public bool Merge(List<Users> items)"));
        assert!(!output.contains("DeleteBy"));
        assert!(!output.contains("UsersKeys"));
    }

    #[test]
    fn test_single_key_create_assigns_generated_key() {
        let output = generator()
            .generate_repository(&single_key_table())
            .unwrap();
        assert!(output.contains("var createdKeys = BaseCreate(item.Id, item.Name);"));
        assert!(output.contains(
            "if (createdKeys.Count != Columns.Count(x => x.PrimaryKey))"
        ));
        assert!(output.contains("item.Id = (Int32)createdKeys[nameof(Users.Id)];"));
        assert!(output.contains("item.ResetDirty();"));
    }

    #[test]
    fn test_bulk_create_excludes_identity_key_columns() {
        let output = generator()
            .generate_repository(&single_key_table())
            .unwrap();
        assert!(output.contains(
            "foreach (var mergeColumn in Columns.Where(x => !x.PrimaryKey || x.PrimaryKey && !x.Identity))"
        ));
        assert!(output.contains("dt.Rows.Add(item.Name);"));
        assert!(output.contains("public override bool BulkCreate(List<Users> items)"));
    }

    #[test]
    fn test_keyless_table_gets_delete_by_and_no_merge() {
        let output = generator().generate_repository(&keyless_table()).unwrap();
        assert!(output.contains(
            "public partial interface IEntriesRepository : IBaseRepository<Entries>"
        ));
        assert!(output.contains("public bool DeleteByAt(DateTime at)"));
        assert!(output.contains("public bool DeleteByMessage(String message)"));
        assert!(!output.contains("bool Merge("));
        assert!(!output.contains("bool Update("));
        assert!(!output.contains(" Get("));
    }

    #[test]
    fn test_composite_key_emits_keys_class_and_overloads() {
        let output = generator()
            .generate_repository(&composite_key_table())
            .unwrap();
        assert!(output.contains("public class MembershipsKeys"));
        assert!(output.contains("public Int32 UserId { get; set; }"));
        assert!(output.contains("public Guid GroupId { get; set; }"));
        assert!(output.contains("public Memberships Get(Int32 userId, Guid groupId)"));
        assert!(output.contains("public Memberships Get(MembershipsKeys compositeId)"));
        assert!(output.contains(
            "public IEnumerable<Memberships> Get(params MembershipsKeys[] compositeIds)"
        ));
        // Positional delete funnels through the keys type.
        assert!(output.contains("return Delete(new MembershipsKeys(userId, groupId));"));
        assert!(output.contains("return Delete(new[] { compositeId });"));
    }

    #[test]
    fn test_composite_get_filters_cross_product() {
        let output = generator()
            .generate_repository(&composite_key_table())
            .unwrap();
        assert!(output.contains("var filteredResults = new List<Memberships>();"));
        assert!(output.contains(
            "x.UserId == compositeKey.UserId && x.GroupId == compositeKey.GroupId"
        ));
    }

    #[test]
    fn test_composite_bulk_delete_uses_staging_table() {
        let output = generator()
            .generate_repository(&composite_key_table())
            .unwrap();
        assert!(output.contains("var tempTableName = $\"staging{Guid.NewGuid():N}\";"));
        assert!(output.contains("CreateStagingTable(tempTableName, true);"));
        assert!(output.contains("BulkInsert(dt, tempTableName);"));
        assert!(output.contains("SELECT * FROM dbo.Memberships o"));
        assert!(output.contains(
            "WHERE EXISTS (SELECT 'x' FROM {tempTableName} i WHERE i.[UserId] = o.[UserId] AND i.[GroupId] = o.[GroupId]))"
        ));
        assert!(output.contains("DELETE FROM cte\") > 0;"));
    }

    #[test]
    fn test_composite_key_columns_get_find_methods() {
        let output = generator()
            .generate_repository(&composite_key_table())
            .unwrap();
        assert!(output.contains("public IEnumerable<Memberships> FindByUserId(Int32 userId)"));
        assert!(output.contains(
            "public IEnumerable<Memberships> FindByGroupId(FindComparison comparison, Guid groupId)"
        ));
    }

    #[test]
    fn test_single_key_column_has_no_find_methods() {
        let output = generator()
            .generate_repository(&single_key_table())
            .unwrap();
        assert!(!output.contains("FindById"));
        assert!(output.contains("public IEnumerable<Users> FindByName(String name)"));
        assert!(output.contains(
            "return FindByName(FindComparison.Equals, name);"
        ));
        assert!(output.contains(
            "(Comparison)Enum.Parse(typeof(Comparison), comparison.ToString())"
        ));
    }

    #[test]
    fn test_constructor_registers_column_definitions() {
        let output = generator()
            .generate_repository(&single_key_table())
            .unwrap();
        assert!(output.contains(
            "public UsersRepository(string connectionString) : this(connectionString, exception => { }) { }"
        ));
        assert!(output.contains("\"dbo\", \"Users\", 2)"));
        assert!(output.contains(
            "Columns.Add(new ColumnDefinition(nameof(Users.Id), typeof(Int32), \"[int]\", false, true, true));"
        ));
        assert!(output.contains(
            "Columns.Add(new ColumnDefinition(nameof(Users.Name), typeof(String), \"[nvarchar]\", false, false, false));"
        ));
    }

    #[test]
    fn test_search_checks_supplied_parameters_per_kind() {
        let mut id = col("Id", DataKind::Int);
        id.primary_key = true;
        let name = col("Name", DataKind::String);
        let payload = col("Payload", DataKind::Binary);
        let body = col("Body", DataKind::Xml);
        let table = Table::new("dbo", "Documents", vec![id, name, payload, body]);
        let output = generator().generate_repository(&table).unwrap();
        assert!(output.contains("if (id.HasValue)"));
        assert!(output.contains("if (!string.IsNullOrEmpty(name))"));
        assert!(output.contains("if (payload.Any())"));
        assert!(output.contains("if (body != null)"));
        assert!(output.contains(
            "queries.Add(new QueryItem(nameof(Documents.Body), body, typeof(XmlDocument)));"
        ));
        assert!(output.contains("return BaseSearch(queries);"));
        // Search parameters default to null under the modern gate.
        assert!(output.contains("Int32? id = null,"));
        assert!(output.contains("String body = null)"));
    }

    #[test]
    fn test_legacy_search_parameters_have_no_defaults() {
        let generator = CSharpSqlServerGenerator::new(GenerationConfig {
            model_namespace: "App.Models".to_string(),
            repository_namespace: "App.Repositories".to_string(),
            class_name_format: "{Name}".to_string(),
            target_framework: TargetFramework::Framework35,
            csharp_version: CSharpVersion::CSharp3,
        })
        .unwrap();
        let output = generator
            .generate_repository(&single_key_table())
            .unwrap();
        // Null guards still contain "== null"; the signature itself must
        // carry no per-parameter defaults.
        assert!(!output.contains("id = null"));
        assert!(!output.contains("name = null"));
        assert!(output.contains("Int32? id,"));
        assert!(output.contains("String name)"));
    }

    #[test]
    fn test_to_item_materializes_every_column() {
        let output = generator()
            .generate_repository(&single_key_table())
            .unwrap();
        assert!(output.contains("protected override Users ToItem(DataRow row)"));
        assert!(output.contains("Id = GetInt32(row, nameof(Users.Id)),"));
        assert!(output.contains("Name = GetString(row, nameof(Users.Name)),"));
    }

    #[test]
    fn test_merge_pairs_non_key_values_with_dirty_flags() {
        let output = generator()
            .generate_repository(&single_key_table())
            .unwrap();
        assert!(output.contains("item.Id,"));
        assert!(output.contains(
            "item.Name, item.DirtyColumns.Contains(nameof(Users.Name))"
        ));
        assert!(output.contains("return BaseMerge(mergeTable);"));
    }

    struct HeaderWrapper;

    impl RepoWrapper for HeaderWrapper {
        fn generate_repo_wrapper(&self, table: &Table) -> String {
            format!("    // wrapped: {}\n", table.class_name)
        }
    }

    #[test]
    fn test_wrapper_text_precedes_repository_body() {
        let output = generator()
            .with_wrapper(Box::new(HeaderWrapper))
            .generate_repository(&single_key_table())
            .unwrap();
        let wrapper_pos = output.find("// wrapped: Users").unwrap();
        let iface_pos = output.find("public partial interface").unwrap();
        assert!(wrapper_pos < iface_pos);
    }
}
