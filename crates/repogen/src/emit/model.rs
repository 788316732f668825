//! Entity ("model") class emission.
//!
//! One backing field and one property per column in schema order, a setter
//! contract that records changed property identifiers, and a `Validate()`
//! method rendering the derived business rules.

use crate::schema::Table;
use crate::typemap;
use crate::validation::{self, ValidationRule};
use crate::version::VersionGate;

use super::{CSharpSqlServerGenerator, CodeWriter};

pub(super) fn generate(generator: &CSharpSqlServerGenerator, table: &Table) -> String {
    let gate = &generator.gate;
    let config = &generator.config;
    let class = generator.model_class(table);
    let mut w = CodeWriter::new();

    w.line(0, "using System;");
    w.line(0, "using System.Collections.Generic;");
    w.line(0, "using System.Xml;");
    w.line(0, &format!("using {}.Base;", config.model_namespace));
    if gate.emits_key_attribute() {
        w.line(0, "using System.ComponentModel.DataAnnotations;");
    }
    if gate.emits_table_attribute() {
        w.line(0, "using System.ComponentModel.DataAnnotations.Schema;");
    }
    w.blank();

    w.line(0, &format!("namespace {}", config.model_namespace));
    w.line(0, "{");
    if gate.emits_table_attribute() {
        w.line(
            1,
            &format!("[Table(\"{}\", Schema=\"{}\")]", table.name, table.schema),
        );
    }
    w.line(1, &format!("public partial class {class} : BaseModel"));
    w.line(1, "{");

    for col in &table.columns {
        w.line(
            2,
            &format!(
                "private {} {};",
                typemap::declared_type(col),
                col.backing_field()
            ),
        );
    }
    w.blank();

    for col in &table.columns {
        if col.primary_key && gate.emits_key_attribute() {
            w.line(2, "[Key]");
        }
        let field = col.backing_field();
        let set_args = if gate.caller_member_name() {
            format!("ref {field}, value")
        } else {
            format!(
                "ref {field}, value, {}",
                gate.property_identity(&class, &col.property_name)
            )
        };
        w.line(
            2,
            &format!(
                "public virtual {} {}",
                typemap::declared_type(col),
                col.property_name
            ),
        );
        w.line(2, "{");
        if gate.expression_bodied_accessors() {
            w.line(3, &format!("get => {field};"));
            w.line(3, &format!("set => SetValue({set_args});"));
        } else {
            w.line(3, &format!("get {{ return {field}; }}"));
            w.line(3, &format!("set {{ SetValue({set_args}); }}"));
        }
        w.line(2, "}");
    }

    emit_validate(&mut w, gate, &class, table);

    w.line(1, "}");
    w.line(0, "}");
    w.finish()
}

fn emit_validate(w: &mut CodeWriter, gate: &VersionGate, class: &str, table: &Table) {
    w.line(2, "public override List<ValidationError> Validate()");
    w.line(2, "{");
    w.line(3, "var validationErrors = new List<ValidationError>();");
    w.blank();

    for col in &table.columns {
        let prop = &col.property_name;
        for rule in validation::rules_for(col) {
            let condition = match &rule {
                ValidationRule::RequiredString => format!("string.IsNullOrEmpty({prop})"),
                ValidationRule::MaxLength(max) => {
                    format!("!string.IsNullOrEmpty({prop}) && {prop}.Length > {max}")
                }
                ValidationRule::RequiredBinary => format!("{prop} == null"),
                ValidationRule::DecimalMagnitude(max) => {
                    if col.nullable {
                        format!("{prop}.HasValue && Math.Floor({prop}.Value) > {max}")
                    } else {
                        format!("Math.Floor({prop}) > {max}")
                    }
                }
                ValidationRule::DecimalPlaces(places) => {
                    if col.nullable {
                        format!("{prop}.HasValue && GetDecimalPlaces({prop}.Value) > {places}")
                    } else {
                        format!("GetDecimalPlaces({prop}) > {places}")
                    }
                }
                ValidationRule::NotMinSentinel(sentinel) => format!("{prop} == {sentinel}"),
                ValidationRule::NotEmptyGuid => format!("{prop} == Guid.Empty"),
            };
            w.line(3, &format!("if ({condition})"));
            w.line(
                4,
                &format!(
                    "validationErrors.Add(new ValidationError({}, \"{}\"));",
                    gate.property_identity(class, prop),
                    rule.message()
                ),
            );
        }
    }

    w.blank();
    w.line(3, "return validationErrors;");
    w.line(2, "}");
}
