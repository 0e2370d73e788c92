//! Binding derivation for the three fragment scopes.
//!
//! Unit bindings hold naming parameters, header names and auth
//! initializers. Entity bindings add the model shape and the client calls
//! the tests make. Operation bindings add one method signature. Each level
//! is overlaid on the one above it.
//!
//! Call bindings (`create_call`, `delete_call`, ...) exist only when the
//! entity owns an operation with that role. A fragment using one without
//! declaring the matching requirement fails with `MissingBinding`.

use crate::Bindings;
use crate::common::java::{
    field_initializer, getter_name, java_type, setter_name, string_literal, to_camel_case,
    to_pascal_case,
};
use crate::headers::HeaderNames;
use crate::properties::auth_bindings;
use crate::template::Requirement;
use clientgen_core::{
    ClientSettings, CrudAction, EntitySchema, FieldSpec, FieldType, OperationSpec,
    ParameterLocation, ParameterSpec, TargetVersion,
};
use serde_json::json;

/// Bindings shared by every fragment of a unit.
#[must_use]
pub fn unit_bindings(target: &TargetVersion, settings: &ClientSettings) -> Bindings {
    let headers = HeaderNames::new(target.header_prefix());

    Bindings::new()
        .with("package", settings.client_package())
        .with("base_package", settings.base_package.as_str())
        .with("client_name", settings.client_name.as_str())
        .with("app_package", settings.app_package.as_str())
        .with("application_class", settings.application_class.as_str())
        .with("target_version", target.id())
        .with("header_prefix", target.header_prefix())
        .with("header_prefix_literal", string_literal(target.header_prefix()))
        .with("alert_header_literal", string_literal(&headers.alert))
        .with("params_header_literal", string_literal(&headers.params))
        .with("error_header_literal", string_literal(&headers.error))
        .with("alert_header", headers.alert)
        .with("params_header", headers.params)
        .with("error_header", headers.error)
        .with(
            "feign_url_property",
            format!("${{{}.url}}", settings.client_name),
        )
        .overlay(&auth_bindings(&settings.auth))
}

/// Bindings describing one entity and the client calls its tests make.
///
/// `operations` are the operations emitted for the entity, in IR order.
#[must_use]
pub fn entity_bindings(schema: &EntitySchema, operations: &[&OperationSpec]) -> Bindings {
    let entity = to_pascal_case(&schema.name);
    let var = to_camel_case(&schema.name);

    let fields: Vec<_> = schema
        .fields
        .iter()
        .map(|field| {
            let name = to_camel_case(&field.name);
            json!({
                "name": name,
                "type": java_type(&field.schema),
                "getter": getter_name(&name),
                "setter": setter_name(&name),
                "initializer": field_initializer(&field.schema),
            })
        })
        .collect();

    let names: Vec<String> = schema.fields.iter().map(|f| to_camel_case(&f.name)).collect();
    let equality_expr = if names.is_empty() {
        "true".to_string()
    } else {
        names
            .iter()
            .map(|n| format!("Objects.equals(this.{n}, other.{n})"))
            .collect::<Vec<_>>()
            .join(" &&\n            ")
    };

    let random_setters: Vec<String> = schema
        .fields
        .iter()
        .filter_map(|f| sample_value(f).map(|value| setter_call(&var, f, &value)))
        .collect();
    let mutations = |target: &str| -> Vec<String> {
        schema
            .fields
            .iter()
            .filter_map(|f| mutated_value(f).map(|value| setter_call(target, f, &value)))
            .collect()
    };

    let mut bindings = Bindings::new()
        .with("entity", entity.as_str())
        .with("entity_var", var.as_str())
        .with("fields", fields)
        .with("equality_expr", equality_expr)
        .with("hash_args", names.join(", "))
        .with("random_setters", random_setters)
        .with("mutate_entity", mutations(&var))
        .with("mutate_first", mutations(&format!("{var}1")))
        .with("mutate_second", mutations(&format!("{var}2")));

    let id_getter = schema
        .id_field()
        .map_or_else(|| "getId".to_string(), |f| getter_name(&f.name));
    let own_id = format!("{var}.{id_getter}()");
    let fetched_id = format!("fetched.{id_getter}()");

    if let Some(op) = find_action(operations, CrudAction::Create) {
        bindings.set("create_call", call(op, &own_id, &var, None));
    }
    if let Some(op) = find_action(operations, CrudAction::Read) {
        bindings.set("read_call", call(op, &own_id, &var, None));
        bindings.set("read_fetched_call", call(op, &fetched_id, "fetched", None));
    }
    if let Some(op) = find_action(operations, CrudAction::UpdateFull) {
        bindings.set("update_call", call(op, &own_id, &var, None));
    }
    if let Some((op, field)) = form_update(schema, operations) {
        let value = string_literal(&format!("{}-updated", field.name));
        bindings.set("form_field_getter", getter_name(&field.name));
        bindings.set("form_value", value.as_str());
        bindings.set(
            "update_form_call",
            call(
                op,
                &fetched_id,
                "fetched",
                Some((field.name.as_str(), value.as_str())),
            ),
        );
    }
    if let Some(op) = find_action(operations, CrudAction::Delete) {
        bindings.set("delete_call", call(op, &fetched_id, "fetched", None));
    }
    if let Some(op) = find_action(operations, CrudAction::Upload) {
        let metadata = first_string_form(op).map(|p| p.name.clone());
        let value = string_literal("a test file");
        let form = metadata.as_deref().map(|name| (name, value.as_str()));
        bindings.set("upload_call", call(op, &own_id, &var, form));
    }

    bindings
}

/// Bindings describing one operation method.
#[must_use]
pub fn operation_bindings(op: &OperationSpec) -> Bindings {
    let summary = op
        .summary
        .clone()
        .unwrap_or_else(|| format!("{} {}", op.verb, op.path))
        .replace("*/", "*&#47;");

    let error_docs: Vec<_> = op
        .errors
        .iter()
        .map(|e| json!({"status": e.status, "description": e.description.replace("*/", "*&#47;")}))
        .collect();

    let params: Vec<String> = op.parameters.iter().map(parameter_declaration).collect();

    let consumes = if op.is_multipart() {
        ", consumes = \"multipart/form-data\""
    } else if op
        .parameters
        .iter()
        .any(|p| p.location == ParameterLocation::Form)
    {
        ", consumes = \"application/x-www-form-urlencoded\""
    } else {
        ""
    };

    Bindings::new()
        .with("method", to_camel_case(&op.name))
        .with("verb", op.verb.as_str())
        .with("path", string_literal(&op.path))
        .with("summary", summary)
        .with("error_docs", error_docs)
        .with("params", params.join(", "))
        .with(
            "return_type",
            op.returns.as_ref().map_or_else(|| "Void".to_string(), java_type),
        )
        .with("consumes", consumes)
}

/// Bindings for a fragment rendered per operation of one role, or `None`
/// if `op` does not have that role or cannot be exercised.
///
/// A query test looks its own entity up in the result, so the query must
/// return a list of the entity and the entity needs an id. Query parameters
/// named after a string field are passed that field's value.
#[must_use]
pub fn action_bindings(
    action: CrudAction,
    schema: &EntitySchema,
    op: &OperationSpec,
) -> Option<Bindings> {
    if op.action() != action {
        return None;
    }
    if action != CrudAction::Query {
        return Some(Bindings::new());
    }

    let id = schema.id_field()?;
    let lists_entity = matches!(
        &op.returns,
        Some(FieldType::Array { items }) if matches!(&**items, FieldType::Ref { name } if *name == schema.name)
    );
    if !lists_entity {
        return None;
    }

    let var = to_camel_case(&schema.name);
    let args: Vec<String> = op
        .parameters
        .iter()
        .map(|p| query_argument(schema, &var, p))
        .collect();

    Some(
        Bindings::new()
            .with("query_test", format!("test{}", to_pascal_case(&op.name)))
            .with(
                "query_call",
                format!("client.{}({})", to_camel_case(&op.name), args.join(", ")),
            )
            .with("id_getter", getter_name(&id.name)),
    )
}

fn query_argument(schema: &EntitySchema, var: &str, param: &ParameterSpec) -> String {
    let field = schema
        .fields
        .iter()
        .find(|f| f.name == param.name && f.schema == FieldType::String);
    let Some(field) = field.filter(|_| param.location == ParameterLocation::Query) else {
        return "null".to_string();
    };

    let value = format!("{var}.{}()", getter_name(&to_camel_case(&field.name)));
    match &param.schema {
        FieldType::String => value,
        FieldType::Array { items } if **items == FieldType::String => {
            format!("Arrays.asList({value})")
        }
        _ => "null".to_string(),
    }
}

/// Returns `true` if the entity meets a fragment requirement.
///
/// `update-partial` additionally needs a string form field of the
/// operation that names an entity field, so the test can check it.
#[must_use]
pub fn requirement_met(
    requirement: Requirement,
    schema: &EntitySchema,
    operations: &[&OperationSpec],
) -> bool {
    match requirement {
        Requirement::Action(CrudAction::UpdatePartial) => form_update(schema, operations).is_some(),
        Requirement::Action(action) => find_action(operations, action).is_some(),
        Requirement::MutableField => schema.fields.iter().any(|f| mutated_value(f).is_some()),
    }
}

fn find_action<'a>(operations: &[&'a OperationSpec], action: CrudAction) -> Option<&'a OperationSpec> {
    operations.iter().copied().find(|op| op.action() == action)
}

fn first_string_form(op: &OperationSpec) -> Option<&ParameterSpec> {
    op.parameters
        .iter()
        .find(|p| p.location == ParameterLocation::Form && p.schema == FieldType::String)
}

fn form_update<'a>(
    schema: &'a EntitySchema,
    operations: &[&'a OperationSpec],
) -> Option<(&'a OperationSpec, &'a FieldSpec)> {
    operations
        .iter()
        .copied()
        .filter(|op| op.action() == CrudAction::UpdatePartial)
        .find_map(|op| {
            op.parameters
                .iter()
                .filter(|p| p.location == ParameterLocation::Form && p.schema == FieldType::String)
                .find_map(|p| {
                    schema
                        .fields
                        .iter()
                        .find(|f| f.name == p.name && f.schema == FieldType::String)
                })
                .map(|field| (op, field))
        })
}

/// Builds `client.<method>(<args>)` for a test.
///
/// Path parameters get the id expression, the body gets the entity
/// variable, file parts get `filePart`, the named form field gets the given
/// value, and everything else is `null`.
fn call(op: &OperationSpec, id_expr: &str, body: &str, form: Option<(&str, &str)>) -> String {
    let args: Vec<String> = op
        .parameters
        .iter()
        .map(|p| {
            if p.schema.is_file() {
                return "filePart".to_string();
            }
            match p.location {
                ParameterLocation::Path => id_expr.to_string(),
                ParameterLocation::Body => body.to_string(),
                ParameterLocation::Form => match form {
                    Some((name, value)) if name == p.name => value.to_string(),
                    _ => "null".to_string(),
                },
                ParameterLocation::Query | ParameterLocation::Header => "null".to_string(),
            }
        })
        .collect();
    format!("client.{}({})", to_camel_case(&op.name), args.join(", "))
}

fn parameter_declaration(param: &ParameterSpec) -> String {
    let var = to_camel_case(&param.name);
    let wire = string_literal(&param.name);
    let required = param.required;

    if param.schema.is_file() {
        return format!("@RequestPart({wire}) {} {var}", java_type(&param.schema));
    }

    let ty = java_type(&param.schema);
    match param.location {
        ParameterLocation::Path => format!("@PathVariable({wire}) {ty} {var}"),
        ParameterLocation::Query | ParameterLocation::Form => {
            format!("@RequestParam(value = {wire}, required = {required}) {ty} {var}")
        }
        ParameterLocation::Header => {
            format!("@RequestHeader(value = {wire}, required = {required}) {ty} {var}")
        }
        ParameterLocation::Body => format!("@RequestBody {ty} {var}"),
    }
}

fn setter_call(var: &str, field: &FieldSpec, value: &str) -> String {
    format!("{var}.{}({value});", setter_name(&to_camel_case(&field.name)))
}

/// Value assigned by the random-entity factory; `None` leaves the field unset.
fn sample_value(field: &FieldSpec) -> Option<String> {
    if field.name == "id" {
        return match field.schema {
            FieldType::Long => Some("TestUtils.nextId()".to_string()),
            FieldType::Integer => Some("TestUtils.nextId().intValue()".to_string()),
            FieldType::String => Some("String.valueOf(TestUtils.nextId())".to_string()),
            _ => None,
        };
    }

    match &field.schema {
        FieldType::String => Some(string_literal(&format!("{}-sample", field.name))),
        FieldType::Integer => Some("42".to_string()),
        FieldType::Long => Some("42L".to_string()),
        FieldType::Number => Some("4.2d".to_string()),
        FieldType::Boolean => Some("Boolean.TRUE".to_string()),
        FieldType::Array { items } if **items == FieldType::String => Some(format!(
            "new ArrayList<String>(Arrays.asList({}, {}))",
            string_literal(&format!("{}-1", field.name)),
            string_literal(&format!("{}-2", field.name)),
        )),
        FieldType::Array { items } => Some(format!("new ArrayList<{}>()", java_type(items))),
        FieldType::Ref { name } => Some(format!("new {}()", to_pascal_case(name))),
        FieldType::File => None,
    }
}

/// Value that makes a default-constructed entity compare unequal.
fn mutated_value(field: &FieldSpec) -> Option<String> {
    if field.name == "id" {
        return None;
    }
    match &field.schema {
        FieldType::String => Some(string_literal(&format!("{}-mutated", field.name))),
        FieldType::Integer => Some("7".to_string()),
        FieldType::Long => Some("7L".to_string()),
        FieldType::Number => Some("0.5d".to_string()),
        FieldType::Boolean => Some("Boolean.FALSE".to_string()),
        FieldType::Array { items } if **items == FieldType::String => Some(format!(
            "new ArrayList<String>(Arrays.asList({}))",
            string_literal(&format!("{}-mutated", field.name)),
        )),
        _ => None,
    }
}
