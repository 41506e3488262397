//! Structural checks that do not block sealing. Each finding is reported
//! with the pointer of the element it concerns.

use std::collections::HashSet;
use std::fmt;

use crate::model::{Document, Operation, Parameter, PathItem, Schema, Server};
use crate::pointer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    DuplicateTag,
    UndeclaredServerVariable,
    DefaultNotInEnum,
    SchemaAndContent,
    UndeclaredRequiredProperty,
    MissingResponses,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub pointer: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.pointer, self.message)
    }
}

pub fn validate(document: &Document) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut report = |kind: IssueKind, location: &[&str], message: String| {
        issues.push(ValidationIssue {
            kind,
            pointer: pointer::join(location),
            message,
        });
    };

    let mut seen = HashSet::new();
    for (i, tag) in document.tags().iter().enumerate() {
        if !seen.insert(tag.name()) {
            report(
                IssueKind::DuplicateTag,
                &["tags", i.to_string().as_str()],
                format!("tag `{}` is declared more than once", tag.name()),
            );
        }
    }

    check_servers(document.servers(), &["servers"], &mut report);

    for (path, item) in document.paths().iter() {
        check_path_item(item, &["paths", path], &mut report);
    }
    for (name, item) in document.webhooks() {
        check_path_item(item, &["webhooks", name.as_str()], &mut report);
    }

    for (name, schema) in document.components().schemas() {
        check_schema(schema, &mut vec!["components".into(), "schemas".into(), name.clone()], &mut report);
    }
    for (name, parameter) in document.components().parameters() {
        check_parameter(parameter, &["components", "parameters", name.as_str()], &mut report);
    }

    issues
}

type Report<'r> = dyn FnMut(IssueKind, &[&str], String) + 'r;

fn check_servers(servers: &[Server], base: &[&str], report: &mut Report<'_>) {
    for (i, server) in servers.iter().enumerate() {
        let index = i.to_string();
        let mut location = base.to_vec();
        location.push(&index);

        for name in server.placeholders() {
            if !server.variables().contains_key(name) {
                report(
                    IssueKind::UndeclaredServerVariable,
                    &location,
                    format!("server url `{}` uses `{{{name}}}` without a matching variable", server.url()),
                );
            }
        }
        for (name, variable) in server.variables() {
            let allowed = variable.enum_values();
            if !allowed.is_empty() && !allowed.iter().any(|v| v == variable.default_value()) {
                let mut var_location = location.clone();
                var_location.extend(["variables", name.as_str()]);
                report(
                    IssueKind::DefaultNotInEnum,
                    &var_location,
                    format!("default `{}` is not one of {:?}", variable.default_value(), allowed),
                );
            }
        }
    }
}

fn check_path_item(item: &PathItem, base: &[&str], report: &mut Report<'_>) {
    let mut servers = base.to_vec();
    servers.push("servers");
    check_servers(item.servers(), &servers, report);

    for (i, parameter) in item.parameters().iter().enumerate() {
        let index = i.to_string();
        let mut location = base.to_vec();
        location.extend(["parameters", index.as_str()]);
        check_parameter(parameter, &location, report);
    }

    for (method, op) in item.operations() {
        let mut location = base.to_vec();
        location.push(method.as_str());
        check_operation(op, &location, report);
    }
}

fn check_operation(op: &Operation, base: &[&str], report: &mut Report<'_>) {
    if op.responses().entries().is_empty() {
        report(
            IssueKind::MissingResponses,
            base,
            "operation declares no responses".to_string(),
        );
    }

    let mut servers = base.to_vec();
    servers.push("servers");
    check_servers(op.servers(), &servers, report);

    for (i, parameter) in op.parameters().iter().enumerate() {
        let index = i.to_string();
        let mut location = base.to_vec();
        location.extend(["parameters", index.as_str()]);
        check_parameter(parameter, &location, report);
    }
}

fn check_parameter(parameter: &Parameter, location: &[&str], report: &mut Report<'_>) {
    // The setters keep these exclusive; parsed input may not.
    if parameter.schema.is_some() && !parameter.content.is_empty() {
        report(
            IssueKind::SchemaAndContent,
            location,
            format!(
                "parameter `{}` declares both schema and content",
                parameter.name().unwrap_or_default()
            ),
        );
    }
}

fn check_schema(schema: &Schema, location: &mut Vec<String>, report: &mut Report<'_>) {
    if schema.ref_path.is_none() {
        for name in schema.undeclared_required() {
            let segments: Vec<&str> = location.iter().map(String::as_str).collect();
            report(
                IssueKind::UndeclaredRequiredProperty,
                &segments,
                format!("required property `{name}` is not declared in properties"),
            );
        }
    }

    for (name, property) in schema.properties() {
        location.extend(["properties".to_string(), name.clone()]);
        check_schema(property, location, report);
        location.truncate(location.len() - 2);
    }
    if let Some(items) = schema.items() {
        location.push("items".to_string());
        check_schema(items, location, report);
        location.pop();
    }
    for (keyword, list) in [("allOf", schema.all_of()), ("oneOf", schema.one_of()), ("anyOf", schema.any_of())] {
        for (i, member) in list.iter().enumerate() {
            location.extend([keyword.to_string(), i.to_string()]);
            check_schema(member, location, report);
            location.truncate(location.len() - 2);
        }
    }
}
