use oam_core::config::OamConfig;
use oam_core::fragment;
use oam_core::merge::{MergeOptions, merge};
use oam_core::model::{HttpMethod, Operation};
use oam_core::naming::OperationIdStrategy;
use oam_core::render;
use oam_core::{Fragment, MergeError};

const AIRLINE: &str = include_str!("fixtures/airline-fragments.yaml");

fn fragments() -> Vec<Fragment> {
    fragment::from_yaml(AIRLINE).expect("should load airline fragments")
}

fn options() -> MergeOptions {
    MergeOptions {
        operation_id_strategy: OperationIdStrategy::TypeMethod,
        ..MergeOptions::default()
    }
}

fn op<'d>(doc: &'d oam_core::Document, path: &str, method: HttpMethod) -> &'d Operation {
    doc.paths()
        .get(path)
        .and_then(|item| item.operation(method))
        .unwrap_or_else(|| panic!("missing {method} {path}"))
}

#[test]
fn merge_airline_fragments() {
    let doc = merge(&fragments(), &options()).expect("should merge");

    assert_eq!(doc.info().title(), "Airline API");
    assert_eq!(doc.openapi(), "3.1.0");
    let paths: Vec<_> = doc.paths().iter().map(|(path, _)| path).collect();
    assert_eq!(paths, vec!["/bookings", "/bookings/{id}", "/airlines"]);

    let tags: Vec<_> = doc.tags().iter().map(|tag| tag.name()).collect();
    assert_eq!(tags, vec!["bookings", "airlines"]);
    assert_eq!(doc.tag("airlines").unwrap().description(), Some("Airline directory"));
    assert_eq!(doc.security().map(<[_]>::len), Some(1));
}

#[test]
fn type_scope_reaches_its_own_handlers_only() {
    let doc = merge(&fragments(), &options()).unwrap();

    let list = op(&doc, "/bookings", HttpMethod::Get);
    assert_eq!(list.tags(), ["bookings"]);
    let codes: Vec<_> = list.responses().codes().collect();
    assert_eq!(codes, vec!["500", "200"]);

    let airlines = op(&doc, "/airlines", HttpMethod::Get);
    assert_eq!(airlines.tags(), ["airlines"]);
    let codes: Vec<_> = airlines.responses().codes().collect();
    assert_eq!(codes, vec!["200"], "type scope hides the default 500");
}

#[test]
fn explicit_empty_security_is_kept() {
    let doc = merge(&fragments(), &options()).unwrap();
    assert_eq!(op(&doc, "/bookings", HttpMethod::Post).security(), Some(&[][..]));
    assert!(op(&doc, "/bookings", HttpMethod::Get).security().is_none());
}

#[test]
fn operation_ids_follow_the_strategy() {
    let doc = merge(&fragments(), &options()).unwrap();
    let ids: Vec<_> = doc.operations().filter_map(|(_, _, op)| op.operation_id()).collect();
    assert_eq!(
        ids,
        vec![
            "bookingResourceListBookings",
            "bookingResourceCreateBooking",
            "bookingResourceGetBookingById",
            "airlineResourceListAirlines",
        ]
    );

    let route = merge(
        &fragments(),
        &MergeOptions {
            operation_id_strategy: OperationIdStrategy::Route,
            ..MergeOptions::default()
        },
    )
    .unwrap();
    assert_eq!(op(&route, "/bookings/{id}", HttpMethod::Get).operation_id(), Some("getBooking"));

    let none = merge(&fragments(), &MergeOptions::default()).unwrap();
    assert!(none.operations().all(|(_, _, op)| op.operation_id().is_none()));
}

#[test]
fn merged_operation_json() {
    let doc = merge(&fragments(), &options()).unwrap();
    let json = render::to_json(op(&doc, "/bookings/{id}", HttpMethod::Get)).unwrap();
    insta::assert_snapshot!(json, @r##"
    {
      "tags": [
        "bookings"
      ],
      "summary": "Get a booking",
      "operationId": "bookingResourceGetBookingById",
      "parameters": [
        {
          "name": "id",
          "in": "path",
          "required": true,
          "schema": {
            "type": "string"
          }
        }
      ],
      "responses": {
        "500": {
          "description": "Server error"
        },
        "200": {
          "description": "The booking",
          "content": {
            "application/json": {
              "schema": {
                "$ref": "#/components/schemas/Booking"
              }
            }
          }
        },
        "404": {
          "description": "Not Found"
        }
      }
    }
    "##);
}

#[test]
fn build_applies_server_overrides_and_seals() {
    let config: OamConfig = serde_yaml_ng::from_str(
        r#"
merge:
  operation_id_strategy: type_method
servers:
  global: [https://gateway.example.com]
  operations:
    bookingResourceCreateBooking: [https://write.example.com]
"#,
    )
    .unwrap();
    let sealed = oam_core::build(&fragments(), &config).expect("should build");

    assert_eq!(sealed.servers()[0].url(), "https://gateway.example.com");
    let registry = sealed.registry().unwrap();
    let create = registry.operation("/bookings", HttpMethod::Post).unwrap();
    assert_eq!(create.servers()[0].url(), "https://write.example.com");
    assert!(registry.contains("#/components/schemas/Airline"));
}

#[test]
fn duplicate_operation_ids_fail_to_seal() {
    let fragments = fragment::from_yaml(
        r#"
- scope: method
  operation: { path: /a, method: get, operationId: fetch, responses: { "200": { description: ok } } }
- scope: method
  operation: { path: /b, method: get, operationId: fetch, responses: { "200": { description: ok } } }
"#,
    )
    .unwrap();
    let err = oam_core::build(&fragments, &OamConfig::default()).unwrap_err();
    assert!(matches!(err, oam_core::Error::Resolve(oam_core::ResolveError::DuplicateName(_))));
}

#[test]
fn conflicting_path_parameter_declarations() {
    let fragments = fragment::from_yaml(
        r#"
- scope: method
  order: 1
  operation:
    path: /a/{id}
    method: get
    parameters: [{ name: id, in: path, required: true }]
- scope: method
  order: 2
  operation:
    path: /a/{id}
    method: get
    parameters: [{ name: id, in: path, required: false }]
"#,
    )
    .unwrap();
    let err = merge(&fragments, &MergeOptions::default()).unwrap_err();
    assert!(matches!(err, MergeError::ConflictingIdentity { ref name, .. } if name == "id"));
}
