//! OpenAPI 3.1 description of a registry.

use super::registry::{Api, EndpointDescriptor, HEALTH_CHECK_PATH};
use super::request::ApiMethod;
use crate::schema::{GeneratedSchema, ModelOrigin, SchemaWriter};
use crate::types::TypeDescriptor;
use serde_json::{json, Map, Value};
use std::collections::{HashMap, HashSet};

const COMPONENTS_PREFIX: &str = "#/components/schemas/";
const MESSAGE_ENVELOPE: &str = "MessageEnvelope";

/// Component key for a model name. OpenAPI keys only allow
/// `[A-Za-z0-9._-]`, so `"InputModel - add"` becomes `"InputModel_-_add"`.
pub fn component_key(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn component_ref(key: &str) -> Value {
    json!({ "$ref": format!("{COMPONENTS_PREFIX}{key}") })
}

/// Model name -> component key, one key per distinct name.
///
/// Sanitizing is lossy (`"a b"` and `"a_b"` both give `a_b`), so a later
/// name whose key is taken gets a numeric suffix. Record definitions are
/// keyed by their qualified path and never pass through here.
#[derive(Debug, Default)]
struct ComponentKeys {
    by_name: HashMap<String, String>,
    taken: HashSet<String>,
}

impl ComponentKeys {
    fn assign(&mut self, name: &str) -> String {
        if let Some(key) = self.by_name.get(name) {
            return key.clone();
        }
        let base = component_key(name);
        let mut key = base.clone();
        let mut n = 2;
        while self.taken.contains(&key) {
            key = format!("{base}_{n}");
            n += 1;
        }
        self.taken.insert(key.clone());
        self.by_name.insert(name.to_string(), key.clone());
        key
    }
}

fn message_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": { "schema": component_ref(MESSAGE_ENVELOPE) }
        }
    })
}

fn success_response(writer: &mut SchemaWriter, endpoint: &EndpointDescriptor) -> Value {
    let output: &GeneratedSchema = endpoint.output_schema();
    let result_schema = match output.origin() {
        // The record's own definition, shared with every other use of it.
        ModelOrigin::Passthrough => endpoint
            .handler()
            .callable()
            .signature()
            .returns
            .as_ref()
            .map(|ty| writer.type_schema(ty))
            .unwrap_or_else(|| json!({})),
        ModelOrigin::Synthesized => output
            .field("result")
            .map(|f| writer.type_schema(&f.ty))
            .unwrap_or_else(|| json!({})),
    };
    json!({
        "description": "Successful response",
        "content": {
            "application/json": {
                "schema": {
                    "type": "object",
                    "properties": {
                        "result": result_schema,
                        "http_code": { "type": "integer" }
                    },
                    "required": ["result", "http_code"]
                }
            }
        }
    })
}

fn operation(
    writer: &mut SchemaWriter,
    keys: &mut ComponentKeys,
    endpoint: &EndpointDescriptor,
) -> Value {
    let input = endpoint.input_schema();
    let mut op = Map::new();
    op.insert("operationId".into(), json!(endpoint.name()));
    match endpoint.method() {
        ApiMethod::Get => {
            let parameters: Vec<Value> = input
                .fields()
                .iter()
                .map(|field| {
                    let mut param = json!({
                        "name": field.name,
                        "in": "query",
                        "required": field.required,
                        "schema": writer.type_schema(&field.ty)
                    });
                    if matches!(field.ty, TypeDescriptor::Sequence(_)) {
                        param["style"] = json!("form");
                        param["explode"] = json!(true);
                    }
                    param
                })
                .collect();
            op.insert("parameters".into(), Value::Array(parameters));
        }
        ApiMethod::Post => {
            op.insert(
                "requestBody".into(),
                json!({
                    "required": true,
                    "content": { "application/json": { "schema": component_ref(&keys.assign(input.name())) } }
                }),
            );
        }
    }
    op.insert(
        "responses".into(),
        json!({
            "200": success_response(writer, endpoint),
            "422": message_response("Input does not match the input model"),
            "500": message_response("Internal server error")
        }),
    );
    Value::Object(op)
}

/// Build the document for every endpoint of `api`, plus the health check.
pub fn openapi_document(api: &Api) -> Value {
    let mut writer = SchemaWriter::new(COMPONENTS_PREFIX);
    let mut keys = ComponentKeys::default();
    keys.assign(MESSAGE_ENVELOPE);
    let mut schemas = Map::new();
    let mut paths: Map<String, Value> = Map::new();

    for endpoint in api.endpoints() {
        let output = endpoint.output_schema();
        let mut models = vec![endpoint.input_schema()];
        if output.origin() == ModelOrigin::Synthesized {
            models.push(output);
        }
        for model in models {
            let body = writer.object_schema(Some(model.name()), model.fields());
            schemas.insert(keys.assign(model.name()), body);
        }
        let item = paths
            .entry(endpoint.path().to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        let method = endpoint.method().as_str().to_ascii_lowercase();
        item[method.as_str()] = operation(&mut writer, &mut keys, endpoint);
    }

    paths.insert(
        HEALTH_CHECK_PATH.to_string(),
        json!({
            "get": {
                "operationId": "health_check",
                "responses": { "200": message_response("Service is running") }
            }
        }),
    );

    schemas.extend(writer.into_definitions());
    schemas.insert(
        MESSAGE_ENVELOPE.to_string(),
        json!({
            "type": "object",
            "properties": {
                "message": { "type": "string" },
                "http_code": { "type": "integer" }
            },
            "required": ["message", "http_code"]
        }),
    );

    json!({
        "openapi": "3.1.0",
        "info": { "title": api.title(), "version": api.version() },
        "paths": paths,
        "components": { "schemas": schemas }
    })
}
