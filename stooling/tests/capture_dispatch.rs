use std::sync::Arc;

use serde_json::{Value, json};
use sprovider::{FunctionCallIntent, ToolDefinition};
use stooling::{
    ArgumentMode, Dispatcher, FunctionCall, FunctionDispatcher, FunctionRegistry,
    InvocationContext, ToolErrorKind, parse_json_object,
};

fn descriptors() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "order_food",
            "Orders a dish",
            json!({"type": "object", "properties": {"dish": {"type": "string"}}}),
        ),
        ToolDefinition::new("cancel_order", "Cancels an order", json!({"type": "object"})),
    ]
}

#[tokio::test]
async fn capturing_registry_echoes_model_arguments_for_every_declared_function() {
    let dispatcher = FunctionDispatcher::new(Arc::new(FunctionRegistry::capturing(&descriptors())));
    let intent = FunctionCallIntent::new("order_food", "{\"dish\":\"bibimbap\",\"qty\":1}");

    let outcome = dispatcher
        .dispatch(
            FunctionCall::from(intent).with_id("call_7"),
            &ArgumentMode::ModelSupplied,
            &InvocationContext::new().with_tool_call_id("call_7"),
        )
        .await
        .expect("capture dispatch should succeed");

    let echoed = parse_json_object(&outcome.output).expect("echo is a JSON object");
    assert_eq!(echoed.get("dish"), Some(&Value::String("bibimbap".to_string())));
    assert_eq!(outcome.args, Some(echoed));
    assert_eq!(outcome.name, "order_food");

    let undeclared = dispatcher
        .dispatch(
            FunctionCall::new("refund", "{}"),
            &ArgumentMode::ModelSupplied,
            &InvocationContext::new(),
        )
        .await
        .expect_err("undeclared function must not resolve");
    assert_eq!(undeclared.kind, ToolErrorKind::NotFound);
}

#[tokio::test]
async fn no_args_mode_ignores_model_payload() {
    let mut registry = FunctionRegistry::new();
    registry.register_sync_fn("status", |args, _ctx| {
        Ok(Value::String(format!("{} args", args.len())))
    });
    let dispatcher = FunctionDispatcher::new(Arc::new(registry));

    let outcome = dispatcher
        .dispatch(
            FunctionCall::new("status", "{\"verbose\":true}"),
            &ArgumentMode::NoArgs,
            &InvocationContext::new(),
        )
        .await
        .expect("dispatch should succeed");

    assert_eq!(outcome.output, "0 args");
    assert!(outcome.args.is_none());
}
