/// Creates a single chat [`Message`](crate::Message) from a role shorthand.
///
/// ```rust
/// use sizzle::{Role, sz_msg};
///
/// let message = sz_msg!(assistant => "Done.");
/// assert_eq!(message.role, Role::Assistant);
/// assert_eq!(message.content, "Done.");
///
/// let result = sz_msg!(function("lookup") => "sunny");
/// assert_eq!(result.name.as_deref(), Some("lookup"));
/// ```
#[macro_export]
macro_rules! sz_msg {
    (system => $content:expr $(,)?) => {
        $crate::Message::system($content)
    };
    (user => $content:expr $(,)?) => {
        $crate::Message::user($content)
    };
    (assistant => $content:expr $(,)?) => {
        $crate::Message::assistant($content)
    };
    (function($name:expr) => $content:expr $(,)?) => {
        $crate::Message::function($name, $content)
    };
    ($role:ident => $content:expr $(,)?) => {
        compile_error!("unsupported role: use system, user, assistant, or function(name)");
    };
}

/// Creates a `Vec<Message>` from role/content pairs.
///
/// ```rust
/// use sizzle::{Role, sz_messages};
///
/// let history = sz_messages![
///     system => "You are concise.",
///     user => "What is the weather in Oslo?",
/// ];
///
/// assert_eq!(history.len(), 2);
/// assert_eq!(history[0].role, Role::System);
/// assert_eq!(history[1].role, Role::User);
/// ```
#[macro_export]
macro_rules! sz_messages {
    () => {
        Vec::<$crate::Message>::new()
    };
    ($($role:ident => $content:expr),+ $(,)?) => {
        vec![$($crate::sz_msg!($role => $content)),+]
    };
}

/// Creates a function [`ToolDefinition`](crate::ToolDefinition) with an object schema.
///
/// ```rust
/// use sizzle::sz_function;
///
/// let definition = sz_function!("get_weather", "Current weather for a city", {
///     "city": { "type": "string" }
/// });
/// assert_eq!(definition.name, "get_weather");
/// assert_eq!(definition.parameters["type"], "object");
/// ```
#[macro_export]
macro_rules! sz_function {
    ($name:expr, $description:expr $(,)?) => {
        $crate::ToolDefinition::new(
            $name,
            $description,
            $crate::serde_json::json!({ "type": "object", "properties": {} }),
        )
    };
    ($name:expr, $description:expr, { $($properties:tt)* } $(,)?) => {
        $crate::ToolDefinition::new(
            $name,
            $description,
            $crate::serde_json::json!({ "type": "object", "properties": { $($properties)* } }),
        )
    };
}
