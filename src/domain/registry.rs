use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// A named, externally invocable function taking an optional JSON payload.
pub trait FunctionHandler
where
    Self: Send + Sync + 'static,
{
    fn invoke(&self, payload: Option<Value>) -> Result<Value, InvokeError>;
}

/// Dispatch table mapping function names to handlers. Populated once at
/// startup, read-only afterwards, hence freely shareable across invocations.
#[derive(Default)]
pub struct FunctionRegistry {
    entries: HashMap<&'static str, Box<dyn FunctionHandler>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, name: &'static str, handler: impl FunctionHandler) -> Self {
        self.entries.insert(name, Box::new(handler));
        self
    }

    /// Look up the function registered under `name` and invoke it with the
    /// given payload.
    pub fn invoke(&self, name: &str, payload: Option<Value>) -> Result<Value, InvokeError> {
        let handler = self
            .entries
            .get(name)
            .ok_or_else(|| InvokeError::UnknownFunction(name.to_string()))?;
        handler.invoke(payload)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }
}

#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("no function registered under name \"{0}\"")]
    UnknownFunction(String),

    #[error("payload does not match the function's input shape: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CreateAccount, ReadAccount};
    use assert_matches::assert_matches;
    use serde_json::json;

    fn registry() -> FunctionRegistry {
        FunctionRegistry::new()
            .register("createAccount", CreateAccount)
            .register("readAccount", ReadAccount)
    }

    #[test]
    fn invoke_create_account_dispatches_by_name() {
        let result = registry().invoke(
            "createAccount",
            Some(json!({ "name": "Alice", "balance": "500.00" })),
        );

        let value = result.unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["name"], "Alice");
        assert_eq!(value["balance"], "500.00");
    }

    #[test]
    fn invoke_without_payload_uses_defaults() {
        let value = registry().invoke("createAccount", None).unwrap();

        assert_eq!(value["id"], 1);
        assert_eq!(value["name"], "");
        assert_eq!(value["balance"], "0");
    }

    #[test]
    fn invoke_read_account_ignores_payload() {
        let registry = registry();

        let plain = registry.invoke("readAccount", None).unwrap();
        let with_payload = registry
            .invoke("readAccount", Some(json!({ "name": "ignored" })))
            .unwrap();

        assert_eq!(plain, with_payload);
        assert_eq!(plain["name"], "Jun King Minon");
        assert_eq!(plain["balance"], "15000");
    }

    #[test]
    fn invoke_unknown_function_fails() {
        let result = registry().invoke("closeAccount", None);

        assert_matches!(result, Err(InvokeError::UnknownFunction(name)) if name == "closeAccount");
    }

    #[test]
    fn invoke_with_malformed_payload_fails() {
        let result = registry().invoke("createAccount", Some(json!({ "balance": [1, 2] })));

        assert_matches!(result, Err(InvokeError::InvalidPayload(_)));
    }

    #[test]
    fn names_lists_registered_functions() {
        let mut names = registry().names().collect::<Vec<_>>();
        names.sort_unstable();

        assert_eq!(names, vec!["createAccount", "readAccount"]);
    }
}
