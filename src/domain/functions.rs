use crate::domain::{Account, FunctionHandler, InvokeError, ACCOUNT_ID};
use rust_decimal_macros::dec;
use serde_json::Value;

// Function: CreateAccount =========================================================================

/// Stub create function: assigns the fixed id and copies name and balance through unchanged.
/// Nothing is stored; each invocation is independent.
#[derive(Debug, Clone, Copy)]
pub struct CreateAccount;

impl CreateAccount {
    pub fn apply(&self, request: Account) -> Account {
        Account {
            id: ACCOUNT_ID,
            name: request.name,
            balance: request.balance,
        }
    }
}

impl FunctionHandler for CreateAccount {
    fn invoke(&self, payload: Option<Value>) -> Result<Value, InvokeError> {
        let request = payload
            .map(serde_json::from_value)
            .transpose()?
            .unwrap_or_default();
        Ok(serde_json::to_value(self.apply(request))?)
    }
}

// Function: ReadAccount ===========================================================================

/// Stub read function: always returns the same hardcoded record.
#[derive(Debug, Clone, Copy)]
pub struct ReadAccount;

impl ReadAccount {
    pub fn get(&self) -> Account {
        Account {
            id: ACCOUNT_ID,
            name: "Jun King Minon".to_string(),
            balance: dec!(15000),
        }
    }
}

impl FunctionHandler for ReadAccount {
    // A supplier takes no input; any payload is discarded.
    fn invoke(&self, _payload: Option<Value>) -> Result<Value, InvokeError> {
        Ok(serde_json::to_value(self.get())?)
    }
}
