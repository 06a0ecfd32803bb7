//! Contract binding from a JSON ABI artifact.
//!
//! # Responsibilities
//! - Load the contract interface once from a local file
//! - Encode method calls from loosely typed JSON arguments
//! - Decode return data of value-returning calls

use alloy::dyn_abi::{DynSolType, DynSolValue, FunctionExt, JsonAbiExt, Specifier};
use alloy::json_abi::{ContractObject, Function, JsonAbi};
use alloy::primitives::{Address, Bytes};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// A contract interface bound to an on-chain address.
#[derive(Debug, Clone)]
pub struct ContractBinding {
    address: Address,
    abi: JsonAbi,
}

impl ContractBinding {
    pub fn new(address: Address, abi: JsonAbi) -> Self {
        Self { address, abi }
    }

    /// Load the ABI artifact at `path` and bind it to `address`.
    pub fn from_artifact(path: &Path, address: Address) -> BlockchainResult<Self> {
        let abi = load_abi(path)?;
        tracing::debug!(
            path = %path.display(),
            functions = abi.functions.len(),
            "Contract interface loaded"
        );
        Ok(Self::new(address, abi))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn abi(&self) -> &JsonAbi {
        &self.abi
    }

    /// Resolve `method` to the first overload taking `arity` arguments.
    pub fn function(&self, method: &str, arity: usize) -> BlockchainResult<&Function> {
        let overloads = self
            .abi
            .function(method)
            .ok_or_else(|| BlockchainError::Abi(format!("Unknown method '{}'", method)))?;

        overloads
            .iter()
            .find(|f| f.inputs.len() == arity)
            .ok_or_else(|| {
                BlockchainError::Abi(format!(
                    "Method '{}' has no overload taking {} argument(s)",
                    method, arity
                ))
            })
    }

    /// Build calldata for `method` from JSON arguments.
    pub fn encode_call(&self, method: &str, args: &[Value]) -> BlockchainResult<Bytes> {
        let function = self.function(method, args.len())?;

        let mut values = Vec::with_capacity(args.len());
        for (param, arg) in function.inputs.iter().zip(args) {
            let ty: DynSolType = param
                .resolve()
                .map_err(|e| BlockchainError::Abi(format!("Parameter '{}': {}", param.name, e)))?;
            values.push(coerce_json(&ty, arg).map_err(|reason| {
                BlockchainError::Abi(format!(
                    "Argument '{}' of '{}' is not a valid {}: {}",
                    param.name, method, ty, reason
                ))
            })?);
        }

        let data = function
            .abi_encode_input(&values)
            .map_err(|e| BlockchainError::Abi(e.to_string()))?;
        Ok(data.into())
    }

    /// Decode the return data of `method` called with `arity` arguments.
    pub fn decode_output(
        &self,
        method: &str,
        arity: usize,
        data: &[u8],
    ) -> BlockchainResult<Vec<DynSolValue>> {
        self.function(method, arity)?
            .abi_decode_output(data)
            .map_err(|e| BlockchainError::Abi(format!("Decoding '{}' output: {}", method, e)))
    }
}

/// Read an ABI from a plain ABI array or a compiler artifact with an `abi` field.
pub fn load_abi(path: &Path) -> BlockchainResult<JsonAbi> {
    let artifact_error = |reason: String| BlockchainError::Artifact {
        path: path.display().to_string(),
        reason,
    };

    let content = fs::read_to_string(path).map_err(|e| artifact_error(e.to_string()))?;
    parse_abi(&content).map_err(artifact_error)
}

pub fn parse_abi(content: &str) -> Result<JsonAbi, String> {
    match serde_json::from_str::<JsonAbi>(content) {
        Ok(abi) => Ok(abi),
        Err(plain_err) => {
            let object: ContractObject = serde_json::from_str(content)
                .map_err(|_| format!("not a JSON ABI: {}", plain_err))?;
            object
                .abi
                .ok_or_else(|| "artifact has no 'abi' field".to_string())
        }
    }
}

fn coerce_json(ty: &DynSolType, value: &Value) -> Result<DynSolValue, String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
        Value::Null => return Err("value is null".to_string()),
    };
    ty.coerce_str(&text).map_err(|e| e.to_string())
}

/// Render a decoded value for console output.
pub fn format_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::Uint(u, _) => u.to_string(),
        DynSolValue::Address(a) => a.to_string(),
        DynSolValue::String(s) => s.clone(),
        DynSolValue::Bytes(b) => alloy::primitives::hex::encode_prefixed(b),
        DynSolValue::FixedBytes(word, size) => alloy::primitives::hex::encode_prefixed(&word[..*size]),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) => {
            let inner: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", inner.join(", "))
        }
        DynSolValue::Tuple(items) => {
            let inner: Vec<String> = items.iter().map(format_value).collect();
            format!("({})", inner.join(", "))
        }
        other => format!("{:?}", other),
    }
}
