use eyre::Result;
use serde_json::Value;

/// The parts of a contract ABI that matter for deployment
#[derive(Debug, Clone, Default)]
pub struct ContractAbi {
    pub constructor: Option<Constructor>,
    pub functions: Vec<ContractFunction>,
}

/// Represents the constructor entry of an ABI
#[derive(Debug, Clone)]
pub struct Constructor {
    pub inputs: Vec<FunctionParam>,
}

/// Represents a contract function from the ABI
#[derive(Debug, Clone)]
pub struct ContractFunction {
    pub name: String,
    pub inputs: Vec<FunctionParam>,
}

/// Represents a function parameter
#[derive(Debug, Clone)]
pub struct FunctionParam {
    pub name: String,
    pub param_type: String,
    pub components: Option<Vec<FunctionParam>>,
}

impl ContractAbi {
    /// Parameters the constructor requires, empty when there is no constructor
    pub fn constructor_inputs(&self) -> &[FunctionParam] {
        self.constructor
            .as_ref()
            .map(|c| c.inputs.as_slice())
            .unwrap_or_default()
    }
}

/// Parse an ABI JSON array into its constructor and callable functions
pub fn parse_abi(abi_json: &Value) -> Result<ContractAbi> {
    let abi_array = abi_json
        .as_array()
        .ok_or_else(|| eyre::eyre!("ABI must be a JSON array"))?;

    let mut abi = ContractAbi::default();

    for item in abi_array {
        match item.get("type").and_then(|t| t.as_str()) {
            Some("constructor") => {
                abi.constructor = Some(Constructor {
                    inputs: parse_params(item.get("inputs")),
                });
            }
            Some("function") => {
                let Some(name) = item.get("name").and_then(|n| n.as_str()) else {
                    continue;
                };
                abi.functions.push(ContractFunction {
                    name: name.to_string(),
                    inputs: parse_params(item.get("inputs")),
                });
            }
            _ => {}
        }
    }

    Ok(abi)
}

fn parse_params(params: Option<&Value>) -> Vec<FunctionParam> {
    params
        .and_then(|p| p.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|param| {
                    let name = param
                        .get("name")
                        .and_then(|n| n.as_str())
                        .unwrap_or("")
                        .to_string();

                    let param_type = param.get("type").and_then(|t| t.as_str())?.to_string();

                    let components = param
                        .get("components")
                        .filter(|c| c.is_array())
                        .map(|c| parse_params(Some(c)));

                    Some(FunctionParam {
                        name,
                        param_type,
                        components,
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Canonical signature such as `transfer(address,uint256)`
pub fn function_signature(func: &ContractFunction) -> String {
    format!("{}({})", func.name, param_list(&func.inputs))
}

/// Comma separated canonical parameter types
pub fn param_list(params: &[FunctionParam]) -> String {
    params
        .iter()
        .map(encode_param_type)
        .collect::<Vec<_>>()
        .join(",")
}

fn encode_param_type(param: &FunctionParam) -> String {
    if let Some(components) = &param.components {
        // Tuple type, keeping any array suffix such as tuple[]
        let suffix = param.param_type.strip_prefix("tuple").unwrap_or("");
        format!("({}){}", param_list(components), suffix)
    } else {
        param.param_type.clone()
    }
}
