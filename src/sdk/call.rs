//! Unsigned move-call specifications.
//!
//! A [`CallSpec`] names a target `module::function` and an ordered argument
//! list. Arguments carry just enough shape for the assembler to lower them
//! into a programmable transaction: object references are held as ID strings
//! and resolved (owned vs shared) at execution time.

/// A pure (BCS-serialized) argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PureArg {
    U8(u8),
    U64(u64),
    /// Sui address, hex string with or without `0x`.
    Address(String),
    /// UTF-8 string lowered as `0x1::string::String`.
    Str(String),
    /// Object ID passed by value (not as an object reference).
    Id(String),
}

/// One argument in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArg {
    /// Object reference, resolved to owned or shared at assembly time.
    Object(String),
    /// The shared system clock (0x6), always read-only.
    Clock,
    /// Pure value.
    Pure(PureArg),
    /// A fresh coin split off the gas coin, amount in MIST.
    SplitFromGas(u64),
}

/// An unsigned move call: target plus ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSpec {
    pub module: String,
    pub function: String,
    /// Type arguments as fully-qualified type tags.
    pub type_args: Vec<String>,
    pub args: Vec<CallArg>,
}

impl CallSpec {
    pub fn new(module: &str, function: &str) -> Self {
        Self {
            module: module.to_string(),
            function: function.to_string(),
            type_args: Vec::new(),
            args: Vec::new(),
        }
    }

    pub fn type_arg(mut self, tag: &str) -> Self {
        self.type_args.push(tag.to_string());
        self
    }

    pub fn object(mut self, id: &str) -> Self {
        self.args.push(CallArg::Object(id.to_string()));
        self
    }

    pub fn clock(mut self) -> Self {
        self.args.push(CallArg::Clock);
        self
    }

    pub fn pure(mut self, value: PureArg) -> Self {
        self.args.push(CallArg::Pure(value));
        self
    }

    pub fn split_from_gas(mut self, amount_mist: u64) -> Self {
        self.args.push(CallArg::SplitFromGas(amount_mist));
        self
    }

    /// Fully-qualified target for a given package ID.
    pub fn target(&self, package_id: &str) -> String {
        format!("{}::{}::{}", package_id, self.module, self.function)
    }

    /// Total MIST this call splits off the gas coin. The gas coin must cover
    /// this on top of the gas budget.
    pub fn gas_split_total(&self) -> u64 {
        self.args
            .iter()
            .map(|a| match a {
                CallArg::SplitFromGas(amount) => *amount,
                _ => 0,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_rendering() {
        let spec = CallSpec::new("role_manager", "deposit_sui");
        assert_eq!(
            spec.target("0xabc"),
            "0xabc::role_manager::deposit_sui"
        );
    }

    #[test]
    fn test_gas_split_total_sums_splits_only() {
        let spec = CallSpec::new("m", "f")
            .object("0x1")
            .split_from_gas(100)
            .pure(PureArg::U64(5))
            .split_from_gas(250);
        assert_eq!(spec.gas_split_total(), 350);
    }

    #[test]
    fn test_builder_preserves_argument_order() {
        let spec = CallSpec::new("m", "f")
            .pure(PureArg::Address("0xaa".into()))
            .object("0xbb")
            .split_from_gas(7);
        assert_eq!(
            spec.args,
            vec![
                CallArg::Pure(PureArg::Address("0xaa".into())),
                CallArg::Object("0xbb".into()),
                CallArg::SplitFromGas(7),
            ]
        );
    }
}
