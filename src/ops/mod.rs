pub(crate) mod binary;
pub(crate) mod conversion;
pub(crate) mod divide;
pub(crate) mod recomb;

use std::collections::HashMap;

use crate::foundation::error::{TesseraError, TesseraResult};
use crate::image::node::Image;

/// Ordered list of raw option strings attached to an operation or legacy
/// open call.
///
/// Options this layer does not recognize are ignored here and validated
/// elsewhere.
#[derive(Clone, Debug, Default)]
pub struct OptionList {
    items: Vec<String>,
}

impl OptionList {
    /// Empty option list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an ordered collection of option strings.
    pub fn from_items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// Append an option.
    pub fn push(&mut self, item: impl Into<String>) {
        self.items.push(item.into());
    }

    /// Options in their original order.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Return `true` when an option starts with `flag`.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.items.iter().any(|item| item.starts_with(flag))
    }

    /// First option that parses as a decimal number, if any.
    pub fn first_numeric(&self) -> Option<u32> {
        self.items.iter().find_map(|item| item.parse().ok())
    }
}

/// Builder invoked by [`OperationRegistry::operate`]: inputs plus options in,
/// finalized output nodes out.
pub type OperationBuilder = fn(&[Image], &OptionList) -> TesseraResult<Vec<Image>>;

/// Explicit registry mapping operation names to builders.
///
/// Constructed once at startup and passed by reference; never consulted as
/// hidden global state. `operate` is the generic invocation surface: the
/// returned `Result` is the caller-visible error channel.
pub struct OperationRegistry {
    builders: HashMap<String, OperationBuilder>,
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl OperationRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }

    /// Registry pre-populated with the built-in operations.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("divide", build_divide);
        registry.register("recomb", build_recomb);
        registry
    }

    /// Register (or replace) an operation builder under `name`.
    pub fn register(&mut self, name: impl Into<String>, builder: OperationBuilder) {
        self.builders.insert(name.into(), builder);
    }

    /// Build the named operation's output nodes.
    ///
    /// Output headers are finalized synchronously; pixels materialize only
    /// when the returned nodes are pulled.
    pub fn operate(
        &self,
        name: &str,
        inputs: &[Image],
        options: &OptionList,
    ) -> TesseraResult<Vec<Image>> {
        let builder = self.builders.get(name).ok_or_else(|| {
            TesseraError::configuration(format!("unknown operation \"{name}\""))
        })?;
        builder(inputs, options)
    }
}

fn build_divide(inputs: &[Image], _options: &OptionList) -> TesseraResult<Vec<Image>> {
    match inputs {
        [left, right] => Ok(vec![divide::divide(left, right)?]),
        _ => Err(TesseraError::configuration(
            "divide expects exactly two input images",
        )),
    }
}

fn build_recomb(inputs: &[Image], _options: &OptionList) -> TesseraResult<Vec<Image>> {
    match inputs {
        [input, matrix] => Ok(vec![recomb::recomb(input, matrix)?]),
        _ => Err(TesseraError::configuration(
            "recomb expects an input image and a matrix image",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::format::BandFormat;

    #[test]
    fn operate_rejects_unknown_names() {
        let registry = OperationRegistry::with_builtins();
        let err = registry.operate("sharpen", &[], &OptionList::new());
        assert!(matches!(err, Err(TesseraError::Configuration(_))));
    }

    #[test]
    fn operate_checks_input_arity() {
        let registry = OperationRegistry::with_builtins();
        let one = Image::zeros(1, 1, 1, BandFormat::UChar).unwrap();
        let err = registry.operate("divide", std::slice::from_ref(&one), &OptionList::new());
        assert!(err.is_err());
    }

    #[test]
    fn option_list_finds_numeric_and_flags() {
        let options = OptionList::from_items(["3", "seq", "unrecognized"]);
        assert_eq!(options.first_numeric(), Some(3));
        assert!(options.has_flag("seq"));
        assert!(!options.has_flag("page"));
    }
}
