//! Legacy `path[:opt1,opt2,...]` filename syntax.

use crate::ops::OptionList;

/// Split a combined "path plus options" string into the bare path and its
/// ordered option list.
///
/// The options, if any, follow the last `:` and are comma-separated. A
/// trailing `:` yields an empty option list.
pub fn split_options(spec: &str) -> (String, OptionList) {
    match spec.rsplit_once(':') {
        Some((path, options)) => (
            path.to_string(),
            OptionList::from_items(options.split(',').filter(|o| !o.is_empty())),
        ),
        None => (spec.to_string(), OptionList::new()),
    }
}

/// Options the legacy layer recognizes.
///
/// A decimal option selects a page/frame index; the literal `seq` enables
/// sequential-access mode. Anything else is ignored here and validated
/// elsewhere.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LegacyOptions {
    /// Page/frame index to load, defaulting to the first.
    pub page: u32,
    /// Sequential-access mode requested.
    pub sequential: bool,
}

/// Interpret an ordered option list.
pub fn parse_options(options: &OptionList) -> LegacyOptions {
    LegacyOptions {
        page: options.first_numeric().unwrap_or(0),
        sequential: options.has_flag("seq"),
    }
}
