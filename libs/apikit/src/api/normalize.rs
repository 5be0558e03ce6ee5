//! Rewrite of parameter-resolution messages into terse "No ... found" details
//!
//! Parameter resolution reports a missing entity with wording like
//! `"App\Entity\Programmer object not found by the @ParamConverter annotation."`.
//! Clients get `"No programmer found"` instead. This is a pure string transform
//! kept apart from the mapper; everything else passes through verbatim.

use std::borrow::Cow;

/// Phrase that marks a parameter-resolution miss.
pub const PARAM_CONVERTER_SUFFIX: &str = "object not found by the @ParamConverter annotation";

/// Normalize a failure message before it becomes the `detail` extension.
///
/// The text before [`PARAM_CONVERTER_SUFFIX`] names the resource; its last
/// segment (split on whitespace, `\` or `::`) is lowercased and wrapped as
/// `"No {name} found"`. Messages without the phrase, or without a name in
/// front of it, are returned unchanged.
#[must_use]
pub fn normalize_param_message(message: &str) -> Cow<'_, str> {
    let Some((subject, _)) = message.split_once(PARAM_CONVERTER_SUFFIX) else {
        return Cow::Borrowed(message);
    };

    subject
        .rsplit(|c: char| c.is_whitespace() || c == '\\' || c == ':')
        .find(|segment| !segment.is_empty())
        .map_or(Cow::Borrowed(message), |name| {
            Cow::Owned(format!("No {} found", name.to_lowercase()))
        })
}
