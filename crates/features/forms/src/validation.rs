use crate::error::{FormsError, FormsErrorExt};
use folio_dom::{Element, Selector};
use folio_kernel::domain::config::FormsConfig;
use tracing::trace;

/// Result of checking one form's required inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    /// How many required inputs were checked.
    pub checked: usize,
    /// Inputs that were blank after trimming, in document order.
    pub invalid: Vec<Element>,
}

impl Validation {
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.invalid.is_empty()
    }

    /// `name` attributes of the flagged inputs; unnamed inputs are skipped.
    #[must_use]
    pub fn invalid_names(&self) -> Vec<String> {
        self.invalid.iter().filter_map(|input| input.attribute("name")).collect()
    }
}

/// Parsed form of the validation settings, shared by every guarded form.
#[derive(Debug, Clone)]
pub(crate) struct Validator {
    required: Selector,
    invalid_class: String,
}

impl Validator {
    pub(crate) fn new(config: &FormsConfig) -> Result<Self, FormsError> {
        Ok(Self {
            required: Selector::parse(&config.required_selector)
                .context("forms.required_selector")?,
            invalid_class: config.invalid_class.clone(),
        })
    }

    /// Flags blank inputs and clears the flag on filled ones. Every input is visited.
    pub(crate) fn validate(&self, form: &Element) -> Validation {
        let inputs = form.select(&self.required);
        let checked = inputs.len();

        let invalid: Vec<Element> = inputs
            .into_iter()
            .filter(|input| {
                let blank = is_blank(&input.value());
                input.class_list().toggle(&self.invalid_class, blank);
                blank
            })
            .collect();

        trace!(form = form.id().index(), checked, invalid = invalid.len(), "Form validated");
        Validation { checked, invalid }
    }
}

/// Whether `value` is empty once trimmed the way `String.prototype.trim` does.
#[must_use]
pub fn is_blank(value: &str) -> bool {
    value.trim_matches(is_trim_char).is_empty()
}

/// ECMAScript `WhiteSpace` and `LineTerminator`. Unlike [`char::is_whitespace`] this
/// includes U+FEFF and excludes U+0085.
const fn is_trim_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{b}'
            | '\u{c}'
            | '\r'
            | ' '
            | '\u{a0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200a}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202f}'
            | '\u{205f}'
            | '\u{3000}'
            | '\u{feff}'
    )
}

/// Checks every input inside `form` that matches [`FormsConfig::required_selector`].
///
/// Blank (or whitespace-only) inputs get [`FormsConfig::invalid_class`]; the others lose it.
///
/// # Errors
/// Returns [`FormsError::Selector`] if the required-input selector does not parse.
pub fn validate_form(form: &Element, config: &FormsConfig) -> Result<Validation, FormsError> {
    Ok(Validator::new(config)?.validate(form))
}
