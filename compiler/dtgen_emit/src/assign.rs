//! Cross-type assignment rules.
//!
//! A rule is chosen by `(destination category, source category)` alone and
//! rendered with the two concrete storage names. The fragments operate on
//! two `char*` cursors: `p1` (destination) and `p2` (source).

use dtgen_diagnostic::{Diagnostic, ErrorCode};
use dtgen_types::{Category, Storage, TypeDescriptor};

/// One cell of the conversion table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ConversionRule {
    ComplexFromComplex,
    /// Real part copied, imaginary part zeroed.
    ComplexFromReal,
    ComplexFromObject,
    /// Imaginary part is discarded.
    RealFromComplex,
    RealFromReal,
    FloatFromRational,
    /// Truncating integer division.
    IntegerFromRational,
    RealFromObject,
    RationalFromInteger,
    RationalFromRational,
    RationalFromObject,
    ObjectFromComplex,
    ObjectFromFloat,
    ObjectFromInteger,
    ObjectFromRational,
    ObjectFromObject,
}

/// A category pair with no conversion rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot assign {src_category} `{src}` to {dest_category} `{dest}`")]
pub struct UnsupportedConversion {
    pub dest: String,
    pub src: String,
    pub dest_category: Category,
    pub src_category: Category,
}

impl UnsupportedConversion {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::E1001
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::warning(self.code())
            .with_message(self.to_string())
            .with_note("the set function is omitted and its dispatch cell raises a type error")
    }
}

impl ConversionRule {
    /// Select the rule for `dest ← src`, or `None` for unsupported pairs.
    pub fn select(dest: Category, src: Category) -> Option<ConversionRule> {
        use Category::{Complex, Float, Integer, Object, Rational};
        let rule = match (dest, src) {
            (Complex, Complex) => ConversionRule::ComplexFromComplex,
            (Complex, Float | Integer) => ConversionRule::ComplexFromReal,
            (Complex, Object) => ConversionRule::ComplexFromObject,
            (Float | Integer, Complex) => ConversionRule::RealFromComplex,
            (Float | Integer, Float | Integer) => ConversionRule::RealFromReal,
            (Float, Rational) => ConversionRule::FloatFromRational,
            (Integer, Rational) => ConversionRule::IntegerFromRational,
            (Float | Integer, Object) => ConversionRule::RealFromObject,
            (Rational, Integer) => ConversionRule::RationalFromInteger,
            (Rational, Rational) => ConversionRule::RationalFromRational,
            (Rational, Object) => ConversionRule::RationalFromObject,
            (Object, Complex) => ConversionRule::ObjectFromComplex,
            (Object, Float) => ConversionRule::ObjectFromFloat,
            (Object, Integer) => ConversionRule::ObjectFromInteger,
            (Object, Rational) => ConversionRule::ObjectFromRational,
            (Object, Object) => ConversionRule::ObjectFromObject,
            (Complex, Rational) | (Rational, Complex | Float) => return None,
            (Category::None, _) | (_, Category::None) => return None,
        };
        Some(rule)
    }

    /// Render the C fragment with destination storage `l` and source storage `r`.
    pub fn render(self, l: &Storage, r: &Storage) -> String {
        match self {
            ConversionRule::ComplexFromComplex => {
                format!("(({l}*)p1)->r = (({r}*)p2)->r; (({l}*)p1)->i = (({r}*)p2)->i;")
            }
            ConversionRule::ComplexFromReal => {
                format!("(({l}*)p1)->i = 0; (({l}*)p1)->r = *({r}*)p2;")
            }
            ConversionRule::ComplexFromObject => format!(
                "(({l}*)p1)->r = REAL2DBL(*(VALUE*)p2); (({l}*)p1)->i = IMAG2DBL(*(VALUE*)p2);"
            ),
            ConversionRule::RealFromComplex => format!("*({l}*)p1 = (({r}*)p2)->r;"),
            ConversionRule::RealFromReal => format!("*({l}*)p1 = *({r}*)p2;"),
            ConversionRule::FloatFromRational => {
                format!("*({l}*)p1 = (({r}*)p2)->n / (double)(({r}*)p2)->d;")
            }
            ConversionRule::IntegerFromRational => {
                format!("*({l}*)p1 = (({r}*)p2)->n / (({r}*)p2)->d;")
            }
            ConversionRule::RealFromObject => format!("*({l}*)p1 = NUM2DBL(*(VALUE*)p2);"),
            ConversionRule::RationalFromInteger => {
                format!("(({l}*)p1)->d = 1; (({l}*)p1)->n = *({r}*)p2;")
            }
            ConversionRule::RationalFromRational => {
                format!("(({l}*)p1)->d = (({r}*)p2)->d; (({l}*)p1)->n = (({r}*)p2)->n;")
            }
            ConversionRule::RationalFromObject => format!(
                "(({l}*)p1)->n = NUMER2INT(*(VALUE*)p2); (({l}*)p1)->d = DENOM2INT(*(VALUE*)p2);"
            ),
            ConversionRule::ObjectFromComplex => format!(
                "*({l}*)p1 = rb_complex_new(rb_float_new((({r}*)p2)->r), rb_float_new((({r}*)p2)->i));"
            ),
            ConversionRule::ObjectFromFloat => format!("*({l}*)p1 = rb_float_new(*({r}*)p2);"),
            ConversionRule::ObjectFromInteger => format!("*({l}*)p1 = INT2NUM(*({r}*)p2);"),
            ConversionRule::ObjectFromRational => format!(
                "*({l}*)p1 = rb_rational_new(INT2FIX((({r}*)p2)->n), INT2FIX((({r}*)p2)->d));"
            ),
            ConversionRule::ObjectFromObject => format!("*({l}*)p1 = *({r}*)p2;"),
        }
    }
}

/// The assignment fragment for `dest ← src`.
pub fn emit_assign(
    dest: &TypeDescriptor,
    src: &TypeDescriptor,
) -> Result<String, UnsupportedConversion> {
    match ConversionRule::select(dest.category(), src.category()) {
        Some(rule) => Ok(rule.render(dest.storage(), src.storage())),
        None => Err(UnsupportedConversion {
            dest: dest.sym().to_string(),
            src: src.sym().to_string(),
            dest_category: dest.category(),
            src_category: src.category(),
        }),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
