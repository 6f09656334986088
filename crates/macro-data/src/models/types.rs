use std::borrow::Cow;

/// Canonical ISO 3166-1 alpha-2 country code (the merge alphabet) - mostly static
pub type CountryCode = Cow<'static, str>;
