//! Device Identification
//!
//! Maps a 12-hex-digit hardware identifier to a device model using the ordered
//! built-in rule table. Classification is pure: the result depends only on the
//! identifier and the rule order.

pub mod identifier;
pub mod model;
pub mod rules;

pub use identifier::{HardwareIdentifier, IDENTIFIER_LEN, VENDOR_PREFIXES};
pub use model::{Model, UnknownModel};
pub use rules::{builtin, ClassificationRule, RuleTable, BUILTIN_RULES};

/// Classify raw operator input against the built-in table.
///
/// Returns `None` for input that is not 12 hex digits, carries an unknown vendor
/// prefix, or matches no rule.
pub fn classify(raw: &str) -> Option<Model> {
    let id = HardwareIdentifier::parse(raw).ok()?;
    builtin().classify(&id)
}

/// Precondition gate for mutating operations: the identifier classifies to a known
/// model and its device block decodes as hex.
pub fn validate(raw: &str) -> bool {
    let Ok(id) = HardwareIdentifier::parse(raw) else {
        return false;
    };
    builtin().classify(&id).is_some() && hex::decode(id.suffix()).is_ok()
}
