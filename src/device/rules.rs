//! Ordered classification rules.
//!
//! Ranges overlap by construction: a model that owns a narrow block inside another
//! model's range is listed before that range, and the first matching rule wins.
//! Reordering the table changes results for identifiers in the overlap.

use super::identifier::HardwareIdentifier;
use super::model::Model;
use crate::error::IdentifierError;
use regex::Regex;
use std::sync::LazyLock;

/// Built-in rule table. Patterns are anchored at the start of the identifier.
pub const BUILTIN_RULES: &[(&str, Model)] = &[
    ("000413(25|28|2D|2F|34|36|37|3B|3D|3E|49|4A|4C|50|4E)[0-9A-F]{4}", Model::Snom300),
    ("000413(24|27|2C|31|35|38|3F|4D|51)[0-9A-F]{4}", Model::Snom320),
    ("000413(26|2E|3A|3C|52)[0-9A-F]{4}", Model::Snom370),
    ("000413(30|56)[0-9A-F]{4}", Model::SnomM9),
    ("000413(32|55)[0-9A-F]{4}", Model::SnomMP),
    ("00041361[0-9A-F]{4}|00087B(08|09|0B)[0-9A-F]{4}", Model::SnomM700),
    ("000413(62|B8)[0-9A-F]{4}|00087BD7[0-9A-F]{4}", Model::SnomM300),
    ("000413B6[0-9A-F]{4}", Model::SnomM900),
    ("000413(33|8D)[0-9A-F]{4}", Model::SnomPA1),
    ("00041340[0-9A-F]{4}", Model::Snom820),
    ("000413(45|46|48|4B|53)[0-9A-F]{4}", Model::Snom821),
    ("000413(41|47|54)[0-9A-F]{4}", Model::Snom870),
    ("000413(70|77|7D)[0-9A-F]{4}", Model::Snom720),
    ("000413(78|86|8B|B7)[0-9A-F]{4}", Model::Snom725),
    ("000413(71|7B)[0-9A-F]{4}", Model::Snom760),
    // 00041394B400..00041394B420 is D765; must precede the 715 block below.
    ("00041394B4[0-1][0-9A-F]|00041394B420", Model::SnomD765),
    // 00041394B421..00041394BF03 is 715.
    ("00041394B[4-9A-E][0-9A-F]|00041394BF0[0-3]", Model::Snom715),
    // Only 000413790000..000413790FFF of the 79 block is D765.
    ("000413790[0-9A-F]{3}|000413(90|94)[0-9A-F]{4}", Model::SnomD765),
    // Rest of the 79 block; must follow the D765 rule above.
    ("000413(79|8C)[0-9A-F]{4}", Model::SnomD745),
    ("000413(74|76|7A|7C|7E|89)[0-9A-F]{4}", Model::Snom710),
    ("000413(75|7F|87|8A|A5|B2)[0-9A-F]{4}", Model::Snom715),
    ("000413(88|A8)[0-9A-F]{4}", Model::SnomD712),
    ("000413(91|95)[0-9A-F]{4}", Model::SnomD375),
    ("000413(83|8E)[0-9A-F]{4}", Model::SnomD305),
    // 000413840016..000413840079 is D305; must precede the D315 range.
    ("00041384001[A-F6-9]|0004138400[2-6][0-9A-F]|0004138400[2-7][0-9]", Model::SnomD305),
    ("00041384[0-9A-F]{4}|0004138F[0-9A-F]{4}", Model::SnomD315),
    ("00041385[0-9A-F]{4}|000413A1[0-9A-F]{4}", Model::SnomD345),
    ("000413A6[0-9A-F]{4}", Model::SnomD717),
    ("00041382[0-9A-F]{4}", Model::SnomD120),
    ("000413A3[0-9A-F]{4}", Model::SnomD735),
    ("000413A4[0-9A-F]{4}", Model::SnomD335),
    ("00041364[0-9A-F]{4}", Model::SnomM200SC),
    ("000413(92|96)[0-9A-F]{4}", Model::SnomD785),
    ("00041393[0-9A-F]{4}", Model::SnomD385),
    ("00041398[0-9A-F]{4}", Model::SnomD765),
];

static BUILTIN: LazyLock<RuleTable> = LazyLock::new(|| {
    RuleTable::compile(BUILTIN_RULES).expect("built-in classification rules must compile")
});

/// The compiled built-in table.
pub fn builtin() -> &'static RuleTable {
    &BUILTIN
}

/// One (pattern, model) pair.
#[derive(Debug, Clone)]
pub struct ClassificationRule {
    pattern: Regex,
    model: Model,
}

impl ClassificationRule {
    pub fn new(pattern: &str, model: Model) -> Result<Self, IdentifierError> {
        let anchored = format!("^(?:{})", pattern);
        let pattern = Regex::new(&anchored).map_err(|e| IdentifierError::InvalidRule {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { pattern, model })
    }

    pub fn model(&self) -> Model {
        self.model
    }

    /// Source pattern, including the start anchor.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn matches(&self, id: &HardwareIdentifier) -> bool {
        self.pattern.is_match(id.as_str())
    }
}

/// Immutable ordered rule list, evaluated first-match-wins.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<ClassificationRule>,
}

impl RuleTable {
    pub fn compile(rules: &[(&str, Model)]) -> Result<Self, IdentifierError> {
        let rules = rules
            .iter()
            .map(|(pattern, model)| ClassificationRule::new(pattern, *model))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    /// Index of the first rule matching `id`, if any.
    pub fn position(&self, id: &HardwareIdentifier) -> Option<usize> {
        self.rules.iter().position(|rule| rule.matches(id))
    }

    /// Model of the first matching rule. Identifiers outside the known vendor
    /// prefixes never reach the rules.
    pub fn classify(&self, id: &HardwareIdentifier) -> Option<Model> {
        if !id.has_known_vendor() {
            return None;
        }
        self.position(id).map(|idx| self.rules[idx].model)
    }
}
