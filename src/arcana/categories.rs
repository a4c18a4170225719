//! Sphere Category Lookup Table
//!
//! Maps free-form sphere labels ("ЛИЧНЫЕ КАЧЕСТВА И ХАРАКТЕР", "ДЕНЬГИ И
//! БИЗНЕС", ...) onto the closed set of keys the front-end understands.
//!
//! The table is ordered and the first rule whose keyword occurs in the
//! upper-cased label wins. "ДЕТИ И РОДИТЕЛИ" is therefore `parents`, since
//! the parents rule is tested before the children rule.

use serde::Serialize;

/// Normalized sphere key used in the generated data script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SphereCategory {
    Qualities,
    Pastlife,
    Talents,
    Purpose,
    Money,
    Programs,
    Sexuality,
    Parents,
    Children,
    Relationships,
    Leadership,
    Year,
    Brand,
    Health,
}

impl SphereCategory {
    /// Key as it appears in the generated JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            SphereCategory::Qualities => "qualities",
            SphereCategory::Pastlife => "pastlife",
            SphereCategory::Talents => "talents",
            SphereCategory::Purpose => "purpose",
            SphereCategory::Money => "money",
            SphereCategory::Programs => "programs",
            SphereCategory::Sexuality => "sexuality",
            SphereCategory::Parents => "parents",
            SphereCategory::Children => "children",
            SphereCategory::Relationships => "relationships",
            SphereCategory::Leadership => "leadership",
            SphereCategory::Year => "year",
            SphereCategory::Brand => "brand",
            SphereCategory::Health => "health",
        }
    }
}

/// One row of the classification table.
#[derive(Debug, Clone)]
pub struct SphereRule {
    pub category: SphereCategory,
    pub keywords: &'static [&'static str],
}

// ============================================================================
// EMBEDDED KEYWORD TABLE
// Order matters: rules are tested top to bottom.
// ============================================================================

pub static SPHERE_RULES: &[SphereRule] = &[
    SphereRule { category: SphereCategory::Qualities, keywords: &["ЛИЧНЫЕ КАЧЕСТВА", "ХАРАКТЕР"] },
    SphereRule { category: SphereCategory::Pastlife, keywords: &["ПРОШЛАЯ ЖИЗНЬ"] },
    SphereRule { category: SphereCategory::Talents, keywords: &["ТАЛАНТЫ"] },
    SphereRule { category: SphereCategory::Purpose, keywords: &["ПРЕДНАЗНАЧЕНИЕ"] },
    SphereRule { category: SphereCategory::Money, keywords: &["ДЕНЬГИ", "БИЗНЕС"] },
    SphereRule { category: SphereCategory::Programs, keywords: &["ПРОГРАММЫ"] },
    SphereRule { category: SphereCategory::Sexuality, keywords: &["СЕКСУАЛЬНОСТЬ"] },
    SphereRule { category: SphereCategory::Parents, keywords: &["РОДИТЕЛИ"] },
    SphereRule { category: SphereCategory::Children, keywords: &["ДЕТИ"] },
    SphereRule { category: SphereCategory::Relationships, keywords: &["ОТНОШЕНИЯ"] },
    SphereRule { category: SphereCategory::Leadership, keywords: &["РУКОВОДСТВО", "УПРАВЛЕНИЕ"] },
    SphereRule { category: SphereCategory::Year, keywords: &["ПРОГНОЗ НА ГОД"] },
    SphereRule { category: SphereCategory::Brand, keywords: &["ЛИЧНЫЙ БРЕНД", "ПОЗИЦИОНИРОВАНИЕ"] },
    SphereRule { category: SphereCategory::Health, keywords: &["ЗДОРОВЬЕ"] },
];

/// Classify a sphere label into its category.
///
/// Case-insensitive: the label is upper-cased before the substring tests.
///
/// # Returns
/// None if no keyword of any rule occurs in the label
pub fn classify_sphere(label: &str) -> Option<SphereCategory> {
    let upper = label.to_uppercase();
    SPHERE_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|keyword| upper.contains(keyword)))
        .map(|rule| rule.category)
}
