//! Static item catalog: the candidate lists behind every reel.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

/// A reel category. Declaration order is the spin-all request order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    #[serde(alias = "spinner-hero")]
    Heroes,
    #[serde(alias = "spinner-fskill")]
    FSkills,
    #[serde(alias = "spinner-ult")]
    Ultimates,
    #[serde(alias = "spinner-melee")]
    MeleeWeapons,
    #[serde(alias = "spinner-ranged")]
    RangedWeapons,
}

impl Category {
    pub const ALL: [Self; 5] = [
        Self::Heroes,
        Self::FSkills,
        Self::Ultimates,
        Self::MeleeWeapons,
        Self::RangedWeapons,
    ];

    /// Key used in persisted records and catalog JSON.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Heroes => "heroes",
            Self::FSkills => "fSkills",
            Self::Ultimates => "ultimates",
            Self::MeleeWeapons => "meleeWeapons",
            Self::RangedWeapons => "rangedWeapons",
        }
    }

    /// Human-facing label shown on the result board.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Heroes => "英雄",
            Self::FSkills => "F技能",
            Self::Ultimates => "大招",
            Self::MeleeWeapons => "近战武器",
            Self::RangedWeapons => "远程武器",
        }
    }

    /// DOM id of the spinner element rendering this reel.
    #[must_use]
    pub const fn spinner_id(self) -> &'static str {
        match self {
            Self::Heroes => "spinner-hero",
            Self::FSkills => "spinner-fskill",
            Self::Ultimates => "spinner-ult",
            Self::MeleeWeapons => "spinner-melee",
            Self::RangedWeapons => "spinner-ranged",
        }
    }

    /// Accepts either the record key or the spinner id.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.key() == raw || category.spinner_id() == raw)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog is missing category {0}")]
    MissingCategory(Category),
    #[error("category {0} has no candidates")]
    EmptyCategory(Category),
    #[error("category {category} lists {candidate:?} more than once")]
    DuplicateCandidate { category: Category, candidate: String },
}

const HEROES: [&str; 24] = [
    "迦南",
    "土御门胡桃",
    "季沧海",
    "天海",
    "宁红夜",
    "特木尔",
    "妖刀姬",
    "崔三娘",
    "岳山",
    "无尘",
    "顾清寒",
    "武田信忠",
    "殷紫平",
    "沈妙",
    "胡为",
    "季莹莹",
    "玉玲珑",
    "哈迪",
    "魏轻",
    "刘炼",
    "张起灵",
    "席拉",
    "蓝梦",
    "李寻欢",
];

const F_SKILLS: [&str; 2] = ["F1", "F2"];

const ULTIMATES: [&str; 2] = ["V1", "V2"];

const MELEE_WEAPONS: [&str; 15] = [
    "阔刀", "太刀", "长剑", "长枪", "匕首", "双节棍", "双刀", "长棍", "斩马刀", "横刀", "扇子",
    "双戟", "拳刃", "链刃", "飞刀",
];

const RANGED_WEAPONS: [&str; 5] = ["弓箭", "火炮", "鸟铳", "五眼铳", "连弩"];

/// Read-only mapping from category to its ordered candidate labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    categories: BTreeMap<Category, Vec<String>>,
}

impl Catalog {
    /// The built-in data set shipped with the wheel.
    #[must_use]
    pub fn builtin() -> Self {
        let lists: [(Category, &[&str]); 5] = [
            (Category::Heroes, &HEROES[..]),
            (Category::FSkills, &F_SKILLS[..]),
            (Category::Ultimates, &ULTIMATES[..]),
            (Category::MeleeWeapons, &MELEE_WEAPONS[..]),
            (Category::RangedWeapons, &RANGED_WEAPONS[..]),
        ];
        let categories = lists
            .into_iter()
            .map(|(category, items)| {
                (
                    category,
                    items.iter().map(|item| (*item).to_string()).collect(),
                )
            })
            .collect();
        Self { categories }
    }

    /// Build a catalog from explicit lists, validating every category.
    ///
    /// # Errors
    ///
    /// Returns an error if a category is missing, empty, or repeats a label.
    pub fn from_lists(categories: BTreeMap<Category, Vec<String>>) -> Result<Self, CatalogError> {
        for category in Category::ALL {
            let items = categories
                .get(&category)
                .ok_or(CatalogError::MissingCategory(category))?;
            if items.is_empty() {
                return Err(CatalogError::EmptyCategory(category));
            }
            let mut seen = BTreeSet::new();
            for item in items {
                if !seen.insert(item.as_str()) {
                    return Err(CatalogError::DuplicateCandidate {
                        category,
                        candidate: item.clone(),
                    });
                }
            }
        }
        Ok(Self { categories })
    }

    /// Load a catalog from JSON shaped like `{ "heroes": ["..."], ... }`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or fails validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let categories: BTreeMap<Category, Vec<String>> = serde_json::from_str(json)?;
        Self::from_lists(categories)
    }

    /// Ordered candidates of a category.
    #[must_use]
    pub fn candidates(&self, category: Category) -> &[String] {
        self.categories
            .get(&category)
            .map_or(&[][..], Vec::as_slice)
    }

    #[must_use]
    pub fn contains(&self, category: Category, candidate: &str) -> bool {
        self.candidates(category)
            .iter()
            .any(|item| item == candidate)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_has_every_category() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.candidates(Category::Heroes).len(), 24);
        assert_eq!(catalog.candidates(Category::FSkills), ["F1", "F2"]);
        assert_eq!(catalog.candidates(Category::RangedWeapons).len(), 5);
        assert!(catalog.contains(Category::MeleeWeapons, "太刀"));
        assert!(!catalog.contains(Category::Heroes, "太刀"));
    }

    #[test]
    fn category_parses_keys_and_spinner_ids() {
        assert_eq!(Category::parse("fSkills"), Some(Category::FSkills));
        assert_eq!(Category::parse("spinner-ult"), Some(Category::Ultimates));
        assert_eq!(Category::parse(" meleeWeapons "), Some(Category::MeleeWeapons));
        assert_eq!(Category::parse("armor"), None);
    }

    #[test]
    fn category_serializes_as_record_key() {
        let json = serde_json::to_string(&Category::RangedWeapons).unwrap();
        assert_eq!(json, "\"rangedWeapons\"");
        let legacy: Vec<Category> =
            serde_json::from_str(r#"["spinner-hero", "ultimates"]"#).unwrap();
        assert_eq!(legacy, vec![Category::Heroes, Category::Ultimates]);
    }

    #[test]
    fn from_json_rejects_missing_and_duplicate_entries() {
        let missing = r#"{ "heroes": ["A"] }"#;
        assert!(matches!(
            Catalog::from_json(missing),
            Err(CatalogError::MissingCategory(Category::FSkills))
        ));

        let duplicate = r#"{
            "heroes": ["A", "A"],
            "fSkills": ["F1"],
            "ultimates": ["V1"],
            "meleeWeapons": ["M"],
            "rangedWeapons": ["R"]
        }"#;
        assert!(matches!(
            Catalog::from_json(duplicate),
            Err(CatalogError::DuplicateCandidate { category: Category::Heroes, .. })
        ));
    }

    #[test]
    fn from_json_accepts_complete_catalog() {
        let json = r#"{
            "heroes": ["A", "B", "C"],
            "fSkills": ["F1"],
            "ultimates": ["V1"],
            "meleeWeapons": ["M"],
            "rangedWeapons": ["R"]
        }"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.candidates(Category::Heroes), ["A", "B", "C"]);
    }
}
