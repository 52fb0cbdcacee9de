//! Topic categories and the table that drives prompt tone and image style.

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Technology,
    Cars,
    Gadgets,
    Agriculture,
    Trends,
    Humor,
    Ideas,
    Tourism,
    Wisdom,
}

/// How the content generator should write for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentTone {
    /// A recent, verified news item.
    News,
    /// A quotation with attribution. No search grounding.
    Wisdom,
}

/// One row of the category table.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryProfile {
    pub category: Category,
    /// Arabic display label, also used as the prompt topic and card badge.
    pub label: &'static str,
    pub tone: ContentTone,
    /// Appended to the image prompt.
    pub image_style: &'static str,
    pub grounded: bool,
}

const NEWS_STYLE: &str = "Dynamic news environment.";
const WISDOM_STYLE: &str = "Abstract philosophical art, minimalist, dark academia vibes.";

pub static CATEGORY_TABLE: [CategoryProfile; 9] = [
    news(Category::Technology, "الذكاء الاصطناعي"),
    news(Category::Cars, "تكنولوجيا السيارات"),
    news(Category::Gadgets, "الأجهزة الحديثة"),
    news(Category::Agriculture, "الزراعة الذكية"),
    news(Category::Trends, "الترندات العالمية"),
    news(Category::Humor, "مقاطع مضحكة"),
    news(Category::Ideas, "أفكار ممتعة"),
    news(Category::Tourism, "السياحة والسفر"),
    CategoryProfile {
        category: Category::Wisdom,
        label: "حكم وفلسفة",
        tone: ContentTone::Wisdom,
        image_style: WISDOM_STYLE,
        grounded: false,
    },
];

const fn news(category: Category, label: &'static str) -> CategoryProfile {
    CategoryProfile {
        category,
        label,
        tone: ContentTone::News,
        image_style: NEWS_STYLE,
        grounded: true,
    }
}

impl Category {
    pub fn all() -> impl Iterator<Item = Category> {
        CATEGORY_TABLE.iter().map(|p| p.category)
    }

    pub fn profile(self) -> &'static CategoryProfile {
        // Table order matches declaration order.
        &CATEGORY_TABLE[self as usize]
    }

    pub fn label(self) -> &'static str {
        self.profile().label
    }

    pub fn tone(self) -> ContentTone {
        self.profile().tone
    }

    /// Uniformly random category from the table.
    pub fn random() -> Category {
        CATEGORY_TABLE
            .choose(&mut rand::thread_rng())
            .map(|p| p.category)
            .unwrap_or(Category::Technology)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Technology => "technology",
            Category::Cars => "cars",
            Category::Gadgets => "gadgets",
            Category::Agriculture => "agriculture",
            Category::Trends => "trends",
            Category::Humor => "humor",
            Category::Ideas => "ideas",
            Category::Tourism => "tourism",
            Category::Wisdom => "wisdom",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Category::all()
            .find(|c| c.as_str() == key)
            .ok_or_else(|| format!("unknown category '{}'", s.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_rows_match_variants() {
        for (i, profile) in CATEGORY_TABLE.iter().enumerate() {
            assert_eq!(profile.category as usize, i);
            assert_eq!(profile.category.profile().label, profile.label);
        }
    }

    #[test]
    fn test_only_wisdom_is_ungrounded() {
        let ungrounded: Vec<Category> = CATEGORY_TABLE
            .iter()
            .filter(|p| !p.grounded)
            .map(|p| p.category)
            .collect();
        assert_eq!(ungrounded, vec![Category::Wisdom]);
        assert_eq!(Category::Wisdom.tone(), ContentTone::Wisdom);
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&Category::Technology).unwrap();
        assert_eq!(json, "\"technology\"");
        let back: Category = serde_json::from_str("\"tourism\"").unwrap();
        assert_eq!(back, Category::Tourism);
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!(" Cars ".parse::<Category>().unwrap(), Category::Cars);
        assert!("sports".parse::<Category>().is_err());
    }

    #[test]
    fn test_random_is_a_table_category() {
        for _ in 0..50 {
            let c = Category::random();
            assert!(Category::all().any(|x| x == c));
        }
    }
}
