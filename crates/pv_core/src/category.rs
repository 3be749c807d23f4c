//! The six fixed radar axes. Order is part of the output contract: every
//! radar lists categories in `Category::ALL` order.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Category {
    Economy,
    Welfare,
    Security,
    Rights,
    Digital,
    Other,
}

impl Category {
    /// Fixed display order.
    pub const ALL: [Category; 6] = [
        Category::Economy,
        Category::Welfare,
        Category::Security,
        Category::Rights,
        Category::Digital,
        Category::Other,
    ];

    /// Wire key.
    pub fn key(self) -> &'static str {
        match self {
            Category::Economy => "economy",
            Category::Welfare => "welfare",
            Category::Security => "security",
            Category::Rights => "rights",
            Category::Digital => "digital",
            Category::Other => "other",
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Category::Economy => "経済・財政",
            Category::Welfare => "社会保障・子育て",
            Category::Security => "外交・安全保障",
            Category::Rights => "人権・多様性",
            Category::Digital => "デジタル・行政改革",
            Category::Other => "その他",
        }
    }

    /// Position in `ALL`.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
