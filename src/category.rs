use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::Deserialize;

/// Closed set of portal sections. Order of `ALL` is the order used for
/// navigation and for the home page sidebar.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CategoryKey {
    Nacionales,
    SanJuan,
    Sindicales,
    Opinion,
    Internacionales,
}

impl CategoryKey {
    pub const ALL: [CategoryKey; 5] = [
        CategoryKey::Nacionales,
        CategoryKey::SanJuan,
        CategoryKey::Sindicales,
        CategoryKey::Opinion,
        CategoryKey::Internacionales,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKey::Nacionales => "nacionales",
            CategoryKey::SanJuan => "sanjuan",
            CategoryKey::Sindicales => "sindicales",
            CategoryKey::Opinion => "opinion",
            CategoryKey::Internacionales => "internacionales",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CategoryKey::Nacionales => "Noticias Nacionales",
            CategoryKey::SanJuan => "Noticias de San Juan",
            CategoryKey::Sindicales => "Noticias Sindicales",
            CategoryKey::Opinion => "Columna de Opinión",
            CategoryKey::Internacionales => "Noticias Internacionales",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategoryKey::Nacionales => "NACIONAL",
            CategoryKey::SanJuan => "SAN JUAN",
            CategoryKey::Sindicales => "SINDICAL",
            CategoryKey::Opinion => "OPINIÓN",
            CategoryKey::Internacionales => "INTERNACIONAL",
        }
    }

    /// CSS class of the category badge
    pub fn color(&self) -> &'static str {
        match self {
            CategoryKey::Nacionales => "bg-blue-600",
            CategoryKey::SanJuan => "bg-red-500",
            CategoryKey::Sindicales => "bg-green-600",
            CategoryKey::Internacionales => "bg-yellow-600",
            CategoryKey::Opinion => "bg-purple-600",
        }
    }

    fn default_upstream_id(&self) -> u64 {
        match self {
            CategoryKey::Nacionales => 170094,
            CategoryKey::SanJuan => 67720,
            CategoryKey::Sindicales => 3865306,
            CategoryKey::Opinion => 352,
            CategoryKey::Internacionales => 17119,
        }
    }
}

impl Display for CategoryKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CategoryKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryKey::ALL.iter()
            .find(|key| key.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown category {}", s))
    }
}

/// Optional overrides of the upstream ids, as read from the `[categories]` table
#[derive(Deserialize, Default, Clone)]
pub struct CategoryIds {
    pub nacionales: Option<u64>,
    pub sanjuan: Option<u64>,
    pub sindicales: Option<u64>,
    pub opinion: Option<u64>,
    pub internacionales: Option<u64>,
}

impl CategoryIds {
    fn get(&self, key: CategoryKey) -> Option<u64> {
        match key {
            CategoryKey::Nacionales => self.nacionales,
            CategoryKey::SanJuan => self.sanjuan,
            CategoryKey::Sindicales => self.sindicales,
            CategoryKey::Opinion => self.opinion,
            CategoryKey::Internacionales => self.internacionales,
        }
    }
}

/// The one mapping between portal sections and WordPress category ids.
/// Shared by the page layer and the upstream queries.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    ids: HashMap<CategoryKey, u64>,
}

impl CategoryTable {
    pub fn new(overrides: &CategoryIds) -> Self {
        let ids = CategoryKey::ALL.iter()
            .map(|key| (*key, overrides.get(*key).unwrap_or_else(|| key.default_upstream_id())))
            .collect();

        CategoryTable { ids }
    }

    pub fn id_of(&self, key: CategoryKey) -> u64 {
        // Every key is inserted on construction
        self.ids.get(&key).copied().unwrap_or_else(|| key.default_upstream_id())
    }

    /// Reverse lookup of the first known section among the upstream ids
    pub fn key_of(&self, upstream_ids: &[u64]) -> Option<CategoryKey> {
        upstream_ids.iter().find_map(|id| {
            CategoryKey::ALL.iter().find(|key| self.id_of(**key) == *id).copied()
        })
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        CategoryTable::new(&CategoryIds::default())
    }
}
