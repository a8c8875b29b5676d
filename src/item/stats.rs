//! Named stat access for items.
//!
//! [`StatVector`] stores a fixed schema of numeric stats ([`StatKey`]) and a
//! couple of text fields ([`TextField`]). Every field has a stable PascalCase
//! property name so that validators and tiers can address it by string.

use std::fmt;
use std::str::FromStr;

use crate::error::LoadoutError;

/// Grouping used when listing fields for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatCategory {
    Defence,
    Attribute,
    Resistance,
    Offence,
    Recovery,
    Utility,
    Text,
}

macro_rules! stat_schema {
    ($($variant:ident => $name:literal, $label:literal, $category:ident;)+) => {
        /// A numeric stat in the item schema.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum StatKey {
            $($variant,)+
        }

        impl StatKey {
            /// All numeric stats in schema order.
            pub const ALL: &'static [StatKey] = &[$(StatKey::$variant,)+];

            /// Number of numeric stats in the schema.
            pub const COUNT: usize = Self::ALL.len();

            /// Stable property name used for lookup.
            pub fn name(self) -> &'static str {
                match self {
                    $(StatKey::$variant => $name,)+
                }
            }

            /// Human readable label.
            pub fn label(self) -> &'static str {
                match self {
                    $(StatKey::$variant => $label,)+
                }
            }

            /// Display category.
            pub fn category(self) -> StatCategory {
                match self {
                    $(StatKey::$variant => StatCategory::$category,)+
                }
            }
        }
    };
}

stat_schema! {
    Life => "Life", "Maximum Life", Defence;
    Mana => "Mana", "Maximum Mana", Defence;
    EnergyShield => "EnergyShield", "Energy Shield", Defence;
    Armour => "Armour", "Armour", Defence;
    Evasion => "Evasion", "Evasion Rating", Defence;
    Ward => "Ward", "Ward", Defence;
    BlockChance => "BlockChance", "Block Chance", Defence;
    SpellBlockChance => "SpellBlockChance", "Spell Block Chance", Defence;
    Strength => "Strength", "Strength", Attribute;
    Dexterity => "Dexterity", "Dexterity", Attribute;
    Intelligence => "Intelligence", "Intelligence", Attribute;
    AllAttributes => "AllAttributes", "All Attributes", Attribute;
    FireResistance => "FireResistance", "Fire Resistance", Resistance;
    ColdResistance => "ColdResistance", "Cold Resistance", Resistance;
    LightningResistance => "LightningResistance", "Lightning Resistance", Resistance;
    ChaosResistance => "ChaosResistance", "Chaos Resistance", Resistance;
    AllElementalResistance => "AllElementalResistance", "All Elemental Resistances", Resistance;
    PhysicalDamage => "PhysicalDamage", "Increased Physical Damage", Offence;
    FireDamage => "FireDamage", "Increased Fire Damage", Offence;
    ColdDamage => "ColdDamage", "Increased Cold Damage", Offence;
    LightningDamage => "LightningDamage", "Increased Lightning Damage", Offence;
    ChaosDamage => "ChaosDamage", "Increased Chaos Damage", Offence;
    SpellDamage => "SpellDamage", "Increased Spell Damage", Offence;
    AttackSpeed => "AttackSpeed", "Increased Attack Speed", Offence;
    CastSpeed => "CastSpeed", "Increased Cast Speed", Offence;
    CriticalChance => "CriticalChance", "Critical Strike Chance", Offence;
    CriticalMultiplier => "CriticalMultiplier", "Critical Strike Multiplier", Offence;
    Accuracy => "Accuracy", "Accuracy Rating", Offence;
    AddedPhysicalDamage => "AddedPhysicalDamage", "Adds Physical Damage to Attacks", Offence;
    ElementalDamageWithAttacks => "ElementalDamageWithAttacks", "Elemental Damage with Attacks", Offence;
    LifeRegeneration => "LifeRegeneration", "Life Regeneration per Second", Recovery;
    ManaRegeneration => "ManaRegeneration", "Mana Regeneration Rate", Recovery;
    LifeLeech => "LifeLeech", "Life Leech", Recovery;
    ManaLeech => "ManaLeech", "Mana Leech", Recovery;
    LifeOnHit => "LifeOnHit", "Life Gained on Hit", Recovery;
    MovementSpeed => "MovementSpeed", "Movement Speed", Utility;
    ItemRarity => "ItemRarity", "Increased Item Rarity", Utility;
    ItemQuantity => "ItemQuantity", "Increased Item Quantity", Utility;
    ItemLevel => "ItemLevel", "Item Level", Utility;
    RequiredLevel => "RequiredLevel", "Required Level", Utility;
}

impl StatKey {
    /// Position of this stat in the schema.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Resolves a property name, exact match first, then ASCII case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name() == name)
            .or_else(|| {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|k| k.name().eq_ignore_ascii_case(name))
            })
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StatKey {
    type Err = LoadoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| LoadoutError::UnknownStat {
            stat: s.to_string(),
            context: "stat lookup".into(),
        })
    }
}

/// Non-numeric item fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextField {
    BaseType,
    Rarity,
}

impl TextField {
    pub const ALL: &'static [TextField] = &[TextField::BaseType, TextField::Rarity];

    pub fn name(self) -> &'static str {
        match self {
            TextField::BaseType => "BaseType",
            TextField::Rarity => "Rarity",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TextField::BaseType => "Base Type",
            TextField::Rarity => "Rarity",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }
}

/// A value read from a [`StatVector`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatValue<'a> {
    Number(f64),
    Text(&'a str),
}

impl StatValue<'_> {
    /// Returns the numeric value, or `None` for text fields.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StatValue::Number(v) => Some(*v),
            StatValue::Text(_) => None,
        }
    }
}

/// Metadata describing one field of the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatField {
    /// Display order, numeric stats first.
    pub order: usize,
    /// Stable property name.
    pub name: &'static str,
    /// Human readable label.
    pub label: &'static str,
    pub category: StatCategory,
}

/// Fixed-schema stat storage for one item.
///
/// # Examples
///
/// ```
/// use u_loadout::item::{StatKey, StatVector};
///
/// let stats = StatVector::new()
///     .with(StatKey::Life, 70.0)
///     .with(StatKey::FireResistance, 30.0);
///
/// assert_eq!(stats.numeric(StatKey::Life), 70.0);
/// assert_eq!(stats.get("fireresistance").and_then(|v| v.as_f64()), Some(30.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawStatVector"))]
pub struct StatVector {
    values: Vec<f64>,
    base_type: String,
    rarity: String,
}

/// Unchecked wire form of [`StatVector`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawStatVector {
    values: Vec<f64>,
    #[serde(default)]
    base_type: String,
    #[serde(default)]
    rarity: String,
}

#[cfg(feature = "serde")]
impl TryFrom<RawStatVector> for StatVector {
    type Error = LoadoutError;

    fn try_from(raw: RawStatVector) -> Result<Self, Self::Error> {
        if raw.values.len() != StatKey::COUNT {
            return Err(LoadoutError::StatCountMismatch {
                expected: StatKey::COUNT,
                found: raw.values.len(),
            });
        }
        Ok(Self {
            values: raw.values,
            base_type: raw.base_type,
            rarity: raw.rarity,
        })
    }
}

impl Default for StatVector {
    fn default() -> Self {
        Self {
            values: vec![0.0; StatKey::COUNT],
            base_type: String::new(),
            rarity: String::new(),
        }
    }
}

impl StatVector {
    /// Creates a vector with every numeric stat at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a numeric stat and returns `self`.
    pub fn with(mut self, key: StatKey, value: f64) -> Self {
        self.set(key, value);
        self
    }

    /// Sets a text field and returns `self`.
    pub fn with_text(mut self, field: TextField, value: impl Into<String>) -> Self {
        self.set_text(field, value);
        self
    }

    pub fn set(&mut self, key: StatKey, value: f64) {
        self.values[key.index()] = value;
    }

    pub fn set_text(&mut self, field: TextField, value: impl Into<String>) {
        match field {
            TextField::BaseType => self.base_type = value.into(),
            TextField::Rarity => self.rarity = value.into(),
        }
    }

    /// Reads a numeric stat.
    pub fn numeric(&self, key: StatKey) -> f64 {
        self.values[key.index()]
    }

    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::BaseType => &self.base_type,
            TextField::Rarity => &self.rarity,
        }
    }

    /// Looks up any field by property name.
    pub fn get(&self, name: &str) -> Option<StatValue<'_>> {
        if let Some(key) = StatKey::from_name(name) {
            return Some(StatValue::Number(self.numeric(key)));
        }
        TextField::from_name(name).map(|f| StatValue::Text(self.text(f)))
    }

    /// Enumerates every field with its metadata, numeric stats first.
    pub fn fields(&self) -> impl Iterator<Item = (StatField, StatValue<'_>)> + '_ {
        let numeric = StatKey::ALL.iter().map(move |&k| {
            (
                StatField {
                    order: k.index(),
                    name: k.name(),
                    label: k.label(),
                    category: k.category(),
                },
                StatValue::Number(self.numeric(k)),
            )
        });
        let text = TextField::ALL.iter().enumerate().map(move |(i, &f)| {
            (
                StatField {
                    order: StatKey::COUNT + i,
                    name: f.name(),
                    label: f.label(),
                    category: StatCategory::Text,
                },
                StatValue::Text(self.text(f)),
            )
        });
        numeric.chain(text)
    }

    /// Returns `true` if any numeric stat in `keys` is nonzero.
    pub fn touches(&self, keys: &[StatKey]) -> bool {
        keys.iter().any(|&k| self.numeric(k) != 0.0)
    }
}
