/*!
 * Static lookup tables for decoding item attributes
 *
 * Codes in the item exports are game-internal numbers. These tables map
 * them back to the names shown in the details view and used by the SQL
 * export. A code missing from a table is not an error: callers fall back
 * to the raw value.
 */

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::Serialize;
use strum::{Display, EnumIter, EnumProperty, FromRepr};

/// Weapon / combat skill codes
pub static SKILLS: Lazy<HashMap<i32, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (0x0000, "SKILL: PetItem/Non Throwable ammo/Grip"),
        (0x0001, "SKILL: HandToHand"),
        (0x0002, "SKILL: Dagger"),
        (0x0003, "SKILL: Sword"),
        (0x0004, "SKILL: Greatsword"),
        (0x0005, "SKILL: Axe"),
        (0x0006, "SKILL: Greataxe"),
        (0x0007, "SKILL: Scythe"),
        (0x0008, "SKILL: Polearm"),
        (0x0009, "SKILL: Katana"),
        (0x000A, "SKILL: Greatkatana"),
        (0x000B, "SKILL: Club"),
        (0x000C, "SKILL: Staff"),
        (0x0019, "SKILL: Bow/Arrow"),
        (0x001A, "SKILL: Marksmanship"),
        (0x001B, "SKILL: Throwing"),
        (0x0029, "SKILL: Harp"),
        (0x002A, "SKILL: Horn/Flute"),
        (0x0030, "SKILL: FishingRod/Bait"),
    ])
});

/// Equipment slot masks. Only single-slot values are named.
pub static SLOTS: Lazy<HashMap<i32, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (0x0001, "Main Hand"),
        (0x0002, "Sub Hand"),
        (0x0004, "Ranged"),
        (0x0008, "Ammo"),
        (0x0010, "Head"),
        (0x0020, "Body"),
        (0x0040, "Hands"),
        (0x0080, "Legs"),
        (0x0100, "Feet"),
        (0x0200, "Neck"),
        (0x0400, "Waist"),
        (0x0800, "Left Ear"),
        (0x1000, "Right Ear"),
        (0x2000, "Left Ring"),
        (0x4000, "Right Ring"),
        (0x8000, "Back"),
    ])
});

/// An RGB display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse a `#RRGGBB` string
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Item elements, keyed by their numeric code
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display, FromRepr, EnumProperty, Serialize,
)]
#[repr(i32)]
pub enum Element {
    #[strum(props(color = "#FF4500"))]
    Fire = 0,
    #[strum(props(color = "#87CEEB"))]
    Ice = 1,
    #[strum(props(color = "#32CD32"))]
    Wind = 2,
    #[strum(props(color = "#A0522D"))]
    Earth = 3,
    #[strum(props(color = "#FFFF00"))]
    Lightning = 4,
    #[strum(props(color = "#0000FF"))]
    Water = 5,
    #[strum(props(color = "#FFFFFF"))]
    Light = 6,
    #[strum(props(color = "#800080"))]
    Dark = 7,
}

impl Element {
    /// Look up an element by its code
    pub fn from_code(code: i32) -> Option<Self> {
        Self::from_repr(code)
    }

    /// Color the element name is displayed in
    pub fn color(&self) -> Rgb {
        self.get_str("color")
            .and_then(Rgb::from_hex)
            .unwrap_or(Rgb {
                r: 0xFF,
                g: 0xFF,
                b: 0xFF,
            })
    }
}

/// A single item flag bit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flag {
    pub name: &'static str,
    pub value: i32,
}

/// Item flag bits, in reporting order
pub const FLAGS: &[Flag] = &[
    Flag { name: "WALLHANGING", value: 0x0001 },
    Flag { name: "ITEM FLAG 01", value: 0x0002 },
    Flag { name: "AVAILABLE FROM MYSTERY BOX (GOBBIE BOX ECT.)", value: 0x0004 },
    Flag { name: "AVAILABLE FROM MOG GARDEN", value: 0x0008 },
    Flag { name: "CAN MAIL TO SAME ACCOUNT", value: 0x0010 },
    Flag { name: "INSCRIBABLE", value: 0x0020 },
    Flag { name: "CANNOT PUT UP FOR AUCTION", value: 0x0040 },
    Flag { name: "ITEM IS A SCROLL", value: 0x0080 },
    Flag { name: "LINKSHELL (PEARL/SACK)", value: 0x0100 },
    Flag { name: "CAN USE ITEM (EXAMPLE: CHARGED ITEMS)", value: 0x0200 },
    Flag { name: "CAN TRADE TO AN NPC", value: 0x0400 },
    Flag { name: "CAN EQUIP ITEM", value: 0x0800 },
    Flag { name: "NOT SELABLE", value: 0x1000 },
    Flag { name: "NO DELIVERY FROM AH", value: 0x2000 },
    Flag { name: "EX", value: 0x4000 },
    Flag { name: "RARE", value: 0x8000 },
];

/// A job and its two encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Job {
    /// Three-letter job abbreviation
    pub name: &'static str,
    /// Bit in the item's `jobs` hex mask
    pub bit: i32,
    /// Weight summed into the legacy `item_basic` job column
    pub lsb: i64,
}

/// Jobs, in the order the game lists them
pub const JOBS: &[Job] = &[
    Job { name: "WAR", bit: 0x00001, lsb: 1 },
    Job { name: "MNK", bit: 0x00002, lsb: 2 },
    Job { name: "WHM", bit: 0x00004, lsb: 4 },
    Job { name: "BLM", bit: 0x00008, lsb: 8 },
    Job { name: "RDM", bit: 0x00010, lsb: 16 },
    Job { name: "THF", bit: 0x00020, lsb: 32 },
    Job { name: "PLD", bit: 0x00040, lsb: 64 },
    Job { name: "DRK", bit: 0x00080, lsb: 128 },
    Job { name: "BST", bit: 0x00100, lsb: 256 },
    Job { name: "BRD", bit: 0x00200, lsb: 512 },
    Job { name: "RNG", bit: 0x00400, lsb: 1024 },
    Job { name: "SAM", bit: 0x00800, lsb: 2048 },
    Job { name: "NIN", bit: 0x01000, lsb: 4096 },
    Job { name: "DRG", bit: 0x02000, lsb: 8192 },
    Job { name: "SMN", bit: 0x04000, lsb: 16384 },
    Job { name: "BLU", bit: 0x08000, lsb: 32768 },
    Job { name: "COR", bit: 0x10000, lsb: 65536 },
    Job { name: "PUP", bit: 0x20000, lsb: 131072 },
    Job { name: "DNC", bit: 0x40000, lsb: 262144 },
    Job { name: "SCH", bit: 0x80000, lsb: 524288 },
    Job { name: "GEO", bit: 0x100000, lsb: 1048576 },
    Job { name: "RUN", bit: 0x200000, lsb: 2097152 },
];

/// Name of the flag that marks an item as unsellable
pub const NOT_SELLABLE_FLAG: &str = "NOT SELABLE";

/// Look up a skill name
pub fn skill_name(code: i32) -> Option<&'static str> {
    SKILLS.get(&code).copied()
}

/// Look up a slot name
pub fn slot_name(mask: i32) -> Option<&'static str> {
    SLOTS.get(&mask).copied()
}

/// Look up a flag's bit value by name
pub fn flag_value(name: &str) -> Option<i32> {
    FLAGS.iter().find(|f| f.name == name).map(|f| f.value)
}

/// Names of every flag set in `flags`, in table order
pub fn set_flags(flags: i32) -> Vec<&'static str> {
    FLAGS
        .iter()
        .filter(|f| flags & f.value != 0)
        .map(|f| f.name)
        .collect()
}

/// Look up a job by its abbreviation
pub fn job(name: &str) -> Option<&'static Job> {
    JOBS.iter().find(|j| j.name == name)
}

/// Names of every job whose bit is set in `mask`, in table order
pub fn enabled_jobs(mask: i32) -> Vec<&'static str> {
    JOBS.iter()
        .filter(|j| mask & j.bit != 0)
        .map(|j| j.name)
        .collect()
}

/// Sum of the LSB weights of the named jobs. Unknown names contribute nothing.
pub fn combined_lsb(jobs: &[&str]) -> i64 {
    jobs.iter().filter_map(|name| job(name)).map(|j| j.lsb).sum()
}
