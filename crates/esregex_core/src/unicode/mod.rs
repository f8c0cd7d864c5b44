//! Unicode property-name validation and identifier classification.
//!
//! The data lives in the generated `tables` submodule; this module applies
//! the per-edition gates:
//!
//! - General_Category values and the base set of scripts and binary
//!   properties arrive in ES2018.
//! - Each later edition adds the scripts listed under its year.
//! - Properties of strings (`RGI_Emoji`, …) require ES2024 and the `v` flag.

mod tables;

use crate::options::EcmaVersion;

use tables::{
    BINARY_PROPERTIES_2018, BINARY_PROPERTIES_2019, BINARY_PROPERTIES_2021,
    GENERAL_CATEGORY_VALUES_2018, ID_CONTINUE_RANGES, ID_START_RANGES, SCRIPT_VALUES_2018,
    SCRIPT_VALUES_2019, SCRIPT_VALUES_2020, SCRIPT_VALUES_2021, SCRIPT_VALUES_2022,
    SCRIPT_VALUES_2023, STRING_PROPERTIES_2024,
};

// ─────────────────────────────────────────────────────────────────────────────
// Identifiers
// ─────────────────────────────────────────────────────────────────────────────

/// Returns `true` when `cp` lies in one of the sorted inclusive `ranges`.
fn in_ranges(ranges: &[(u32, u32)], cp: u32) -> bool {
    ranges
        .binary_search_by(|&(lo, hi)| {
            if hi < cp {
                std::cmp::Ordering::Less
            } else if lo > cp {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .is_ok()
}

/// Returns `true` for code points with the `ID_Start` property.
pub fn is_id_start(cp: u32) -> bool {
    if cp < 0x41 {
        return false;
    }
    if cp < 0x5b {
        return true;
    }
    if cp < 0x61 {
        return false;
    }
    if cp < 0x7b {
        return true;
    }
    in_ranges(ID_START_RANGES, cp)
}

/// Returns `true` for code points with the `ID_Continue` property.
pub fn is_id_continue(cp: u32) -> bool {
    if cp < 0x30 {
        return false;
    }
    if cp < 0x3a {
        return true;
    }
    if cp < 0x41 {
        return false;
    }
    if cp < 0x5b || cp == 0x5f {
        return true;
    }
    if cp < 0x61 {
        return false;
    }
    if cp < 0x7b {
        return true;
    }
    in_ranges(ID_START_RANGES, cp) || in_ranges(ID_CONTINUE_RANGES, cp)
}

// ─────────────────────────────────────────────────────────────────────────────
// Property names
// ─────────────────────────────────────────────────────────────────────────────

fn contains(table: &[&str], name: &str) -> bool {
    table.binary_search(&name).is_ok()
}

fn is_general_category_value(version: EcmaVersion, value: &str) -> bool {
    version >= EcmaVersion::Es2018 && contains(GENERAL_CATEGORY_VALUES_2018, value)
}

fn is_script_value(version: EcmaVersion, value: &str) -> bool {
    let gated: [(EcmaVersion, &[&str]); 6] = [
        (EcmaVersion::Es2018, SCRIPT_VALUES_2018),
        (EcmaVersion::Es2019, SCRIPT_VALUES_2019),
        (EcmaVersion::Es2020, SCRIPT_VALUES_2020),
        (EcmaVersion::Es2021, SCRIPT_VALUES_2021),
        (EcmaVersion::Es2022, SCRIPT_VALUES_2022),
        (EcmaVersion::Es2023, SCRIPT_VALUES_2023),
    ];
    gated
        .iter()
        .any(|&(since, table)| version >= since && contains(table, value))
}

/// Validate a `name=value` property expression such as `Script=Greek`.
///
/// `name` must be one of `General_Category`/`gc` or
/// `Script`/`Script_Extensions`/`sc`/`scx`, and `value` must belong to the
/// matching value set for `version`.
pub fn is_valid_unicode_property(version: EcmaVersion, name: &str, value: &str) -> bool {
    match name {
        "General_Category" | "gc" => is_general_category_value(version, value),
        "Script" | "Script_Extensions" | "sc" | "scx" => is_script_value(version, value),
        _ => false,
    }
}

/// Validate a lone binary property name such as `ASCII` or `Emoji`.
pub fn is_valid_lone_unicode_property(version: EcmaVersion, value: &str) -> bool {
    (version >= EcmaVersion::Es2018 && contains(BINARY_PROPERTIES_2018, value))
        || (version >= EcmaVersion::Es2019 && contains(BINARY_PROPERTIES_2019, value))
        || (version >= EcmaVersion::Es2021 && contains(BINARY_PROPERTIES_2021, value))
}

/// Validate a lone General_Category value such as `Lu` or `Letter`.
pub fn is_valid_lone_general_category(version: EcmaVersion, value: &str) -> bool {
    is_general_category_value(version, value)
}

/// Validate a property of strings such as `RGI_Emoji`.
pub fn is_valid_lone_unicode_property_of_string(version: EcmaVersion, value: &str) -> bool {
    version >= EcmaVersion::Es2024 && contains(STRING_PROPERTIES_2024, value)
}
