//! Parser configuration: the targeted ECMAScript edition and strictness.

// ─────────────────────────────────────────────────────────────────────────────
// EcmaVersion
// ─────────────────────────────────────────────────────────────────────────────

/// The ECMAScript edition whose RegExp grammar is accepted.
///
/// Editions are ordered, so feature gates read as
/// `version >= EcmaVersion::Es2018`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EcmaVersion {
    /// ECMAScript 5.
    Es5,
    /// ECMAScript 2015 (`u` and `y` flags).
    Es2015,
    /// ECMAScript 2016.
    Es2016,
    /// ECMAScript 2017.
    Es2017,
    /// ECMAScript 2018 (lookbehind, named groups, `\p{…}`, `s` flag).
    Es2018,
    /// ECMAScript 2019.
    Es2019,
    /// ECMAScript 2020.
    Es2020,
    /// ECMAScript 2021.
    Es2021,
    /// ECMAScript 2022 (`d` flag).
    Es2022,
    /// ECMAScript 2023.
    Es2023,
    /// ECMAScript 2024 (`v` flag, set notation, properties of strings).
    Es2024,
}

impl EcmaVersion {
    /// The newest supported edition, used when no version is configured.
    pub const LATEST: EcmaVersion = EcmaVersion::Es2024;

    /// Map a numeric edition (`5` or `2015..=2024`) to an [`EcmaVersion`].
    ///
    /// ```
    /// use esregex_core::options::EcmaVersion;
    ///
    /// assert_eq!(EcmaVersion::from_year(2020), Some(EcmaVersion::Es2020));
    /// assert_eq!(EcmaVersion::from_year(2014), None);
    /// ```
    pub fn from_year(year: u32) -> Option<Self> {
        Some(match year {
            5 => EcmaVersion::Es5,
            2015 => EcmaVersion::Es2015,
            2016 => EcmaVersion::Es2016,
            2017 => EcmaVersion::Es2017,
            2018 => EcmaVersion::Es2018,
            2019 => EcmaVersion::Es2019,
            2020 => EcmaVersion::Es2020,
            2021 => EcmaVersion::Es2021,
            2022 => EcmaVersion::Es2022,
            2023 => EcmaVersion::Es2023,
            2024 => EcmaVersion::Es2024,
            _ => return None,
        })
    }

    /// The numeric edition, e.g. `2018`.
    pub fn year(self) -> u32 {
        match self {
            EcmaVersion::Es5 => 5,
            EcmaVersion::Es2015 => 2015,
            EcmaVersion::Es2016 => 2016,
            EcmaVersion::Es2017 => 2017,
            EcmaVersion::Es2018 => 2018,
            EcmaVersion::Es2019 => 2019,
            EcmaVersion::Es2020 => 2020,
            EcmaVersion::Es2021 => 2021,
            EcmaVersion::Es2022 => 2022,
            EcmaVersion::Es2023 => 2023,
            EcmaVersion::Es2024 => 2024,
        }
    }
}

impl Default for EcmaVersion {
    fn default() -> Self {
        Self::LATEST
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// RegExpOptions
// ─────────────────────────────────────────────────────────────────────────────

/// Options shared by the validator and the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegExpOptions {
    /// Grammar edition; defaults to [`EcmaVersion::LATEST`].
    pub ecma_version: EcmaVersion,
    /// Disable the Annex B (web-compatibility) grammar even without the `u`
    /// flag.
    pub strict: bool,
}

impl RegExpOptions {
    /// Options for the latest edition in non-strict mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy targeting `ecma_version`.
    pub fn with_ecma_version(mut self, ecma_version: EcmaVersion) -> Self {
        self.ecma_version = ecma_version;
        self
    }

    /// Return a copy with strict mode set to `strict`.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Mode flags for a bare pattern (`u` and `v`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatternFlags {
    /// The `u` flag.
    pub unicode: bool,
    /// The `v` flag.
    pub unicode_sets: bool,
}

impl PatternFlags {
    /// Neither `u` nor `v`: the legacy grammar.
    pub const LEGACY: PatternFlags = PatternFlags {
        unicode: false,
        unicode_sets: false,
    };
    /// The `u` flag alone.
    pub const UNICODE: PatternFlags = PatternFlags {
        unicode: true,
        unicode_sets: false,
    };
    /// The `v` flag alone.
    pub const UNICODE_SETS: PatternFlags = PatternFlags {
        unicode: false,
        unicode_sets: true,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versions_are_ordered() {
        assert!(EcmaVersion::Es5 < EcmaVersion::Es2015);
        assert!(EcmaVersion::Es2018 < EcmaVersion::Es2024);
        assert_eq!(EcmaVersion::default(), EcmaVersion::Es2024);
    }

    #[test]
    fn test_from_year_round_trips() {
        for year in [5, 2015, 2016, 2017, 2018, 2019, 2020, 2021, 2022, 2023, 2024] {
            let version = EcmaVersion::from_year(year).unwrap();
            assert_eq!(version.year(), year);
        }
        assert_eq!(EcmaVersion::from_year(6), None);
        assert_eq!(EcmaVersion::from_year(2025), None);
    }

    #[test]
    fn test_option_setters() {
        let opts = RegExpOptions::new()
            .with_ecma_version(EcmaVersion::Es2018)
            .with_strict(true);
        assert_eq!(opts.ecma_version, EcmaVersion::Es2018);
        assert!(opts.strict);
        assert!(!RegExpOptions::default().strict);
    }
}
