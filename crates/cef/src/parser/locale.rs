//! Locale: month names used by textual CEF timestamps.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported locale: {0}")]
pub struct UnknownLocale(pub String);

/// Language used to recognise month tokens such as `Feb`, `févr.` or `Mai`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Locale {
    #[default]
    English,
    French,
    German,
    Spanish,
    Italian,
    Portuguese,
    Dutch,
}

type MonthTable = [&'static str; 12];

const EN_SHORT: MonthTable = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];
const EN_LONG: MonthTable = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

const FR_SHORT: MonthTable = ["janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.", "déc."];
const FR_LONG: MonthTable = [
    "janvier", "février", "mars", "avril", "mai", "juin",
    "juillet", "août", "septembre", "octobre", "novembre", "décembre",
];

const DE_SHORT: MonthTable = ["Jan.", "Feb.", "März", "Apr.", "Mai", "Juni", "Juli", "Aug.", "Sept.", "Okt.", "Nov.", "Dez."];
const DE_LONG: MonthTable = [
    "Januar", "Februar", "März", "April", "Mai", "Juni",
    "Juli", "August", "September", "Oktober", "November", "Dezember",
];

const ES_SHORT: MonthTable = ["ene.", "feb.", "mar.", "abr.", "may.", "jun.", "jul.", "ago.", "sept.", "oct.", "nov.", "dic."];
const ES_LONG: MonthTable = [
    "enero", "febrero", "marzo", "abril", "mayo", "junio",
    "julio", "agosto", "septiembre", "octubre", "noviembre", "diciembre",
];

const IT_SHORT: MonthTable = ["gen", "feb", "mar", "apr", "mag", "giu", "lug", "ago", "set", "ott", "nov", "dic"];
const IT_LONG: MonthTable = [
    "gennaio", "febbraio", "marzo", "aprile", "maggio", "giugno",
    "luglio", "agosto", "settembre", "ottobre", "novembre", "dicembre",
];

const PT_SHORT: MonthTable = ["jan.", "fev.", "mar.", "abr.", "mai.", "jun.", "jul.", "ago.", "set.", "out.", "nov.", "dez."];
const PT_LONG: MonthTable = [
    "janeiro", "fevereiro", "março", "abril", "maio", "junho",
    "julho", "agosto", "setembro", "outubro", "novembro", "dezembro",
];

const NL_SHORT: MonthTable = ["jan.", "feb.", "mrt.", "apr.", "mei", "jun.", "jul.", "aug.", "sep.", "okt.", "nov.", "dec."];
const NL_LONG: MonthTable = [
    "januari", "februari", "maart", "april", "mei", "juni",
    "juli", "augustus", "september", "oktober", "november", "december",
];

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::English => "en",
            Locale::French => "fr",
            Locale::German => "de",
            Locale::Spanish => "es",
            Locale::Italian => "it",
            Locale::Portuguese => "pt",
            Locale::Dutch => "nl",
        }
    }

    fn month_tables(&self) -> (&'static MonthTable, &'static MonthTable) {
        match self {
            Locale::English => (&EN_SHORT, &EN_LONG),
            Locale::French => (&FR_SHORT, &FR_LONG),
            Locale::German => (&DE_SHORT, &DE_LONG),
            Locale::Spanish => (&ES_SHORT, &ES_LONG),
            Locale::Italian => (&IT_SHORT, &IT_LONG),
            Locale::Portuguese => (&PT_SHORT, &PT_LONG),
            Locale::Dutch => (&NL_SHORT, &NL_LONG),
        }
    }

    /// Resolve a month token to its number (1-12).
    ///
    /// Matching is case-insensitive and ignores a trailing period, so
    /// `juil`, `juil.` and `JUIL.` are all July under [`Locale::French`].
    pub fn month_number(&self, token: &str) -> Option<u32> {
        let wanted = token.trim_end_matches('.').to_lowercase();
        if wanted.is_empty() {
            return None;
        }

        let (short, long) = self.month_tables();
        short
            .iter()
            .position(|m| m.trim_end_matches('.').to_lowercase() == wanted)
            .or_else(|| long.iter().position(|m| m.to_lowercase() == wanted))
            .map(|idx| idx as u32 + 1)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = UnknownLocale;

    /// Accepts a language tag (`fr`, `fr_FR`, `fr-CA`, `fr_FR.UTF-8`) or an English language name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let language = s
            .split(|c| c == '_' || c == '-' || c == '.')
            .next()
            .unwrap_or("")
            .trim()
            .to_lowercase();

        match language.as_str() {
            "en" | "english" | "c" | "posix" => Ok(Locale::English),
            "fr" | "french" => Ok(Locale::French),
            "de" | "german" => Ok(Locale::German),
            "es" | "spanish" => Ok(Locale::Spanish),
            "it" | "italian" => Ok(Locale::Italian),
            "pt" | "portuguese" => Ok(Locale::Portuguese),
            "nl" | "dutch" => Ok(Locale::Dutch),
            _ => Err(UnknownLocale(s.to_string())),
        }
    }
}

impl TryFrom<String> for Locale {
    type Error = UnknownLocale;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.as_str().to_string()
    }
}
