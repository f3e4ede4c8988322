//! Supported languages and the handful of labels the explorer renders itself.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    De,
    Fr,
    It,
    En,
}

impl Lang {
    pub const ALL: [Lang; 4] = [Lang::De, Lang::Fr, Lang::It, Lang::En];

    pub fn code(self) -> &'static str {
        match self {
            Lang::De => "de",
            Lang::Fr => "fr",
            Lang::It => "it",
            Lang::En => "en",
        }
    }

    /// Parse a language code, falling back to German for anything unsupported.
    pub fn parse_or_default(code: &str) -> Lang {
        code.parse().unwrap_or_default()
    }
}

impl FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Lang::ALL
            .into_iter()
            .find(|lang| lang.code() == s)
            .ok_or_else(|| format!("unsupported language: {s}"))
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Topic,
    Classification,
    Region,
    RegionType,
    Chart,
    Map,
    VisualizeLink,
    Error,
}

impl Label {
    pub fn text(self, lang: Lang) -> &'static str {
        let [de, fr, it, en] = match self {
            Label::Topic => ["Thema", "Sujet", "Tema", "Topic"],
            Label::Classification => [
                "Klassifizierungsmerkmal",
                "Variable de classification",
                "Variabile di classificazione",
                "Classification variable",
            ],
            Label::Region => ["Region", "Région", "Regione", "Region"],
            Label::RegionType => ["Regionsart", "Type de région", "Tipo di regione", "Region Type"],
            Label::Chart => ["Diagramm", "Diagramme", "Diagramma", "Chart"],
            Label::Map => ["Karte", "Carte", "Mappa", "Map"],
            Label::VisualizeLink => [
                "Auf visualize.admin.ch öffnen",
                "Ouvrir sur visualize.admin.ch",
                "Aprire su visualize.admin.ch",
                "Open on visualize.admin.ch",
            ],
            Label::Error => [
                "Etwas ist schief gelaufen. Bitte versuche es später.",
                "Une erreur est survenue. Veuillez réessayer plus tard.",
                "Si è verificato un errore. Per favore riprova più tardi.",
                "Something went wrong. Please try again later.",
            ],
        };
        match lang {
            Lang::De => de,
            Lang::Fr => fr,
            Lang::It => it,
            Lang::En => en,
        }
    }
}
