//! Règles de coercion des valeurs SOAP/XSD.
//!
//! Chaque type supporté possède un tag XSD canonique et une paire
//! encode/décode déterministe. L'encodage suit la sémantique de coercion
//! numérique de JavaScript (arrondi demi-écart vers l'extérieur, saturation
//! silencieuse des bytes, troncature des dates à minuit UTC).

use chrono::{DateTime, NaiveTime, SecondsFormat, Utc};

/// Valeur d'entrée pour l'encodage d'un paramètre SOAP.
///
/// Table de décision explicite plutôt que réflexion dynamique : l'appelant
/// choisit la variante, les règles d'encodage font le reste.
#[derive(Debug, Clone, PartialEq)]
pub enum SoapValue {
    /// Valeur absente (null / undefined)
    Null,
    Boolean(bool),
    /// Nombre flottant ; `NaN` modélise l'entrée NaN de JavaScript
    Number(f64),
    Text(String),
    /// Instant en mémoire (UTC)
    Instant(DateTime<Utc>),
}

impl From<bool> for SoapValue {
    fn from(value: bool) -> Self {
        SoapValue::Boolean(value)
    }
}

impl From<i32> for SoapValue {
    fn from(value: i32) -> Self {
        SoapValue::Number(value as f64)
    }
}

impl From<i64> for SoapValue {
    fn from(value: i64) -> Self {
        SoapValue::Number(value as f64)
    }
}

impl From<f32> for SoapValue {
    fn from(value: f32) -> Self {
        SoapValue::Number(value as f64)
    }
}

impl From<f64> for SoapValue {
    fn from(value: f64) -> Self {
        SoapValue::Number(value)
    }
}

impl From<&str> for SoapValue {
    fn from(value: &str) -> Self {
        SoapValue::Text(value.to_string())
    }
}

impl From<String> for SoapValue {
    fn from(value: String) -> Self {
        SoapValue::Text(value)
    }
}

impl From<DateTime<Utc>> for SoapValue {
    fn from(value: DateTime<Utc>) -> Self {
        SoapValue::Instant(value)
    }
}

impl<T: Into<SoapValue>> From<Option<T>> for SoapValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => SoapValue::Null,
        }
    }
}

/// Types XSD supportés pour les paramètres SOAP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XsdType {
    Boolean,
    Byte,
    Short,
    /// Les écritures "Long" émettent `xsd:int` (héritage du protocole)
    Int,
    Float,
    Double,
    String,
    DateTime,
    Date,
    Element,
    Document,
}

impl XsdType {
    /// Tag `xsi:type` émis sur les requêtes.
    pub fn write_tag(&self) -> &'static str {
        match self {
            XsdType::Boolean => "xsd:boolean",
            XsdType::Byte => "xsd:byte",
            XsdType::Short => "xsd:short",
            XsdType::Int => "xsd:int",
            XsdType::Float => "xsd:float",
            XsdType::Double => "xsd:double",
            XsdType::String => "xsd:string",
            // Le serveur renvoie "xsd:dateTime" mais attend "xsd:datetime"
            // en entrée. Asymétrie conservée telle quelle.
            XsdType::DateTime => "xsd:datetime",
            XsdType::Date => "xsd:date",
            XsdType::Element => "ns:Element",
            XsdType::Document => "ns:Document",
        }
    }

    /// Tag `xsi:type` attendu sur les réponses.
    pub fn read_tag(&self) -> &'static str {
        match self {
            XsdType::DateTime => "xsd:dateTime",
            other => other.write_tag(),
        }
    }
}

/// Coercion numérique façon `Number()` de JavaScript.
///
/// `Null` vaut 0, un booléen vaut 0/1, un texte est interprété comme
/// flottant ("1.e2" donne 100, texte vide donne 0, texte invalide donne
/// NaN), un instant vaut son horodatage en millisecondes.
fn to_number(value: &SoapValue) -> f64 {
    match value {
        SoapValue::Null => 0.0,
        SoapValue::Boolean(true) => 1.0,
        SoapValue::Boolean(false) => 0.0,
        SoapValue::Number(n) => *n,
        SoapValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(f64::NAN)
            }
        }
        SoapValue::Instant(dt) => dt.timestamp_millis() as f64,
    }
}

/// Arrondi demi-écart vers l'extérieur, NaN ramené à 0.
fn to_rounded_integer(value: &SoapValue) -> i64 {
    let n = to_number(value);
    if n.is_nan() { 0 } else { n.round() as i64 }
}

pub fn encode_boolean(value: &SoapValue) -> String {
    let truthy = match value {
        SoapValue::Null => false,
        SoapValue::Boolean(b) => *b,
        SoapValue::Number(n) => *n != 0.0 && !n.is_nan(),
        SoapValue::Text(s) => !s.is_empty() && s != "false" && s != "0",
        SoapValue::Instant(_) => true,
    };
    let text = if truthy { "true" } else { "false" };
    text.to_string()
}

/// Encode un byte : arrondi puis saturation silencieuse sur [-128, 127].
pub fn encode_byte(value: &SoapValue) -> String {
    to_rounded_integer(value).clamp(-128, 127).to_string()
}

/// Encode un short : arrondi, sans saturation.
pub fn encode_short(value: &SoapValue) -> String {
    to_rounded_integer(value).to_string()
}

/// Encode un int/long : même règle que short.
pub fn encode_int(value: &SoapValue) -> String {
    to_rounded_integer(value).to_string()
}

/// Encode un flottant : précision décimale complète, NaN ramené à 0.
pub fn encode_float(value: &SoapValue) -> String {
    let n = to_number(value);
    let n = if n.is_nan() { 0.0 } else { n };
    n.to_string()
}

pub fn encode_string(value: &SoapValue) -> String {
    match value {
        SoapValue::Null => String::new(),
        SoapValue::Boolean(true) => "true".to_string(),
        SoapValue::Boolean(false) => "false".to_string(),
        SoapValue::Number(n) if n.is_nan() => String::new(),
        SoapValue::Number(n) => n.to_string(),
        SoapValue::Text(s) => s.clone(),
        SoapValue::Instant(dt) => format_instant(*dt),
    }
}

/// Encode un instant ISO-8601 à la milliseconde, suffixe `Z`.
/// Valeur absente ou texte inanalysable : chaîne vide.
pub fn encode_timestamp(value: &SoapValue) -> String {
    match instant_of(value) {
        Some(dt) => format_instant(dt),
        None => String::new(),
    }
}

/// Encode une date : l'instant est tronqué à minuit UTC du jour calendaire
/// puis rendu comme un instant ISO complet (`...T00:00:00.000Z`).
pub fn encode_date(value: &SoapValue) -> String {
    match instant_of(value) {
        Some(dt) => format_instant(truncate_to_date(dt)),
        None => String::new(),
    }
}

fn instant_of(value: &SoapValue) -> Option<DateTime<Utc>> {
    match value {
        SoapValue::Instant(dt) => Some(*dt),
        SoapValue::Text(s) => parse_instant(s.trim()),
        // Un nombre est un horodatage en millisecondes depuis l'epoch
        SoapValue::Number(n) if !n.is_nan() => DateTime::from_timestamp_millis(*n as i64),
        _ => None,
    }
}

fn truncate_to_date(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.date_naive().and_time(NaiveTime::MIN).and_utc()
}

pub fn format_instant(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

pub fn decode_boolean(text: &str) -> bool {
    text == "true"
}

pub fn decode_byte(text: &str) -> Option<i8> {
    text.trim().parse().ok()
}

pub fn decode_short(text: &str) -> Option<i16> {
    text.trim().parse().ok()
}

pub fn decode_int(text: &str) -> Option<i32> {
    text.trim().parse().ok()
}

pub fn decode_float(text: &str) -> Option<f32> {
    text.trim().parse().ok()
}

pub fn decode_double(text: &str) -> Option<f64> {
    text.trim().parse().ok()
}

pub fn decode_instant(text: &str) -> Option<DateTime<Utc>> {
    parse_instant(text.trim())
}
