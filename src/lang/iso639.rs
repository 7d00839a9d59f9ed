// SPDX-License-Identifier: PMPL-1.0-or-later

//! ISO 639-1 language code validation and metadata.
//!
//! Catalog headers carry POSIX-style tags (`cs_CZ`, `pt_BR`) whose language
//! part is an ISO 639-1 code. These helpers validate that part and give
//! reports something readable to print next to it.
//!
//! Reference: <https://www.loc.gov/standards/iso639-2/php/code_list.php>

/// Validates whether a string is a known ISO 639-1 two-letter language code.
///
/// Case-sensitive: codes must already be lowercase.
///
/// # Examples
/// ```
/// assert!(tscat::lang::is_valid_iso639_1("de"));
/// assert!(tscat::lang::is_valid_iso639_1("sl"));
/// assert!(!tscat::lang::is_valid_iso639_1("xx"));
/// ```
pub fn is_valid_iso639_1(code: &str) -> bool {
    matches!(
        code,
        "aa" | "ab" | "af" | "ak" | "am" | "an" | "ar" | "as" | "av" | "ay" | "az"
            | "ba" | "be" | "bg" | "bh" | "bi" | "bm" | "bn" | "bo" | "br" | "bs"
            | "ca" | "ce" | "ch" | "co" | "cr" | "cs" | "cu" | "cv" | "cy"
            | "da" | "de" | "dv" | "dz"
            | "ee" | "el" | "en" | "eo" | "es" | "et" | "eu"
            | "fa" | "ff" | "fi" | "fj" | "fo" | "fr" | "fy"
            | "ga" | "gd" | "gl" | "gn" | "gu" | "gv"
            | "ha" | "he" | "hi" | "ho" | "hr" | "ht" | "hu" | "hy" | "hz"
            | "ia" | "id" | "ie" | "ig" | "ii" | "ik" | "io" | "is" | "it" | "iu"
            | "ja" | "jv"
            | "ka" | "kg" | "ki" | "kj" | "kk" | "kl" | "km" | "kn" | "ko" | "kr" | "ks" | "ku" | "kv" | "kw" | "ky"
            | "la" | "lb" | "lg" | "li" | "ln" | "lo" | "lt" | "lu" | "lv"
            | "mg" | "mh" | "mi" | "mk" | "ml" | "mn" | "mr" | "ms" | "mt" | "my"
            | "na" | "nb" | "nd" | "ne" | "ng" | "nl" | "nn" | "no" | "nr" | "nv" | "ny"
            | "oc" | "oj" | "om" | "or" | "os"
            | "pa" | "pi" | "pl" | "ps" | "pt"
            | "qu"
            | "rm" | "rn" | "ro" | "ru" | "rw"
            | "sa" | "sc" | "sd" | "se" | "sg" | "si" | "sk" | "sl" | "sm" | "sn" | "so" | "sq" | "sr" | "ss" | "st" | "su" | "sv" | "sw"
            | "ta" | "te" | "tg" | "th" | "ti" | "tk" | "tl" | "tn" | "to" | "tr" | "ts" | "tt" | "tw" | "ty"
            | "ug" | "uk" | "ur" | "uz"
            | "ve" | "vi" | "vo"
            | "wa" | "wo"
            | "xh"
            | "yi" | "yo"
            | "za" | "zh" | "zu"
    )
}

/// Returns the English name of an ISO 639-1 code.
///
/// Covers the languages Qt ships catalogs for plus common neighbours.
pub fn language_name(code: &str) -> Option<&'static str> {
    match code {
        "ar" => Some("Arabic"),
        "be" => Some("Belarusian"),
        "bg" => Some("Bulgarian"),
        "ca" => Some("Catalan"),
        "cs" => Some("Czech"),
        "cy" => Some("Welsh"),
        "da" => Some("Danish"),
        "de" => Some("German"),
        "el" => Some("Greek"),
        "en" => Some("English"),
        "es" => Some("Spanish"),
        "et" => Some("Estonian"),
        "eu" => Some("Basque"),
        "fa" => Some("Persian"),
        "fi" => Some("Finnish"),
        "fr" => Some("French"),
        "ga" => Some("Irish"),
        "gd" => Some("Scottish Gaelic"),
        "gl" => Some("Galician"),
        "he" => Some("Hebrew"),
        "hi" => Some("Hindi"),
        "hr" => Some("Croatian"),
        "hu" => Some("Hungarian"),
        "hy" => Some("Armenian"),
        "id" => Some("Indonesian"),
        "is" => Some("Icelandic"),
        "it" => Some("Italian"),
        "ja" => Some("Japanese"),
        "ko" => Some("Korean"),
        "lt" => Some("Lithuanian"),
        "lv" => Some("Latvian"),
        "mk" => Some("Macedonian"),
        "ms" => Some("Malay"),
        "mt" => Some("Maltese"),
        "nl" => Some("Dutch"),
        "no" | "nb" => Some("Norwegian"),
        "pl" => Some("Polish"),
        "pt" => Some("Portuguese"),
        "ro" => Some("Romanian"),
        "ru" => Some("Russian"),
        "sk" => Some("Slovak"),
        "sl" => Some("Slovenian"),
        "sr" => Some("Serbian"),
        "sv" => Some("Swedish"),
        "th" => Some("Thai"),
        "tl" => Some("Tagalog"),
        "tr" => Some("Turkish"),
        "uk" => Some("Ukrainian"),
        "vi" => Some("Vietnamese"),
        "zh" => Some("Chinese"),
        _ => None,
    }
}

/// Returns the native name of an ISO 639-1 language code.
pub fn native_name(code: &str) -> Option<&'static str> {
    match code {
        "cs" => Some("Čeština"),
        "da" => Some("Dansk"),
        "de" => Some("Deutsch"),
        "en" => Some("English"),
        "es" => Some("Español"),
        "eu" => Some("Euskara"),
        "fr" => Some("Français"),
        "he" => Some("עברית"),
        "hu" => Some("Magyar"),
        "it" => Some("Italiano"),
        "ja" => Some("日本語"),
        "ko" => Some("한국어"),
        "pl" => Some("Polski"),
        "pt" => Some("Português"),
        "ru" => Some("Русский"),
        "sk" => Some("Slovenčina"),
        "sl" => Some("Slovenščina"),
        "uk" => Some("Українська"),
        "zh" => Some("中文"),
        _ => None,
    }
}
