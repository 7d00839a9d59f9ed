// SPDX-License-Identifier: PMPL-1.0-or-later

//! Plural (numerus) rules
//!
//! A numerus message stores one translation form per plural rule of the
//! catalog language. Each rule family is a list of form conditions tried in
//! order; the first one that matches picks the form, and a count matching
//! none of them takes the last form. The table follows the one Qt's tools
//! compile into `.qm` files, so catalogs written by lupdate line up with it.

use crate::lang::LanguageTag;
use Operand::{Lead1000, Mod10, Mod100};
use Test::{AtLeast, AtMost, In, Is, IsNot, NotIn};

/// Value a condition is applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operand {
    N,
    Mod10,
    Mod100,
    /// Leading group of thousands: 11000 -> 11
    Lead1000,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Test {
    Is(u8),
    IsNot(u8),
    AtMost(u8),
    AtLeast(u8),
    In(u8, u8),
    NotIn(u8, u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Condition {
    operand: Operand,
    test: Test,
}

impl Condition {
    fn matches(&self, n: u64) -> bool {
        let value = match self.operand {
            Operand::N => n,
            Operand::Mod10 => n % 10,
            Operand::Mod100 => n % 100,
            Operand::Lead1000 => {
                let mut v = n;
                while v >= 1000 {
                    v /= 1000;
                }
                v
            }
        };
        match self.test {
            Test::Is(k) => value == u64::from(k),
            Test::IsNot(k) => value != u64::from(k),
            Test::AtMost(k) => value <= u64::from(k),
            Test::AtLeast(k) => value >= u64::from(k),
            Test::In(lo, hi) => (u64::from(lo)..=u64::from(hi)).contains(&value),
            Test::NotIn(lo, hi) => !(u64::from(lo)..=u64::from(hi)).contains(&value),
        }
    }

    /// Byte code of this condition in a `.qm` numerus rule block.
    fn encode(&self, out: &mut Vec<u8>) {
        let operand = match self.operand {
            Operand::N => 0,
            Operand::Mod10 => QM_MOD_10,
            Operand::Mod100 => QM_MOD_100,
            Operand::Lead1000 => QM_LEAD_1000,
        };
        match self.test {
            Test::Is(k) => out.extend([operand | QM_EQ, k]),
            Test::IsNot(k) => out.extend([operand | QM_NOT | QM_EQ, k]),
            Test::AtMost(k) => out.extend([operand | QM_LEQ, k]),
            Test::AtLeast(k) => out.extend([operand | QM_NOT | QM_LT, k]),
            Test::In(lo, hi) => out.extend([operand | QM_BETWEEN, lo, hi]),
            Test::NotIn(lo, hi) => out.extend([operand | QM_NOT | QM_BETWEEN, lo, hi]),
        }
    }

    /// C expression of this condition, as gettext's `plural=` expects.
    fn gettext(&self) -> String {
        let value = match self.operand {
            Operand::N => "n",
            Operand::Mod10 => "n%10",
            Operand::Mod100 => "n%100",
            Operand::Lead1000 => {
                "(n<1000 ? n : n<1000000 ? n/1000 : n<1000000000 ? n/1000000 : n/1000000000)"
            }
        };
        match self.test {
            Test::Is(k) => format!("{value}=={k}"),
            Test::IsNot(k) => format!("{value}!={k}"),
            Test::AtMost(k) => format!("{value}<={k}"),
            Test::AtLeast(k) => format!("{value}>={k}"),
            Test::In(lo, hi) => format!("({value}>={lo} && {value}<={hi})"),
            Test::NotIn(lo, hi) => format!("({value}<{lo} || {value}>{hi})"),
        }
    }

    /// A bare `n == k` test selects one count only.
    fn is_exact(&self) -> bool {
        self.operand == Operand::N && matches!(self.test, Test::Is(_))
    }
}

// Numerus rule byte code read by QTranslator
const QM_EQ: u8 = 0x01;
const QM_LT: u8 = 0x02;
const QM_LEQ: u8 = 0x03;
const QM_BETWEEN: u8 = 0x04;
const QM_NOT: u8 = 0x08;
const QM_MOD_10: u8 = 0x10;
const QM_MOD_100: u8 = 0x20;
const QM_LEAD_1000: u8 = 0x40;
const QM_AND: u8 = 0xfd;
const QM_OR: u8 = 0xfe;
const QM_NEWRULE: u8 = 0xff;

const fn on(operand: Operand, test: Test) -> Condition {
    Condition { operand, test }
}

const fn n(test: Test) -> Condition {
    on(Operand::N, test)
}

/// Conditions joined with AND
type Clause = &'static [Condition];

/// Clauses joined with OR; selects one form
type FormCondition = &'static [Clause];

/// One plural rule family and the languages that use it
#[derive(Debug)]
pub struct PluralRule {
    pub name: &'static str,
    languages: &'static [&'static str],
    conditions: &'static [FormCondition],
    forms: &'static [&'static str],
}

impl PluralRule {
    /// Number of translation forms a numerus message needs.
    pub fn count(&self) -> usize {
        self.forms.len()
    }

    /// Human readable names of the forms, in storage order.
    pub fn form_names(&self) -> &'static [&'static str] {
        self.forms
    }

    /// Index of the form used for `count`. Negative counts use |count|.
    ///
    /// ```
    /// let ru = tscat::plural::rule_for("ru").unwrap();
    /// assert_eq!(ru.form_index(1), 0);
    /// assert_eq!(ru.form_index(3), 1);
    /// assert_eq!(ru.form_index(11), 2);
    /// ```
    pub fn form_index(&self, count: i64) -> usize {
        let n = count.unsigned_abs();
        self.conditions
            .iter()
            .position(|form| {
                form.iter()
                    .any(|clause| clause.iter().all(|c| c.matches(n)))
            })
            .unwrap_or(self.conditions.len())
    }

    /// The rule compiled to the byte code stored in a `.qm` file. Empty
    /// for the single-form family, which needs no rule block.
    pub fn qm_rules(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for (i, form) in self.conditions.iter().enumerate() {
            if i > 0 {
                out.push(QM_NEWRULE);
            }
            for (j, clause) in form.iter().enumerate() {
                if j > 0 {
                    out.push(QM_OR);
                }
                for (k, condition) in clause.iter().enumerate() {
                    if k > 0 {
                        out.push(QM_AND);
                    }
                    condition.encode(&mut out);
                }
            }
        }
        out
    }

    /// Value of a gettext `Plural-Forms` header for this family.
    ///
    /// ```
    /// let de = tscat::plural::rule_for("de").unwrap();
    /// assert_eq!(de.gettext_header(), "nplurals=2; plural=(n==1 ? 0 : 1);");
    /// ```
    pub fn gettext_header(&self) -> String {
        if self.conditions.is_empty() {
            return "nplurals=1; plural=0;".to_string();
        }
        let mut expr = String::new();
        for (i, form) in self.conditions.iter().enumerate() {
            let alternatives: Vec<String> = form
                .iter()
                .map(|clause| {
                    let all: Vec<String> = clause.iter().map(Condition::gettext).collect();
                    if clause.len() > 1 && form.len() > 1 {
                        format!("({})", all.join(" && "))
                    } else {
                        all.join(" && ")
                    }
                })
                .collect();
            expr.push_str(&format!("{} ? {} : ", alternatives.join(" || "), i));
        }
        format!(
            "nplurals={}; plural=({}{});",
            self.count(),
            expr,
            self.conditions.len()
        )
    }

    /// Whether the translation of form `index` must mention the count
    /// with `%n`.
    ///
    /// A form selected by a single `n == k` test always renders for the
    /// same number, so the translation may spell it out instead. The last
    /// form catches every remaining count and always needs the marker.
    pub fn needs_count_marker(&self, index: usize) -> bool {
        match self.conditions.get(index) {
            Some(&[clause]) if clause.len() == 1 => !clause[0].is_exact(),
            _ => true,
        }
    }
}

/// All rule families known to the toolkit.
pub static RULES: &[PluralRule] = &[
    PluralRule {
        name: "universal",
        languages: &[
            "bi", "bo", "dz", "fa", "fj", "gn", "hu", "id", "ja", "jv", "ko", "ms", "my", "na",
            "om", "su", "th", "tr", "tt", "vi", "yo", "za", "zh",
        ],
        conditions: &[],
        forms: &["Universal Form"],
    },
    PluralRule {
        name: "english",
        languages: &[
            "aa", "ab", "af", "am", "as", "ay", "az", "ba", "bg", "bh", "bn", "da", "de", "el",
            "en", "eo", "es", "et", "eu", "fi", "fo", "fy", "gl", "gu", "ha", "he", "hi", "ia",
            "ie", "it", "ka", "kk", "kl", "km", "kn", "ks", "ku", "ky", "la", "lb", "lo", "mg",
            "ml", "mn", "mr", "nb", "ne", "nl", "nn", "no", "oc", "or", "pa", "ps", "pt", "qu",
            "rm", "rn", "rw", "sd", "si", "sn", "so", "sq", "ss", "st", "sv", "sw", "ta", "te",
            "tg", "tk", "tn", "to", "ts", "tw", "ug", "ur", "uz", "vo", "wo", "xh", "yi", "zu",
        ],
        conditions: &[&[&[n(Is(1))]]],
        forms: &["Singular", "Plural"],
    },
    PluralRule {
        name: "french",
        languages: &["br", "fr", "hy", "pt_BR"],
        conditions: &[&[&[n(AtMost(1))]]],
        forms: &["Singular", "Plural"],
    },
    PluralRule {
        name: "latvian",
        languages: &["lv"],
        conditions: &[
            &[&[on(Mod10, Is(1)), on(Mod100, IsNot(11))]],
            &[&[n(IsNot(0))]],
        ],
        forms: &["Singular", "Plural", "Nullar"],
    },
    PluralRule {
        name: "icelandic",
        languages: &["is"],
        conditions: &[&[&[on(Mod10, Is(1)), on(Mod100, IsNot(11))]]],
        forms: &["Singular", "Plural"],
    },
    PluralRule {
        name: "irish",
        languages: &["ga"],
        conditions: &[&[&[n(Is(1))]], &[&[n(Is(2))]]],
        forms: &["Singular", "Dual", "Plural"],
    },
    PluralRule {
        name: "gaelic",
        languages: &["gd"],
        conditions: &[
            &[&[n(Is(1))], &[n(Is(11))]],
            &[&[n(Is(2))], &[n(Is(12))]],
            &[&[n(In(3, 19))]],
        ],
        forms: &["1/11", "2/12", "Few", "Many"],
    },
    PluralRule {
        name: "slovak",
        languages: &["cs", "sk"],
        conditions: &[&[&[n(Is(1))]], &[&[n(In(2, 4))]]],
        forms: &["Singular", "Paucal", "Plural"],
    },
    PluralRule {
        name: "macedonian",
        languages: &["mk"],
        conditions: &[&[&[on(Mod10, Is(1))]], &[&[on(Mod10, Is(2))]]],
        forms: &["Singular", "Dual", "Plural"],
    },
    PluralRule {
        name: "lithuanian",
        languages: &["lt"],
        conditions: &[
            &[&[on(Mod10, Is(1)), on(Mod100, IsNot(11))]],
            &[&[on(Mod10, IsNot(0)), on(Mod100, NotIn(10, 19))]],
        ],
        forms: &["Singular", "Paucal", "Plural"],
    },
    PluralRule {
        name: "russian",
        languages: &["be", "bs", "hr", "ru", "sr", "uk"],
        conditions: &[
            &[&[on(Mod10, Is(1)), on(Mod100, IsNot(11))]],
            &[&[on(Mod10, In(2, 4)), on(Mod100, NotIn(10, 19))]],
        ],
        forms: &["Singular", "Dual", "Plural"],
    },
    PluralRule {
        name: "polish",
        languages: &["pl"],
        conditions: &[
            &[&[n(Is(1))]],
            &[&[on(Mod10, In(2, 4)), on(Mod100, NotIn(10, 19))]],
        ],
        forms: &["Singular", "Paucal", "Plural"],
    },
    PluralRule {
        name: "romanian",
        languages: &["ro"],
        conditions: &[
            &[&[n(Is(1))]],
            &[&[n(Is(0))], &[on(Mod100, In(1, 19))]],
        ],
        forms: &["Singular", "Paucal", "Plural"],
    },
    PluralRule {
        name: "slovenian",
        languages: &["sl"],
        conditions: &[
            &[&[on(Mod100, Is(1))]],
            &[&[on(Mod100, Is(2))]],
            &[&[on(Mod100, In(3, 4))]],
        ],
        forms: &["Singular", "Dual", "Trial", "Plural"],
    },
    PluralRule {
        name: "maltese",
        languages: &["mt"],
        conditions: &[
            &[&[n(Is(1))]],
            &[&[n(Is(0))], &[on(Mod100, In(1, 10))]],
            &[&[on(Mod100, In(11, 19))]],
        ],
        forms: &["Singular", "Paucal", "Greater Paucal", "Plural"],
    },
    PluralRule {
        name: "welsh",
        languages: &["cy"],
        conditions: &[
            &[&[n(Is(0))]],
            &[&[n(Is(1))]],
            &[&[n(In(2, 5))]],
            &[&[n(Is(6))]],
        ],
        forms: &["Nullar", "Singular", "Dual", "Sexal", "Plural"],
    },
    PluralRule {
        name: "arabic",
        languages: &["ar"],
        conditions: &[
            &[&[n(Is(0))]],
            &[&[n(Is(1))]],
            &[&[n(Is(2))]],
            &[&[on(Mod100, In(3, 10))]],
            &[&[on(Mod100, AtLeast(11))]],
        ],
        forms: &[
            "Nullar",
            "Singular",
            "Dual",
            "Minority Plural",
            "Plural",
            "Plurals (100-102, ...)",
        ],
    },
    PluralRule {
        name: "tagalog",
        languages: &["tl"],
        conditions: &[
            &[&[n(AtMost(1))]],
            &[&[on(Mod10, Is(4))], &[on(Mod10, Is(6))], &[on(Mod10, Is(9))]],
        ],
        forms: &[
            "Singular",
            "Plural (consonant-ended)",
            "Plural (vowel-ended)",
        ],
    },
    PluralRule {
        name: "catalan",
        languages: &["ca"],
        conditions: &[&[&[n(Is(1))]], &[&[on(Lead1000, Is(11))]]],
        forms: &["Singular", "Undecal (11)", "Plural"],
    },
];

/// Rule family for a language tag such as `de`, `cs_CZ` or `pt-BR`.
///
/// A family listing the full `language_REGION` tag wins over one listing
/// the bare language, so `pt_BR` is French style while `pt` is English
/// style.
pub fn rule_for(tag: &str) -> Option<&'static PluralRule> {
    let tag = LanguageTag::parse(tag)?;
    let full = tag.to_string();
    RULES
        .iter()
        .find(|rule| rule.languages.contains(&full.as_str()))
        .or_else(|| {
            RULES
                .iter()
                .find(|rule| rule.languages.contains(&tag.language.as_str()))
        })
}

/// Rule used when the catalog language is missing or unknown.
pub fn fallback_rule() -> &'static PluralRule {
    &RULES[1]
}
