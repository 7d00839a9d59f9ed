// SPDX-License-Identifier: PMPL-1.0-or-later

//! Serialization helpers for printed/exported reports

use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportOutputFormat {
    /// Coloured, human readable
    #[default]
    Text,
    Json,
    Yaml,
}

impl ReportOutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "text" | "txt" => Some(ReportOutputFormat::Text),
            "json" => Some(ReportOutputFormat::Json),
            "yaml" | "yml" => Some(ReportOutputFormat::Yaml),
            _ => None,
        }
    }

    /// Machine readable rendering of a report. Text reports are printed by
    /// the formatter instead, so this returns `None` for them.
    pub fn serialize<T: Serialize>(&self, report: &T) -> Result<Option<String>> {
        match self {
            ReportOutputFormat::Text => Ok(None),
            ReportOutputFormat::Json => Ok(Some(serde_json::to_string_pretty(report)?)),
            ReportOutputFormat::Yaml => Ok(Some(serde_yaml::to_string(report)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::MessageStats;

    #[test]
    fn parses_aliases() {
        assert_eq!(ReportOutputFormat::parse("YML"), Some(ReportOutputFormat::Yaml));
        assert_eq!(ReportOutputFormat::parse("txt"), Some(ReportOutputFormat::Text));
        assert_eq!(ReportOutputFormat::parse("ncl"), None);
    }

    #[test]
    fn serializes_machine_formats_only() {
        let stats = MessageStats {
            finished: 2,
            ..Default::default()
        };
        assert!(ReportOutputFormat::Text.serialize(&stats).unwrap().is_none());

        let json = ReportOutputFormat::Json.serialize(&stats).unwrap().unwrap();
        assert!(json.contains("\"finished\": 2"));

        let yaml = ReportOutputFormat::Yaml.serialize(&stats).unwrap().unwrap();
        assert!(yaml.contains("finished: 2"));
    }
}
