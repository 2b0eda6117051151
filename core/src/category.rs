//! Request categories and the category → timeout table.
//!
//! # Design
//! Endpoints are grouped by how long they are allowed to take. The table is a
//! plain record with one field per category, so "every category has exactly
//! one timeout" holds by construction. Category tags coming from outside the
//! type system (config files, callers passing strings) go through
//! `TimeoutTable::for_tag`, which falls back to the default timeout.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Logical grouping of endpoints sharing a timeout policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequestCategory {
    /// Interactive content generation.
    Chat,
    /// Multi-step model pipelines such as strategy generation.
    #[serde(alias = "quantStrategy")]
    LongRunningComputation,
    #[serde(alias = "knowledgeBase")]
    KnowledgeLookup,
    #[serde(alias = "fileOperations")]
    FileOperation,
    #[default]
    Default,
}

impl RequestCategory {
    pub const ALL: [RequestCategory; 5] = [
        RequestCategory::Chat,
        RequestCategory::LongRunningComputation,
        RequestCategory::KnowledgeLookup,
        RequestCategory::FileOperation,
        RequestCategory::Default,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RequestCategory::Chat => "chat",
            RequestCategory::LongRunningComputation => "longRunningComputation",
            RequestCategory::KnowledgeLookup => "knowledgeLookup",
            RequestCategory::FileOperation => "fileOperation",
            RequestCategory::Default => "default",
        }
    }
}

impl fmt::Display for RequestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a category tag names no known category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown request category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for RequestCategory {
    type Err = UnknownCategory;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "chat" => Ok(RequestCategory::Chat),
            "longRunningComputation" | "quantStrategy" => Ok(RequestCategory::LongRunningComputation),
            "knowledgeLookup" | "knowledgeBase" => Ok(RequestCategory::KnowledgeLookup),
            "fileOperation" | "fileOperations" => Ok(RequestCategory::FileOperation),
            "default" => Ok(RequestCategory::Default),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

/// Timeout per category, in milliseconds.
///
/// Built once with the client configuration and only ever read afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimeoutTable {
    pub chat: u64,
    #[serde(alias = "quantStrategy")]
    pub long_running_computation: u64,
    #[serde(alias = "knowledgeBase")]
    pub knowledge_lookup: u64,
    #[serde(alias = "fileOperations")]
    pub file_operation: u64,
    pub default: u64,
}

impl Default for TimeoutTable {
    fn default() -> Self {
        Self {
            chat: 60_000,
            long_running_computation: 300_000,
            knowledge_lookup: 30_000,
            file_operation: 120_000,
            default: 30_000,
        }
    }
}

impl TimeoutTable {
    pub fn get(&self, category: RequestCategory) -> Duration {
        let millis = match category {
            RequestCategory::Chat => self.chat,
            RequestCategory::LongRunningComputation => self.long_running_computation,
            RequestCategory::KnowledgeLookup => self.knowledge_lookup,
            RequestCategory::FileOperation => self.file_operation,
            RequestCategory::Default => self.default,
        };
        Duration::from_millis(millis)
    }

    /// Look up a category by its tag. Unrecognized tags get the default timeout.
    pub fn for_tag(&self, tag: &str) -> Duration {
        match tag.parse::<RequestCategory>() {
            Ok(category) => self.get(category),
            Err(_) => Duration::from_millis(self.default),
        }
    }

    /// Categories whose timeout is zero, which would abort every request.
    pub(crate) fn zero_entries(&self) -> Vec<RequestCategory> {
        RequestCategory::ALL
            .into_iter()
            .filter(|category| self.get(*category).is_zero())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_matches_endpoint_policy() {
        let table = TimeoutTable::default();
        assert_eq!(table.get(RequestCategory::Chat), Duration::from_secs(60));
        assert_eq!(table.get(RequestCategory::LongRunningComputation), Duration::from_secs(300));
        assert_eq!(table.get(RequestCategory::KnowledgeLookup), Duration::from_secs(30));
        assert_eq!(table.get(RequestCategory::FileOperation), Duration::from_secs(120));
        assert_eq!(table.get(RequestCategory::Default), Duration::from_secs(30));
    }

    #[test]
    fn unknown_tag_falls_back_to_default() {
        let table = TimeoutTable::default();
        assert_eq!(table.for_tag("videoRendering"), Duration::from_millis(30_000));
        assert_eq!(table.for_tag(""), Duration::from_millis(30_000));
    }

    #[test]
    fn legacy_tags_are_accepted() {
        let table = TimeoutTable::default();
        assert_eq!(table.for_tag("quantStrategy"), Duration::from_millis(300_000));
        assert_eq!(table.for_tag("knowledgeBase"), Duration::from_millis(30_000));
        assert_eq!(table.for_tag("fileOperations"), Duration::from_millis(120_000));
    }

    #[test]
    fn tags_roundtrip_through_display() {
        for category in RequestCategory::ALL {
            assert_eq!(category.to_string().parse::<RequestCategory>(), Ok(category));
        }
    }

    #[test]
    fn category_serializes_camel_case() {
        let json = serde_json::to_string(&RequestCategory::LongRunningComputation).unwrap();
        assert_eq!(json, r#""longRunningComputation""#);
        let parsed: RequestCategory = serde_json::from_str(r#""fileOperations""#).unwrap();
        assert_eq!(parsed, RequestCategory::FileOperation);
    }

    #[test]
    fn zero_entries_reports_disabled_categories() {
        let table = TimeoutTable {
            chat: 0,
            ..TimeoutTable::default()
        };
        assert_eq!(table.zero_entries(), vec![RequestCategory::Chat]);
        assert!(TimeoutTable::default().zero_entries().is_empty());
    }
}
