//! 生成过程中的非致命诊断

use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// 诊断级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Note,
    Warning,
}

/// 单条诊断
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// 诊断所针对的类型
    pub type_name: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Note => "note",
            Severity::Warning => "warning",
        };
        write!(f, "{level}: {}: {}", self.type_name, self.message)
    }
}

/// 诊断收集器
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录提示
    pub fn note(&mut self, type_name: impl Into<String>, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            severity: Severity::Note,
            type_name: type_name.into(),
            message: message.into(),
        };
        debug!("{}", diagnostic);
        self.items.push(diagnostic);
    }

    /// 记录警告
    pub fn warning(&mut self, type_name: impl Into<String>, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            severity: Severity::Warning,
            type_name: type_name.into(),
            message: message.into(),
        };
        warn!("{}", diagnostic);
        self.items.push(diagnostic);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items
            .iter()
            .filter(|diagnostic| diagnostic.severity == Severity::Warning)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}
