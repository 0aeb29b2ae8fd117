//! 声明扫描器
//!
//! 从声明图中筛选出带服务标记的具体类型。标记来源按优先级排列：
//! 自身标记，其次是基类型，最后是按声明顺序实现的契约。

use crate::declaration::{DeclarationGraph, MarkerDecl, TypeDecl};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

/// 标记来源
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "from", rename_all = "snake_case")]
pub enum MarkerOrigin {
    /// 类型自身
    Own,
    /// 基类型
    Base(String),
    /// 实现的契约
    Contract(String),
}

impl fmt::Display for MarkerOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Own => f.write_str("own"),
            Self::Base(name) => write!(f, "base {name}"),
            Self::Contract(name) => write!(f, "contract {name}"),
        }
    }
}

/// 一条标记及其来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSource {
    pub origin: MarkerOrigin,
    pub marker: MarkerDecl,
}

/// 扫描结果
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub decl: &'a TypeDecl,
    /// 按优先级排列的全部标记来源，至少一条
    pub sources: Vec<MarkerSource>,
}

impl Candidate<'_> {
    /// 优先级最高的标记来源
    pub fn primary(&self) -> &MarkerSource {
        &self.sources[0]
    }

    /// 是否存在多条标记来源
    pub fn is_ambiguous(&self) -> bool {
        self.sources.len() > 1
    }
}

/// 声明扫描器
#[derive(Debug, Default, Clone, Copy)]
pub struct DeclarationScanner;

impl DeclarationScanner {
    pub fn new() -> Self {
        Self
    }

    /// 扫描声明图，保持声明顺序
    pub fn scan<'a, G>(&self, graph: &'a G) -> Vec<Candidate<'a>>
    where
        G: DeclarationGraph + ?Sized,
    {
        let candidates: Vec<_> = graph
            .list_types()
            .iter()
            .filter(|decl| !decl.is_abstract())
            .filter_map(|decl| {
                let sources = marker_sources(graph, decl);
                if sources.is_empty() {
                    return None;
                }
                debug!(
                    "发现服务候选: {} (标记来源 {} 个)",
                    decl.ty,
                    sources.len()
                );
                Some(Candidate { decl, sources })
            })
            .collect();

        info!(
            "扫描完成: {} 个类型声明, {} 个服务候选",
            graph.list_types().len(),
            candidates.len()
        );
        candidates
    }
}

/// 只收集直接的标记来源，不沿基类型链继续向上
fn marker_sources<G>(graph: &G, decl: &TypeDecl) -> Vec<MarkerSource>
where
    G: DeclarationGraph + ?Sized,
{
    let mut sources: Vec<MarkerSource> = graph
        .attributes_of(decl)
        .iter()
        .map(|marker| MarkerSource {
            origin: MarkerOrigin::Own,
            marker: marker.clone(),
        })
        .collect();

    if let Some(base) = &decl.base {
        if let Some(base_decl) = graph.find_type(base) {
            sources.extend(graph.attributes_of(base_decl).iter().map(|marker| MarkerSource {
                origin: MarkerOrigin::Base(base.to_string()),
                marker: marker.clone(),
            }));
        }
    }

    for contract in &decl.contracts {
        if let Some(contract_decl) = graph.find_type(contract) {
            sources.extend(
                graph
                    .attributes_of(contract_decl)
                    .iter()
                    .map(|marker| MarkerSource {
                        origin: MarkerOrigin::Contract(contract.to_string()),
                        marker: marker.clone(),
                    }),
            );
        }
    }

    sources
}
